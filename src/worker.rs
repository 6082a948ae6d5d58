use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use crate::alphabet::Alphabet;
use crate::indexer::Odometer;
use crate::partition::WorkChunk;

/// Indices tested between two looks at the shared stop flags.
pub const CHECK_INTERVAL: u64 = 10_000;

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// Per-run state shared by every worker.
///
/// One instance per run, handed to workers by reference. `found` goes from
/// `false` to `true` at most once; the worker whose compare-and-set wins is
/// the only one that stores the candidate. `cancelled` is an independent
/// stop request (caller cancellation or a failed worker) that never carries
/// a candidate.
#[derive(Debug, Default)]
pub struct SearchState {
    found:     AtomicBool,
    candidate: OnceLock<String>,
    cancelled: AtomicBool,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a match. Returns `true` only for the first caller; later
    /// callers' candidates are discarded.
    pub fn try_record(&self, candidate: String) -> bool {
        if self
            .found
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        // Only the CAS winner reaches this, so the cell is still empty.
        let _ = self.candidate.set(candidate);
        true
    }

    pub fn is_found(&self) -> bool {
        self.found.load(Ordering::Acquire)
    }

    /// The recorded candidate, once the winning worker has stored it.
    pub fn candidate(&self) -> Option<&str> {
        self.candidate.get().map(String::as_str)
    }

    /// Ask every worker to stop at its next check.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Whether workers should stop testing.
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.is_found() || self.is_cancelled()
    }
}

// ---------------------------------------------------------------------------
// SearchJob
// ---------------------------------------------------------------------------

/// What every chunk of a run is tested against.
#[derive(Debug, Clone)]
pub struct SearchJob {
    alphabet:       Alphabet,
    target:         Vec<char>,
    check_interval: u64,
}

impl SearchJob {
    pub fn new(alphabet: Alphabet, target: &str) -> Self {
        Self {
            alphabet,
            target: target.chars().collect(),
            check_interval: CHECK_INTERVAL,
        }
    }

    /// Set the cooperative check granularity. Clamped to at least 1.
    pub fn with_check_interval(mut self, n: u64) -> Self {
        self.check_interval = n.max(1);
        self
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Target length in symbols.
    pub fn target_len(&self) -> usize {
        self.target.len()
    }
}

// ---------------------------------------------------------------------------
// process()
// ---------------------------------------------------------------------------

/// Result of running one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOutcome {
    pub chunk:  WorkChunk,
    /// Candidates actually compared, including the match itself.
    pub tested: u128,
    pub found:  Option<String>,
}

/// Test every index of `chunk` against the job's target.
///
/// Checks `state` before the first index and then every `check_interval`
/// indices; if another worker has already matched (or the run was
/// cancelled) it returns with what it has tested so far. On a match it
/// records the candidate in `state` and stops at once.
pub fn process(chunk: &WorkChunk, job: &SearchJob, state: &SearchState) -> ChunkOutcome {
    let mut tested: u128 = 0;
    let mut remaining = chunk.len();
    let mut odo = Odometer::new(&job.alphabet, chunk.length, chunk.start);

    while remaining > 0 {
        if state.should_stop() {
            break;
        }
        let batch = remaining.min(u128::from(job.check_interval));
        for _ in 0..batch {
            tested += 1;
            if odo.current() == job.target.as_slice() {
                let candidate = odo.candidate();
                state.try_record(candidate.clone());
                return ChunkOutcome {
                    chunk: *chunk,
                    tested,
                    found: Some(candidate),
                };
            }
            odo.advance();
        }
        remaining -= batch;
    }

    ChunkOutcome {
        chunk: *chunk,
        tested,
        found: None,
    }
}
