use std::time::{Duration, Instant};

use log::info;

use crate::alphabet::{Alphabet, Preset};
use crate::engine::{run, EngineOptions};
use crate::error::KeyspaceError;
use crate::estimate::format_count;
use crate::partition::ChunkPolicy;
use crate::results::{Progress, SearchResult};
use crate::traits::Reporter;
use crate::worker::{SearchState, CHECK_INTERVAL};

// ---------------------------------------------------------------------------
// SearchBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and executing a keyspace search.
///
/// Created via [`keyspace::search()`](crate::search). Configure with chained
/// builder methods, then call [`run()`](SearchBuilder::run) to execute.
///
/// # Example
///
/// ```rust,ignore
/// let result = keyspace::search("secret")
///     .preset(Preset::Letters)
///     .max_length(6)
///     .threads(8)
///     .reporter(LogReporter::default())
///     .run()?;
/// ```
pub struct SearchBuilder {
    target:         String,
    alphabet:       Alphabet,
    max_length:     usize,
    threads:        usize,
    policy:         ChunkPolicy,
    check_interval: u64,
    stack_size:     Option<usize>,
    reporter:       Box<dyn Reporter>,
}

impl SearchBuilder {
    pub(crate) fn new(target: String) -> Self {
        let max_length = target.chars().count();
        Self {
            target,
            alphabet:       Preset::LettersDigits.into(),
            max_length,
            threads:        num_cpus(),
            policy:         ChunkPolicy::default(),
            check_interval: CHECK_INTERVAL,
            stack_size:     None,
            reporter:       Box::new(NullReporter),
        }
    }

    // ── Space ─────────────────────────────────────────────────────────────

    /// Search over a custom alphabet. Symbol order defines candidate order.
    ///
    /// Defaults to [`Preset::LettersDigits`].
    pub fn alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Search over one of the named presets.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.alphabet = preset.into();
        self
    }

    /// Longest candidate length to try. Lengths `1..=n` are searched in
    /// order. `0` is accepted and yields an immediate not-found result.
    ///
    /// Defaults to the target's length in symbols.
    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = n;
        self
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Number of worker threads.
    ///
    /// Defaults to the number of logical CPU cores.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = n;
        self
    }

    /// Smallest chunk handed to a worker. Defaults to
    /// [`MIN_CHUNK_SIZE`](crate::partition::MIN_CHUNK_SIZE).
    pub fn min_chunk_size(mut self, n: u128) -> Self {
        self.policy.min_chunk_size = n.max(1);
        self
    }

    /// Target chunks per worker per length. Defaults to
    /// [`OVERSUBSCRIPTION`](crate::partition::OVERSUBSCRIPTION).
    pub fn oversubscription(mut self, n: usize) -> Self {
        self.policy.oversubscription = n.max(1);
        self
    }

    /// How many candidates a worker tests between looks at the shared
    /// found flag. Smaller reacts faster to a match elsewhere; larger
    /// spends less time on the check.
    pub fn check_interval(mut self, n: u64) -> Self {
        self.check_interval = n.max(1);
        self
    }

    /// Stack size in bytes for each worker thread. Platform default if unset.
    pub fn worker_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Where progress events and the final summary go. Discarded by default.
    pub fn reporter(mut self, r: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(r);
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Execute the search and return the summary.
    ///
    /// Blocks until the target is found or the space is exhausted.
    ///
    /// # Errors
    ///
    /// [`KeyspaceError::InvalidThreadCount`] for zero threads,
    /// [`KeyspaceError::Overflow`] if the space cannot be counted in a
    /// `u128`, and [`KeyspaceError::Internal`] if a worker cannot be
    /// started or fails.
    pub fn run(self) -> Result<SearchResult, KeyspaceError> {
        let state = SearchState::new();
        self.run_with_state(&state)
    }

    /// Like [`run()`](SearchBuilder::run), but against caller-owned state.
    ///
    /// Keep a reference to `state` on another thread and call
    /// [`SearchState::cancel`] to stop the run early; it then returns with
    /// `cancelled` set and the partial count.
    ///
    /// # Errors
    ///
    /// As [`run()`](SearchBuilder::run), plus [`KeyspaceError::StateInUse`]
    /// if `state` already recorded a match in an earlier run.
    pub fn run_with_state(mut self, state: &SearchState) -> Result<SearchResult, KeyspaceError> {
        if self.threads == 0 {
            return Err(KeyspaceError::InvalidThreadCount(self.threads));
        }
        // A set found flag would keep every worker idle and the run would
        // report an exhausted space.
        if state.is_found() {
            return Err(KeyspaceError::StateInUse);
        }

        let opts = EngineOptions {
            target:         self.target,
            alphabet:       self.alphabet,
            max_length:     self.max_length,
            threads:        self.threads,
            policy:         self.policy,
            check_interval: self.check_interval,
            stack_size:     self.stack_size,
        };

        run(opts, state, self.reporter.as_mut())
    }
}

// ---------------------------------------------------------------------------
// Built-in reporters
// ---------------------------------------------------------------------------

/// Discards every event. Used when no reporter is specified.
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Logs progress at `info` level, at most once per interval, and the
/// summary when the run ends.
pub struct LogReporter {
    interval: Duration,
    last:     Option<Instant>,
}

impl LogReporter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }
}

impl Default for LogReporter {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

impl Reporter for LogReporter {
    fn progress(&mut self, event: &Progress) {
        let now = Instant::now();
        if self.last.is_some_and(|t| now.duration_since(t) < self.interval) {
            return;
        }
        self.last = Some(now);
        info!(
            "length {}: {} tested ({:.1}%), {} /s, eta {}",
            event.length,
            format_count(event.tested_total),
            event.fraction() * 100.0,
            format_count(event.rate as u128),
            event.eta
        );
    }

    fn finish(&mut self, result: &SearchResult) {
        info!(
            "{} tested in {:.2}s ({} /s)",
            format_count(result.tested_total),
            result.elapsed.as_secs_f64(),
            format_count(result.average_rate as u128)
        );
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Get the logical CPU count, with a safe fallback.
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
