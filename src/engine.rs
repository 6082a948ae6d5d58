use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::{debug, error, info, warn};

use crate::alphabet::Alphabet;
use crate::error::KeyspaceError;
use crate::indexer::{space_size, total_combinations};
use crate::partition::{partition, ChunkPolicy, WorkChunk};
use crate::results::{Progress, SearchResult};
use crate::traits::Reporter;
use crate::worker::{process, ChunkOutcome, SearchJob, SearchState};

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Internal options passed from the builder to `run()`.
///
/// `pub(crate)` — callers configure these via the builder methods.
pub(crate) struct EngineOptions {
    pub target:         String,
    pub alphabet:       Alphabet,
    pub max_length:     usize,
    pub threads:        usize,
    pub policy:         ChunkPolicy,
    pub check_interval: u64,
    /// Worker thread stack size; the platform default when `None`.
    pub stack_size:     Option<usize>,
}

// ---------------------------------------------------------------------------
// Worker messages
// ---------------------------------------------------------------------------

/// Message sent from a worker thread to the coordinator.
enum WorkerMessage {
    /// The chunk ran to completion, to a match, or to an early stop.
    Done(ChunkOutcome),

    /// Processing the chunk panicked.
    Failed {
        worker_id: usize,
        chunk:     WorkChunk,
        message:   String,
    },
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Execute an exhaustive search for `opts.target`.
///
/// This is the coordinator — all parallelism lives here. Lengths are
/// searched strictly in order, shortest first; each length's chunks are
/// fed lazily into a bounded queue drained by `opts.threads` scoped worker
/// threads, and the next length starts only once every dispatched chunk of
/// the current one has reported back.
///
/// `tested_total` is owned here and only ever grows by the counts workers
/// return with their completed chunks.
pub(crate) fn run(
    opts: EngineOptions,
    state: &SearchState,
    reporter: &mut dyn Reporter,
) -> Result<SearchResult, KeyspaceError> {
    execute(opts, state, reporter, process)
}

/// [`run`] with the per-chunk work supplied by the caller.
fn execute<P>(
    opts: EngineOptions,
    state: &SearchState,
    reporter: &mut dyn Reporter,
    process: P,
) -> Result<SearchResult, KeyspaceError>
where
    P: Fn(&WorkChunk, &SearchJob, &SearchState) -> ChunkOutcome + Sync,
{
    let overflow = || KeyspaceError::Overflow {
        alphabet_size: opts.alphabet.len(),
        max_length:    opts.max_length,
    };
    let total = total_combinations(opts.alphabet.len(), opts.max_length).ok_or_else(overflow)?;

    if total == 0 {
        debug!("empty search space, nothing to dispatch");
        let result = SearchResult::empty();
        reporter.finish(&result);
        return Ok(result);
    }

    let job = SearchJob::new(opts.alphabet.clone(), &opts.target)
        .with_check_interval(opts.check_interval);
    let target_len = job.target_len();
    if !(1..=opts.max_length).contains(&target_len) || !job.alphabet().covers(&opts.target) {
        warn!(
            "target is outside the declared space (length {target_len}, max {}); \
             scanning all {total} candidates anyway",
            opts.max_length
        );
    }

    let capacity = opts.threads.saturating_mul(2).max(1);

    let start = Instant::now();

    let outcome = thread::scope(|s| {
        let (chunk_tx, chunk_rx) = bounded::<WorkChunk>(capacity);
        let (msg_tx, msg_rx) = unbounded::<WorkerMessage>();

        for worker_id in 0..opts.threads {
            let chunks = chunk_rx.clone();
            let messages = msg_tx.clone();
            let job = &job;
            let process = &process;

            let mut builder = thread::Builder::new().name(format!("keyspace-worker-{worker_id}"));
            if let Some(bytes) = opts.stack_size {
                builder = builder.stack_size(bytes);
            }
            let spawned = builder.spawn_scoped(s, move || {
                worker_loop(worker_id, job, state, process, chunks, messages)
            });
            if let Err(e) = spawned {
                error!("failed to spawn worker {worker_id}: {e}");
                // Workers already running see the queue close on return.
                state.cancel();
                return Err(KeyspaceError::Internal(format!(
                    "failed to spawn worker {worker_id}: {e}"
                )));
            }
        }
        drop(chunk_rx);
        drop(msg_tx);

        let mut coordinator = Coordinator {
            opts: &opts,
            state,
            reporter: &mut *reporter,
            chunk_tx: &chunk_tx,
            msg_rx: &msg_rx,
            capacity,
            total,
            start,
            tested_total: 0,
        };
        let outcome = coordinator.search();
        if outcome.is_err() {
            state.cancel();
        }
        // Closing the queue lets idle workers exit so the scope can join.
        drop(chunk_tx);
        outcome
    });

    let (candidate, tested_total) = outcome?;
    let cancelled = candidate.is_none() && state.is_cancelled();
    let result = SearchResult::compute(candidate, tested_total, total, start.elapsed(), cancelled);

    match &result.candidate {
        Some(c) => info!("match {c:?} after {tested_total} candidates"),
        None if cancelled => info!("cancelled after {tested_total} candidates"),
        None => info!("no match in {tested_total} candidates"),
    }
    reporter.finish(&result);
    Ok(result)
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

struct Coordinator<'a, 'r> {
    opts:         &'a EngineOptions,
    state:        &'a SearchState,
    reporter:     &'a mut (dyn Reporter + 'r),
    chunk_tx:     &'a Sender<WorkChunk>,
    msg_rx:       &'a Receiver<WorkerMessage>,
    capacity:     usize,
    total:        u128,
    start:        Instant,
    tested_total: u128,
}

impl Coordinator<'_, '_> {
    /// Walk lengths `1..=max_length`. Returns the match, if any, and the
    /// number of candidates tested.
    fn search(&mut self) -> Result<(Option<String>, u128), KeyspaceError> {
        let mut found = None;
        for length in 1..=self.opts.max_length {
            if found.is_some() || self.state.is_cancelled() {
                break;
            }
            found = self.search_length(length)?;
        }
        Ok((found, self.tested_total))
    }

    /// Dispatch every chunk of one length and wait for all of them.
    fn search_length(&mut self, length: usize) -> Result<Option<String>, KeyspaceError> {
        let size = space_size(self.opts.alphabet.len(), length).ok_or(KeyspaceError::Overflow {
            alphabet_size: self.opts.alphabet.len(),
            max_length:    self.opts.max_length,
        })?;
        let mut chunks = partition(length, size, self.opts.threads, &self.opts.policy);
        debug!(
            "length {length}: {size} candidates in {} chunks of {}",
            chunks.remaining(),
            chunks.chunk_size()
        );

        let mut found = None;
        let mut in_flight = 0usize;
        loop {
            // Top the queue up; never more in flight than it can hold, so
            // `send` does not block while results are waiting.
            while in_flight < self.capacity && !self.state.should_stop() {
                let Some(chunk) = chunks.next() else { break };
                self.chunk_tx
                    .send(chunk)
                    .map_err(|_| KeyspaceError::Internal("chunk queue closed".into()))?;
                in_flight += 1;
            }
            if in_flight == 0 {
                break;
            }

            let message = self
                .msg_rx
                .recv()
                .map_err(|_| KeyspaceError::Internal("all workers exited".into()))?;
            in_flight -= 1;

            match message {
                WorkerMessage::Done(outcome) => {
                    self.tested_total += outcome.tested;
                    let event = Progress::compute(
                        length,
                        outcome.tested,
                        self.tested_total,
                        self.total,
                        self.start.elapsed(),
                    );
                    self.reporter.progress(&event);
                    if found.is_none() {
                        found = outcome.found;
                    }
                }
                WorkerMessage::Failed {
                    worker_id,
                    chunk,
                    message,
                } => {
                    error!(
                        "worker {worker_id} failed on length {} [{}, {}): {message}",
                        chunk.length, chunk.start, chunk.end
                    );
                    return Err(KeyspaceError::Internal(format!(
                        "worker {worker_id} failed: {message}"
                    )));
                }
            }
        }
        Ok(found)
    }
}

// ---------------------------------------------------------------------------
// Worker thread
// ---------------------------------------------------------------------------

/// Pull chunks until the queue closes, reporting each outcome.
fn worker_loop<P>(
    worker_id: usize,
    job: &SearchJob,
    state: &SearchState,
    process: &P,
    chunks: Receiver<WorkChunk>,
    messages: Sender<WorkerMessage>,
) where
    P: Fn(&WorkChunk, &SearchJob, &SearchState) -> ChunkOutcome,
{
    for chunk in chunks.iter() {
        let message = match panic::catch_unwind(AssertUnwindSafe(|| process(&chunk, job, state))) {
            Ok(outcome) => WorkerMessage::Done(outcome),
            Err(payload) => WorkerMessage::Failed {
                worker_id,
                chunk,
                message: panic_message(payload.as_ref()),
            },
        };
        if messages.send(message).is_err() {
            break;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
