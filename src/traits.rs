use crate::results::{Progress, SearchResult};

/// Receives the engine's progress stream and its terminal summary.
///
/// Implement this to drive a progress bar or to record events in a test.
/// The engine calls it from the coordinating thread only, one
/// event at a time, so implementations need no internal locking.
///
/// Progress events arrive once per completed chunk, in completion order.
/// That order is not index order: chunks of the same length finish in
/// whatever order the workers get to them. `finish` is called exactly once
/// per successful run, after the last progress event.
///
/// # Example
///
/// ```rust
/// use keyspace::{Progress, Reporter, SearchResult};
///
/// #[derive(Default)]
/// struct Tally {
///     events: usize,
///     done:   bool,
/// }
///
/// impl Reporter for Tally {
///     fn progress(&mut self, _event: &Progress) {
///         self.events += 1;
///     }
///
///     fn finish(&mut self, _result: &SearchResult) {
///         self.done = true;
///     }
/// }
/// ```
pub trait Reporter: Send {
    /// A chunk completed.
    fn progress(&mut self, event: &Progress) {
        let _ = event;
    }

    /// The run completed (found, exhausted or cancelled).
    fn finish(&mut self, result: &SearchResult) {
        let _ = result;
    }
}

