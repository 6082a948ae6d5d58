//! # keyspace
//!
//! Exhaustive parallel keyspace search: every string over an alphabet, up to
//! a length bound, in a fixed deterministic order, until the target turns up.
//!
//! The search is index based. Each length `l` is an integer range
//! `[0, A^l)`; [`indexer`] maps an index to its candidate, [`partition`]
//! cuts the range into chunks, and the engine fans chunks out to a worker
//! pool that shares a single found flag. Lengths run strictly shortest
//! first, and the run stops as soon as any worker matches.
//!
//! # Quick Start
//!
//! ```rust
//! use keyspace::Preset;
//!
//! let result = keyspace::search("42")
//!     .preset(Preset::Digits)
//!     .max_length(2)
//!     .threads(2)
//!     .run()
//!     .unwrap();
//!
//! assert!(result.found);
//! assert_eq!(result.candidate.as_deref(), Some("42"));
//! // 10 one-digit candidates, then "00" through "42".
//! assert_eq!(result.tested_total, 53);
//! ```
//!
//! # Reporting
//!
//! Implement [`Reporter`] to receive a [`Progress`] event per completed
//! chunk and the final [`SearchResult`]:
//!
//! ```rust
//! use keyspace::{Alphabet, Progress, Reporter};
//!
//! struct Deltas(Vec<u128>);
//!
//! impl Reporter for Deltas {
//!     fn progress(&mut self, event: &Progress) {
//!         self.0.push(event.tested_delta);
//!     }
//! }
//!
//! let result = keyspace::search("zz")
//!     .alphabet(Alphabet::new("ab").unwrap())
//!     .max_length(3)
//!     .reporter(Deltas(Vec::new()))
//!     .run()
//!     .unwrap();
//!
//! assert!(!result.found);
//! assert_eq!(result.tested_total, 2 + 4 + 8);
//! ```

#![forbid(unsafe_code)]

pub mod indexer;
pub mod partition;
pub mod worker;

mod alphabet;
mod builder;
mod engine;
mod error;
mod estimate;
mod results;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use alphabet::{Alphabet, Preset};
pub use builder::{LogReporter, NullReporter, SearchBuilder};
pub use error::KeyspaceError;
pub use estimate::{format_count, Estimate, DEFAULT_ASSUMED_RATE};
pub use results::{Eta, Progress, SearchResult};
pub use traits::Reporter;
pub use worker::SearchState;

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`SearchBuilder`] looking for `target`.
///
/// # Example
///
/// ```rust
/// use keyspace::Alphabet;
///
/// let result = keyspace::search("ba")
///     .alphabet(Alphabet::new("ab").unwrap())
///     .run()
///     .unwrap();
///
/// // "a", "b", then "aa", "ab", "ba".
/// assert_eq!(result.tested_total, 5);
/// ```
pub fn search(target: impl Into<String>) -> SearchBuilder {
    SearchBuilder::new(target.into())
}
