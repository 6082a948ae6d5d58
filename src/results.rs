use std::fmt;
use std::time::Duration;

/// Candidates per second; `0.0` on a zero-duration interval.
pub(crate) fn rate(tested: u128, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        tested as f64 / secs
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Eta
// ---------------------------------------------------------------------------

/// Estimated time to exhaust the remaining space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Eta {
    Finite(Duration),

    /// No throughput measured yet, or too far out to represent.
    Unbounded,
}

impl Eta {
    pub(crate) fn compute(remaining: u128, rate: f64) -> Self {
        if rate <= 0.0 {
            return Self::Unbounded;
        }
        match Duration::try_from_secs_f64(remaining as f64 / rate) {
            Ok(d)  => Self::Finite(d),
            Err(_) => Self::Unbounded,
        }
    }

    /// Seconds remaining, `f64::INFINITY` when unbounded.
    pub fn as_secs_f64(&self) -> f64 {
        match self {
            Self::Finite(d) => d.as_secs_f64(),
            Self::Unbounded => f64::INFINITY,
        }
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(d) => write!(f, "{:.1}s", d.as_secs_f64()),
            Self::Unbounded => f.write_str("∞"),
        }
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// One progress event, emitted each time a chunk completes.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Length of the space the completed chunk belongs to.
    pub length: usize,

    /// Candidates the completed chunk tested.
    pub tested_delta: u128,

    /// Running total over the whole run.
    pub tested_total: u128,

    /// `Σ A^l` for the run; `tested_total` never exceeds it.
    pub total_combinations: u128,

    /// Time since the run started.
    pub elapsed: Duration,

    /// `tested_total / elapsed`.
    pub rate: f64,

    /// `(total_combinations - tested_total) / rate`.
    pub eta: Eta,
}

impl Progress {
    pub(crate) fn compute(
        length: usize,
        tested_delta: u128,
        tested_total: u128,
        total_combinations: u128,
        elapsed: Duration,
    ) -> Self {
        let rate = rate(tested_total, elapsed);
        let remaining = total_combinations.saturating_sub(tested_total);
        Self {
            length,
            tested_delta,
            tested_total,
            total_combinations,
            elapsed,
            rate,
            eta: Eta::compute(remaining, rate),
        }
    }

    /// Fraction of the space covered, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.total_combinations == 0 {
            1.0
        } else {
            self.tested_total as f64 / self.total_combinations as f64
        }
    }
}

// ---------------------------------------------------------------------------
// SearchResult
// ---------------------------------------------------------------------------

/// The terminal summary of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub found: bool,

    /// The matched candidate; equal to the target whenever `found`.
    pub candidate: Option<String>,

    /// Candidates compared across all workers, including any tested by
    /// in-flight chunks after the match.
    pub tested_total: u128,

    /// Size of the declared space, `Σ A^l` for `l` in `1..=max_length`.
    pub total_combinations: u128,

    /// Wall-clock time from run start to completion.
    pub elapsed: Duration,

    /// `tested_total / elapsed`, clamped to 0 on zero-duration runs.
    pub average_rate: f64,

    /// The caller cancelled the run before it finished.
    pub cancelled: bool,
}

impl SearchResult {
    pub(crate) fn compute(
        candidate: Option<String>,
        tested_total: u128,
        total_combinations: u128,
        elapsed: Duration,
        cancelled: bool,
    ) -> Self {
        Self {
            found: candidate.is_some(),
            candidate,
            tested_total,
            total_combinations,
            elapsed,
            average_rate: rate(tested_total, elapsed),
            cancelled,
        }
    }

    /// The result of a run over an empty space: nothing dispatched.
    pub(crate) fn empty() -> Self {
        Self::compute(None, 0, 0, Duration::ZERO, false)
    }
}
