use std::fmt;

/// Throughput assumed for pre-run estimates when none has been measured.
pub const DEFAULT_ASSUMED_RATE: f64 = 37_000_000.0;

/// Time needed to exhaust a space at a fixed rate, in several units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub seconds: f64,
    pub minutes: f64,
    pub hours:   f64,
    pub days:    f64,
    pub years:   f64,
}

impl Estimate {
    /// Estimate for `total` candidates at `rate` candidates per second.
    /// A non-positive rate gives infinite durations.
    pub fn at_rate(total: u128, rate: f64) -> Self {
        let seconds = if rate > 0.0 {
            total as f64 / rate
        } else {
            f64::INFINITY
        };
        let minutes = seconds / 60.0;
        let hours = minutes / 60.0;
        let days = hours / 24.0;
        Self {
            seconds,
            minutes,
            hours,
            days,
            years: days / 365.0,
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seconds: {:.2}", self.seconds)?;
        writeln!(f, "minutes: {:.2}", self.minutes)?;
        writeln!(f, "hours:   {:.2}", self.hours)?;
        writeln!(f, "days:    {:.2}", self.days)?;
        write!(f, "years:   {:.2}", self.years)
    }
}

/// Format `n` with `.` between groups of three digits: `1234567` → `1.234.567`.
pub fn format_count(n: u128) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
