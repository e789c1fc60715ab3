//! Simulated time inside one day.
//!
//! The external simulator works in seconds from the start of the simulated
//! day.  Windows are `f64` so that templates may use fractional bounds.

use std::fmt;

/// One simulated day: 24 h in seconds.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// A `[start, end]` emission window in seconds.
#[derive(Copy, Clone, PartialEq, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end:   f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// `[0, 86400]`.
    pub fn full_day() -> Self {
        Self::new(0.0, SECONDS_PER_DAY)
    }

    /// Window length in seconds.  Negative if the window is inverted.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// `true` if both bounds are finite, non-negative and `end > start`.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start >= 0.0 && self.end > self.start
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::full_day()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}s, {}s]", self.start, self.end)
    }
}
