//! The `AcceptanceModel` trait: the seam the sweep is generic over.

use ms_core::DayNumber;

/// Maps an elapsed day to the fraction of the population that takes public
/// transport.
///
/// Implementations must be pure: the sweep may evaluate days out of order and
/// on several threads at once, so the result may depend only on `day` and on
/// immutable state fixed at construction.  [`Policy`][crate::Policy] is the
/// built-in implementation.
///
/// Feeding simulated outcomes back into later days (closed-loop adaptation)
/// is deliberately outside this contract.
pub trait AcceptanceModel: Send + Sync {
    /// Identifier stamped on every artifact produced under this model.
    fn policy_id(&self) -> &str;

    /// Acceptance rate for the 0-based elapsed `day`.
    ///
    /// `day` may be fractional or negative.  The result is in `[0, 1]` for
    /// every well-formed model; callers that need a hard guarantee clamp.
    fn acceptance_rate(&self, day: f64) -> f64;

    /// Acceptance rate on a labelled day of the sweep (day 1 is elapsed day 0).
    fn acceptance_on(&self, day: DayNumber) -> f64 {
        self.acceptance_rate(day.elapsed() as f64)
    }
}
