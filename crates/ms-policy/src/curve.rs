//! Time-based acceptance curves.

/// `clamp(base + slope * day, 0, 1)`.
///
/// Clamping produces flat saturation regions at 0 and 1; a policy that keeps
/// growing after saturation stays at 1.
#[inline]
pub fn linear_acceptance(base: f64, slope: f64, day: f64) -> f64 {
    (base + slope * day).clamp(0.0, 1.0)
}

/// `l / (1 + exp(-k * (day - x0)))`.
///
/// Tends to `l` as `day → ∞` and to 0 as `day → -∞`, passing through `l / 2`
/// at the inflection day `x0`.  `l` is not clamped: keeping `l <= 1` is the
/// caller's job, and a misconfigured asymptote stays visible in the output.
#[inline]
pub fn logistic_acceptance(l: f64, k: f64, x0: f64, day: f64) -> f64 {
    l / (1.0 + (-k * (day - x0)).exp())
}
