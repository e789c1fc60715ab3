//! `ms-policy`: how a policy turns elapsed days into a public-transport
//! acceptance rate.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                         |
//! |-------------|------------------------------------------------------------------|
//! | [`curve`]   | `linear_acceptance`, `logistic_acceptance`                       |
//! | [`utility`] | `TripAttributes`, `UtilityWeights`, `probability_public` (logit) |
//! | [`policy`]  | `Policy`, `PolicyKind`, `PolicySpec` (raw descriptor)            |
//! | [`model`]   | `AcceptanceModel` trait                                          |
//! | [`error`]   | `PolicyError`, `PolicyResult<T>`                                 |
//!
//! # Design notes
//!
//! Acceptance is a pure function of `(policy, day)`.  Nothing is cached and
//! nothing depends on what the simulator produced on earlier days, so any day
//! can be recomputed (or computed on another thread) in isolation.  The day is
//! a real number: the curves are defined for fractional and negative days
//! even though the sweep only ever asks for `0, 1, 2, …`.

pub mod curve;
pub mod error;
pub mod model;
pub mod policy;
pub mod utility;

#[cfg(test)]
mod tests;

pub use curve::{linear_acceptance, logistic_acceptance};
pub use error::{PolicyError, PolicyResult};
pub use model::AcceptanceModel;
pub use policy::{Policy, PolicyKind, PolicySpec};
pub use utility::{TripAttributes, UtilityWeights, probability_public};
