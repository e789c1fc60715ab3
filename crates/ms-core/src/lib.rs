//! `ms-core`: foundational types for the `modeshift` policy sweep.
//!
//! This crate is a dependency of every other `ms-*` crate.  It has no `ms-*`
//! dependencies and only `rand`, `serde` and `thiserror` externally.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `SimulationId`, `DayNumber`, `DayKey`                 |
//! | [`mode`]        | `TravelMode` (private / public)                       |
//! | [`time`]        | `TimeWindow`, `SECONDS_PER_DAY`                       |
//! | [`rng`]         | `SeedSequence`, per-(simulation, day) seeds           |
//! | [`config`]      | `SweepConfig`, `SimulatorConfig`, `ConverterConfig`   |
//! | [`error`]       | `CoreError`, `CoreResult`                             |

pub mod config;
pub mod error;
pub mod ids;
pub mod mode;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ConverterConfig, SimulatorConfig, SweepConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{DayKey, DayNumber, SimulationId};
pub use mode::TravelMode;
pub use rng::SeedSequence;
pub use time::{SECONDS_PER_DAY, TimeWindow};
