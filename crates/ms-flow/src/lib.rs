//! `ms-flow`: from an acceptance rate to the flows one simulated day emits.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`template`]    | `RouteTemplate`, `RouteFlowTemplate` (mode-partitioned)     |
//! | [`loader`]      | `load_templates_csv`, `load_templates_reader`               |
//! | [`plan`]        | `build_day_plan`, `DayFlowPlan`, `FlowEntry`, `PlanOptions` |
//! | [`vehicle`]     | `VehicleType` definitions (`car`, `bus`)                    |
//! | [`routes_xml`]  | `write_routes`, `write_routes_file`                         |
//! | [`error`]       | `FlowError`, `FlowResult<T>`                                |
//!
//! # Planning (summary)
//!
//! ```text
//! num_public  = round(population * clamp(rate, 0, 1))
//! num_private = population - num_public
//! vehicles_r  = largest-remainder share of its mode's population
//! period_r    = max(min_period, (end - start) / vehicles_r)
//! ```
//!
//! Routes that receive no vehicles are planned without a flow.

pub mod error;
pub mod loader;
pub mod plan;
pub mod routes_xml;
pub mod template;
pub mod vehicle;

#[cfg(test)]
mod tests;

pub use error::{FlowError, FlowResult};
pub use loader::{load_templates_csv, load_templates_reader};
pub use plan::{DayFlowPlan, FlowEntry, PlanOptions, RouteEntry, allocate_vehicles, build_day_plan, split_population};
pub use routes_xml::{write_routes, write_routes_file};
pub use template::{RouteFlowTemplate, RouteTemplate};
pub use vehicle::VehicleType;
