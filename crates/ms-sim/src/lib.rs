//! `ms-sim`: the multi-day sweep orchestrator.
//!
//! # Day loop
//!
//! ```text
//! for simulation in 1..=n_simulations:
//!   for day in 1..=days_per_sim:
//!     ① Planning:   rate = model.acceptance_rate(day - 1);
//!                    plan = build_day_plan(templates, population, rate);
//!                    write flows/flows_<key>.xml
//!     ② Invoking:   simulator(-n net -r routes ... --seed <day seed>),
//!                    killed after simulator.timeout_secs
//!     ③ Collecting: for tripinfo and emissions: check raw_xml/, convert
//!                    to csv/
//! ```
//!
//! A failed stage marks the day failed and the loop continues with the next
//! day.  Acceptance depends only on the policy and the day, never on earlier
//! simulated outcomes, so every `(simulation, day)` is an independent task.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`sweep`]       | `Sweep`: `run`, `dry_run`, `run_day`, `plan_day`          |
//! | [`builder`]     | `SweepBuilder`                                            |
//! | [`simulator`]   | `Simulator` trait, `ProcessSimulator`, `SimulatorJob`     |
//! | [`convert`]     | `OutputConverter` trait, `ProcessConverter`               |
//! | [`process`]     | `run_with_timeout`, `InvocationReport`                    |
//! | [`state`]       | `SimulationRun`, `DayRecord`, `RunState`, `DayStage`      |
//! | [`layout`]      | `OutputLayout`, `OutputKind`                              |
//! | [`observer`]    | `SweepObserver`, `NoopObserver`                           |
//! | [`error`]       | `SimError`, `DayError`, `SimResult<T>`                    |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                        |
//! |------------|---------------------------------------------------------------|
//! | `parallel` | Runs day tasks on Rayon's thread pool when `config.parallel`. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ms_policy::Policy;
//! use ms_sim::{NoopObserver, ProcessSimulator, SweepBuilder};
//!
//! let policy = Policy::logistic("policy_bus_subsidy", 0.8, 0.8, 3.0)?;
//! let simulator = ProcessSimulator::new(&config.simulator);
//! let sweep = SweepBuilder::new(config, policy, templates, simulator).build()?;
//! let runs = sweep.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod convert;
pub mod error;
pub mod layout;
pub mod observer;
pub mod process;
pub mod simulator;
pub mod state;
pub mod sweep;


pub use builder::SweepBuilder;
pub use convert::{OutputConverter, ProcessConverter};
pub use error::{DayError, SimError, SimResult};
pub use layout::{OutputKind, OutputLayout};
pub use observer::{NoopObserver, SweepObserver};
pub use process::{InvocationReport, run_with_timeout};
pub use simulator::{ProcessSimulator, Simulator, SimulatorJob};
pub use state::{DayOutcome, DayRecord, DayStage, RunState, SimulationRun, TableOutput};
pub use sweep::Sweep;
