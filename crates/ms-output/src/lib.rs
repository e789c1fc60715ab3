//! `ms-output`: run summaries, flow schedules and result aggregation for the
//! modeshift sweep.
//!
//! Three backends for the per-day rows are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                        |
//! |-----------|-------------|------------------------------------------------------|
//! | *(none)*  | CSV         | `summary_per_run.csv`, `flow_schedule.csv`           |
//! | `sqlite`  | SQLite      | `sweep.db`                                           |
//! | `parquet` | Parquet     | `day_summaries.parquet`, `flow_schedule.parquet`     |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`SweepOutputObserver`], which implements `ms_sim::SweepObserver`.
//!
//! After the sweep, [`aggregate_tables`] concatenates every converted
//! per-day table into `aggregated_tripinfo_emissions.csv`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ms_output::{CsvWriter, SweepOutputObserver, aggregate_tables};
//!
//! let writer = CsvWriter::new(sweep.layout().root())?;
//! let mut obs = SweepOutputObserver::new(writer);
//! let runs = sweep.run(&mut obs)?;
//! obs.take_error().map(|e| log::error!("output error: {e}"));
//! aggregate_tables(&runs, b';', &sweep.layout().aggregated_csv())?;
//! ```

pub mod aggregate;
pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use aggregate::{AggregateSummary, KEY_COLUMNS, aggregate_tables};
pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SweepOutputObserver;
pub use row::{DaySummaryRow, FlowRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
