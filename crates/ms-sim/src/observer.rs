//! Sweep observer trait for progress reporting and data collection.

use ms_core::SimulationId;

use crate::{DayRecord, SimulationRun};

/// Callbacks invoked by [`Sweep::run`][crate::Sweep::run].
///
/// All methods have default no-op implementations.  With the `parallel`
/// feature the days are computed on a pool, but these callbacks are still
/// made from the calling thread, in simulation and day order.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SweepObserver for Progress {
///     fn on_day_end(&mut self, record: &DayRecord) {
///         println!("{}: {}", record.key, record.status());
///     }
/// }
/// ```
pub trait SweepObserver {
    /// Called once before any day runs, with the number of day tasks.
    fn on_sweep_start(&mut self, _tasks: u64) {}

    fn on_run_start(&mut self, _simulation: SimulationId) {}

    /// Called after every day, failed or not.
    fn on_day_end(&mut self, _record: &DayRecord) {}

    fn on_run_end(&mut self, _run: &SimulationRun) {}

    /// Called once after the last run.
    fn on_sweep_end(&mut self, _runs: &[SimulationRun]) {}
}

/// A [`SweepObserver`] that does nothing.
pub struct NoopObserver;

impl SweepObserver for NoopObserver {}
