//! The `OutputWriter` trait implemented by all backend writers.

use crate::{DaySummaryRow, FlowRow, OutputResult};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// Errors are stored by the observer and retrieved with
/// [`SweepOutputObserver::take_error`][crate::SweepOutputObserver::take_error].
pub trait OutputWriter {
    /// Write the summary row of one finished day.
    fn write_day_summary(&mut self, row: &DaySummaryRow) -> OutputResult<()>;

    /// Write the flows one day planned.
    fn write_flows(&mut self, rows: &[FlowRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
