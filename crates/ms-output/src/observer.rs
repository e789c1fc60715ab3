//! `SweepOutputObserver<W>`: bridges `SweepObserver` to an `OutputWriter`.

use ms_sim::{DayRecord, SimulationRun, SweepObserver};

use crate::row::{DaySummaryRow, FlowRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SweepObserver`] that writes one summary row and the planned flows of
/// every finished day to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SweepObserver`
/// methods have no return value.  After `sweep.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct SweepOutputObserver<W: OutputWriter> {
    writer:     W,
    days:       u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SweepOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, days: 0, last_error: None }
    }

    /// Take the stored write error (if any) after `sweep.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Days written so far.
    pub fn days_written(&self) -> u64 {
        self.days
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            log::error!("output write failed: {e}");
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SweepObserver for SweepOutputObserver<W> {
    fn on_day_end(&mut self, record: &DayRecord) {
        let result = self.writer.write_day_summary(&DaySummaryRow::from_record(record));
        self.store_err(result);

        let flows = FlowRow::from_record(record);
        if !flows.is_empty() {
            let result = self.writer.write_flows(&flows);
            self.store_err(result);
        }
        self.days += 1;
    }

    fn on_sweep_end(&mut self, _runs: &[SimulationRun]) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
