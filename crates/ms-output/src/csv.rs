//! CSV output backend.
//!
//! Creates two files in the sweep's output directory:
//! - `summary_per_run.csv`
//! - `flow_schedule.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{DaySummaryRow, FlowRow, OutputResult};

pub const SUMMARY_FILE: &str = "summary_per_run.csv";
pub const FLOW_SCHEDULE_FILE: &str = "flow_schedule.csv";

/// Writes day summaries and flow schedules to two CSV files.
pub struct CsvWriter {
    summaries: Writer<File>,
    flows:     Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut summaries = Writer::from_path(dir.join(SUMMARY_FILE))?;
        summaries.write_record(DaySummaryRow::HEADER)?;

        let mut flows = Writer::from_path(dir.join(FLOW_SCHEDULE_FILE))?;
        flows.write_record(FlowRow::HEADER)?;

        Ok(Self { summaries, flows, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_day_summary(&mut self, row: &DaySummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.simulation_id.to_string(),
            row.simulation_day.to_string(),
            row.policy_id.clone(),
            format!("{:.6}", row.acceptance_rate),
            row.num_public.to_string(),
            row.num_private.to_string(),
            row.status.to_owned(),
            row.failed_stage.to_owned(),
            row.message.clone(),
        ])?;
        Ok(())
    }

    fn write_flows(&mut self, rows: &[FlowRow]) -> OutputResult<()> {
        for row in rows {
            self.flows.write_record(&[
                row.simulation_id.to_string(),
                row.simulation_day.to_string(),
                row.policy_id.clone(),
                row.flow_id.clone(),
                row.route_id.clone(),
                row.mode.to_owned(),
                row.vehicle_type.clone(),
                row.begin.to_string(),
                row.end.to_string(),
                format!("{:.2}", row.period),
                row.vehicles.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summaries.flush()?;
        self.flows.flush()?;
        Ok(())
    }
}
