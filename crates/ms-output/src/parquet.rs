//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the output directory:
//! - `day_summaries.parquet`
//! - `flow_schedule.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, StringBuilder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{DaySummaryRow, FlowRow, OutputResult};

fn summary_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("simulation_id",   DataType::UInt32,  false),
        Field::new("simulation_day",  DataType::UInt32,  false),
        Field::new("policy_id",       DataType::Utf8,    false),
        Field::new("acceptance_rate", DataType::Float64, false),
        Field::new("num_public",      DataType::UInt64,  false),
        Field::new("num_private",     DataType::UInt64,  false),
        Field::new("status",          DataType::Utf8,    false),
        Field::new("failed_stage",    DataType::Utf8,    false),
        Field::new("message",         DataType::Utf8,    false),
    ]))
}

fn flow_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("simulation_id",  DataType::UInt32,  false),
        Field::new("simulation_day", DataType::UInt32,  false),
        Field::new("policy_id",      DataType::Utf8,    false),
        Field::new("flow_id",        DataType::Utf8,    false),
        Field::new("route_id",       DataType::Utf8,    false),
        Field::new("mode",           DataType::Utf8,    false),
        Field::new("vehicle_type",   DataType::Utf8,    false),
        Field::new("begin",          DataType::Float64, false),
        Field::new("end",            DataType::Float64, false),
        Field::new("period",         DataType::Float64, false),
        Field::new("vehicles",       DataType::UInt64,  false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes sweep output to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    summaries:      Option<ArrowWriter<File>>,
    flows:          Option<ArrowWriter<File>>,
    summary_schema: Arc<Schema>,
    flow_schema:    Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let summary_schema = summary_schema();
        let flow_schema = flow_schema();

        let summaries = ArrowWriter::try_new(
            File::create(dir.join("day_summaries.parquet"))?,
            Arc::clone(&summary_schema),
            Some(snappy_props()),
        )?;
        let flows = ArrowWriter::try_new(
            File::create(dir.join("flow_schedule.parquet"))?,
            Arc::clone(&flow_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            summaries: Some(summaries),
            flows: Some(flows),
            summary_schema,
            flow_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_day_summary(&mut self, row: &DaySummaryRow) -> OutputResult<()> {
        let Some(writer) = self.summaries.as_mut() else {
            return Ok(());
        };

        let mut sim_ids  = UInt32Builder::new();
        let mut days     = UInt32Builder::new();
        let mut policies = StringBuilder::new();
        let mut rates    = Float64Builder::new();
        let mut public   = UInt64Builder::new();
        let mut private  = UInt64Builder::new();
        let mut statuses = StringBuilder::new();
        let mut stages   = StringBuilder::new();
        let mut messages = StringBuilder::new();

        sim_ids.append_value(row.simulation_id);
        days.append_value(row.simulation_day);
        policies.append_value(&row.policy_id);
        rates.append_value(row.acceptance_rate);
        public.append_value(row.num_public);
        private.append_value(row.num_private);
        statuses.append_value(row.status);
        stages.append_value(row.failed_stage);
        messages.append_value(&row.message);

        let batch = RecordBatch::try_new(
            Arc::clone(&self.summary_schema),
            vec![
                Arc::new(sim_ids.finish()),
                Arc::new(days.finish()),
                Arc::new(policies.finish()),
                Arc::new(rates.finish()),
                Arc::new(public.finish()),
                Arc::new(private.finish()),
                Arc::new(statuses.finish()),
                Arc::new(stages.finish()),
                Arc::new(messages.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_flows(&mut self, rows: &[FlowRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.flows.as_mut() else {
            return Ok(());
        };

        let mut sim_ids   = UInt32Builder::new();
        let mut days      = UInt32Builder::new();
        let mut policies  = StringBuilder::new();
        let mut flow_ids  = StringBuilder::new();
        let mut route_ids = StringBuilder::new();
        let mut modes     = StringBuilder::new();
        let mut vtypes    = StringBuilder::new();
        let mut begins    = Float64Builder::new();
        let mut ends      = Float64Builder::new();
        let mut periods   = Float64Builder::new();
        let mut vehicles  = UInt64Builder::new();

        for row in rows {
            sim_ids.append_value(row.simulation_id);
            days.append_value(row.simulation_day);
            policies.append_value(&row.policy_id);
            flow_ids.append_value(&row.flow_id);
            route_ids.append_value(&row.route_id);
            modes.append_value(row.mode);
            vtypes.append_value(&row.vehicle_type);
            begins.append_value(row.begin);
            ends.append_value(row.end);
            periods.append_value(row.period);
            vehicles.append_value(row.vehicles);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.flow_schema),
            vec![
                Arc::new(sim_ids.finish()),
                Arc::new(days.finish()),
                Arc::new(policies.finish()),
                Arc::new(flow_ids.finish()),
                Arc::new(route_ids.finish()),
                Arc::new(modes.finish()),
                Arc::new(vtypes.finish()),
                Arc::new(begins.finish()),
                Arc::new(ends.finish()),
                Arc::new(periods.finish()),
                Arc::new(vehicles.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.summaries.take() {
            w.close()?;
        }
        if let Some(w) = self.flows.take() {
            w.close()?;
        }
        Ok(())
    }
}
