//! CSV route-template loader.
//!
//! # CSV format
//!
//! One row per route template.  `edges` is a space-separated path.
//!
//! ```csv
//! mode,flow_id,edges,begin,end,share
//! private,flow_0,A4B4 B4C4 C4D4 D4E4,0,86400,1.0
//! public,flow_1,A2A3 A3B3 B3C3,0,86400,1.0
//! ```
//!
//! `begin` and `end` may be left empty to mean the full day.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ms_core::{SECONDS_PER_DAY, TimeWindow, TravelMode};

use crate::template::split_edges;
use crate::{FlowError, FlowResult, RouteFlowTemplate, RouteTemplate};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TemplateRecord {
    mode:    String,
    flow_id: String,
    edges:   String,
    begin:   Option<f64>,
    end:     Option<f64>,
    share:   f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a mode-partitioned route template from a CSV file.
pub fn load_templates_csv(path: &Path) -> FlowResult<RouteFlowTemplate> {
    let file = std::fs::File::open(path).map_err(FlowError::Io)?;
    load_templates_reader(file)
}

/// Like [`load_templates_csv`] but accepts any `Read` source.
pub fn load_templates_reader<R: Read>(reader: R) -> FlowResult<RouteFlowTemplate> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut private = Vec::new();
    let mut public = Vec::new();

    for (line, result) in csv_reader.deserialize::<TemplateRecord>().enumerate() {
        let row = result.map_err(|e| FlowError::Parse(e.to_string()))?;
        let mode: TravelMode = row
            .mode
            .parse()
            .map_err(|e: ms_core::CoreError| FlowError::Parse(format!("row {}: {e}", line + 1)))?;
        let window = TimeWindow::new(row.begin.unwrap_or(0.0), row.end.unwrap_or(SECONDS_PER_DAY));
        let template = RouteTemplate::new(row.flow_id, split_edges(&row.edges), window, row.share)?;
        match mode {
            TravelMode::Private => private.push(template),
            TravelMode::Public  => public.push(template),
        }
    }

    RouteFlowTemplate::new(private, public)
}
