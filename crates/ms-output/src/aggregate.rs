//! Concatenate every converted per-day table into one wide table.
//!
//! The output starts with four key columns followed by the union of every
//! table's own columns in first-seen order:
//!
//! ```text
//! simulation_id,simulation_day,policy_id,output_kind,<tripinfo cols…>,<emissions-only cols…>
//! ```
//!
//! Cells a source table does not have are left empty.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder, Writer};
use ms_core::DayKey;
use ms_sim::{OutputKind, SimulationRun};
use rustc_hash::FxHashMap;

use crate::OutputResult;

pub const KEY_COLUMNS: [&str; 4] = ["simulation_id", "simulation_day", "policy_id", "output_kind"];

/// What [`aggregate_tables`] wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateSummary {
    pub tables:  usize,
    pub rows:    u64,
    /// Including the key columns.
    pub columns: usize,
    /// Tables that were listed but could not be read.
    pub skipped: Vec<PathBuf>,
}

/// One table to be concatenated.
#[derive(Debug, Clone)]
struct Source<'a> {
    key:  &'a DayKey,
    kind: OutputKind,
    path: &'a Path,
}

/// Aggregate every table recorded in `runs` into `output`.
///
/// `delimiter` is the field delimiter of the per-day tables; the aggregated
/// file is comma-separated.  Tables that cannot be opened or read are logged,
/// listed in [`AggregateSummary::skipped`] and left out entirely.  Only a
/// failure writing `output` is an error.
pub fn aggregate_tables(runs: &[SimulationRun], delimiter: u8, output: &Path) -> OutputResult<AggregateSummary> {
    let sources: Vec<Source<'_>> = runs
        .iter()
        .flat_map(|run| run.days.iter())
        .flat_map(|day| {
            day.tables.iter().map(move |t| Source { key: &day.key, kind: t.kind, path: &t.path })
        })
        .collect();

    let mut summary = AggregateSummary::default();

    // ── Pass 1: column union ──────────────────────────────────────────────
    let mut columns: Vec<String> = KEY_COLUMNS.iter().map(|c| (*c).to_owned()).collect();
    let mut index: FxHashMap<String, usize> =
        columns.iter().enumerate().map(|(i, c)| (c.clone(), i)).collect();
    let mut readable = Vec::with_capacity(sources.len());

    for source in sources {
        match read_headers(source.path, delimiter) {
            Ok(headers) => {
                for name in &headers {
                    if !index.contains_key(name) {
                        index.insert(name.clone(), columns.len());
                        columns.push(name.clone());
                    }
                }
                readable.push((source, headers));
            }
            Err(e) => {
                log::warn!("{} {}: skipping table {}: {e}", source.key, source.kind, source.path.display());
                summary.skipped.push(source.path.to_path_buf());
            }
        }
    }

    // ── Pass 2: rows ──────────────────────────────────────────────────────
    let mut writer = Writer::from_path(output)?;
    writer.write_record(&columns)?;

    for (source, headers) in readable {
        let positions: Vec<usize> = headers.iter().map(|h| index[h]).collect();
        let rows = match read_rows(&source, delimiter, &positions, columns.len()) {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("{} {}: skipping table {}: {e}", source.key, source.kind, source.path.display());
                summary.skipped.push(source.path.to_path_buf());
                continue;
            }
        };
        for row in &rows {
            writer.write_record(row)?;
        }

        log::debug!("{} {}: {} row(s) from {}", source.key, source.kind, rows.len(), source.path.display());
        summary.tables += 1;
        summary.rows += rows.len() as u64;
    }

    writer.flush()?;
    summary.columns = columns.len();
    log::info!(
        "aggregated {} table(s), {} row(s), {} column(s) into {}",
        summary.tables,
        summary.rows,
        summary.columns,
        output.display(),
    );
    Ok(summary)
}

fn open(path: &Path, delimiter: u8) -> csv::Result<csv::Reader<File>> {
    ReaderBuilder::new().delimiter(delimiter).flexible(true).from_path(path)
}

/// Header names, with invalid UTF-8 replaced.
fn read_headers(path: &Path, delimiter: u8) -> csv::Result<Vec<String>> {
    let mut reader = open(path, delimiter)?;
    Ok(reader.byte_headers()?.iter().map(lossy).collect())
}

/// Every data row of one table, laid out over the aggregated columns.
///
/// Cells are read as bytes so a stray non-UTF-8 value is replaced instead of
/// failing the table.  Any read error drops the whole table.
fn read_rows(source: &Source<'_>, delimiter: u8, positions: &[usize], width: usize) -> csv::Result<Vec<Vec<String>>> {
    let mut reader = open(source.path, delimiter)?;
    let mut record = ByteRecord::new();
    let mut rows = Vec::new();

    while reader.read_byte_record(&mut record)? {
        let mut row = vec![String::new(); width];
        row[0] = source.key.simulation.get().to_string();
        row[1] = source.key.day.get().to_string();
        row[2].push_str(&source.key.policy_id);
        row[3].push_str(source.kind.as_str());
        for (value, &pos) in record.iter().zip(positions) {
            // Key columns and repeated headers keep their first value.
            if pos >= KEY_COLUMNS.len() && row[pos].is_empty() {
                row[pos] = lossy(value);
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
