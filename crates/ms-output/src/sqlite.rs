//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `sweep.db` file in the output directory with two tables:
//! `day_summaries` and `flow_schedule`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{DaySummaryRow, FlowRow, OutputResult};

/// Writes sweep output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `sweep.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("sweep.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS day_summaries (
                 simulation_id   INTEGER NOT NULL,
                 simulation_day  INTEGER NOT NULL,
                 policy_id       TEXT    NOT NULL,
                 acceptance_rate REAL    NOT NULL,
                 num_public      INTEGER NOT NULL,
                 num_private     INTEGER NOT NULL,
                 status          TEXT    NOT NULL,
                 failed_stage    TEXT    NOT NULL,
                 message         TEXT    NOT NULL,
                 PRIMARY KEY (simulation_id, simulation_day, policy_id)
             );
             CREATE TABLE IF NOT EXISTS flow_schedule (
                 simulation_id  INTEGER NOT NULL,
                 simulation_day INTEGER NOT NULL,
                 policy_id      TEXT    NOT NULL,
                 flow_id        TEXT    NOT NULL,
                 route_id       TEXT    NOT NULL,
                 mode           TEXT    NOT NULL,
                 vehicle_type   TEXT    NOT NULL,
                 begin_secs     REAL    NOT NULL,
                 end_secs       REAL    NOT NULL,
                 period         REAL    NOT NULL,
                 vehicles       INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_day_summary(&mut self, row: &DaySummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO day_summaries \
             (simulation_id, simulation_day, policy_id, acceptance_rate, num_public, \
              num_private, status, failed_stage, message) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                row.simulation_id,
                row.simulation_day,
                row.policy_id,
                row.acceptance_rate,
                row.num_public as i64,
                row.num_private as i64,
                row.status,
                row.failed_stage,
                row.message,
            ],
        )?;
        Ok(())
    }

    fn write_flows(&mut self, rows: &[FlowRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO flow_schedule \
                 (simulation_id, simulation_day, policy_id, flow_id, route_id, mode, \
                  vehicle_type, begin_secs, end_secs, period, vehicles) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.simulation_id,
                    row.simulation_day,
                    row.policy_id,
                    row.flow_id,
                    row.route_id,
                    row.mode,
                    row.vehicle_type,
                    row.begin,
                    row.end,
                    row.period,
                    row.vehicles as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
