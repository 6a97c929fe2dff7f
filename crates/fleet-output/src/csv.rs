//! CSV output backend.
//!
//! Creates two files in the output directory:
//! - `robot_snapshots.csv`
//! - `tick_summaries.csv`
//!
//! Absent optional values (no lane, no destination, never charged) are
//! written as empty fields.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, RobotSnapshotRow, TickSummaryRow};

pub const SNAPSHOT_HEADER: [&str; 7] =
    ["robot_id", "tick", "state", "vertex", "lane", "destination", "charge_level"];
pub const SUMMARY_HEADER: [&str; 6] = ["tick", "moved", "waiting", "arrived", "charging", "commands"];

/// Writes fleet telemetry to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write their headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("robot_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self { snapshots, summaries, finished: false })
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[RobotSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.robot_id.to_string(),
                row.tick.to_string(),
                row.state.as_str().to_owned(),
                row.vertex.to_string(),
                opt(row.lane),
                opt(row.destination),
                opt(row.charge_level),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.moved.to_string(),
            row.waiting.to_string(),
            row.arrived.to_string(),
            row.charging.to_string(),
            row.commands.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
