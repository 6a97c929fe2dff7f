//! `FleetOutputObserver<W>`: bridges `FleetObserver` to an `OutputWriter`.

use tracing::warn;

use fleet_core::Tick;
use fleet_sim::{FleetObserver, RobotStatus, TickReport};

use crate::row::{RobotSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`FleetObserver`] that writes snapshots and tick summaries to any
/// [`OutputWriter`].
///
/// Observer hooks cannot fail, so the first write error is kept and can be
/// collected with [`take_error`][Self::take_error] after the run.
pub struct FleetOutputObserver<W: OutputWriter> {
    writer:        W,
    snapshot_rows: usize,
    summary_rows:  usize,
    last_error:    Option<OutputError>,
}

impl<W: OutputWriter> FleetOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, snapshot_rows: 0, summary_rows: 0, last_error: None }
    }

    /// The first write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn snapshot_rows(&self) -> usize {
        self.snapshot_rows
    }

    pub fn summary_rows(&self) -> usize {
        self.summary_rows
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> FleetObserver for FleetOutputObserver<W> {
    fn on_tick_end(&mut self, _tick: Tick, report: &TickReport) {
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(report));
        if result.is_ok() {
            self.summary_rows += 1;
        }
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, robots: &[RobotStatus]) {
        if robots.is_empty() {
            return;
        }
        let rows: Vec<RobotSnapshotRow> =
            robots.iter().map(|s| RobotSnapshotRow::from_status(tick.0, s)).collect();
        let result = self.writer.write_snapshots(&rows);
        if result.is_ok() {
            self.snapshot_rows += rows.len();
        }
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
