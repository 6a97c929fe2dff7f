//! The `OutputWriter` trait.

use crate::{OutputResult, RobotSnapshotRow, TickSummaryRow};

/// A telemetry sink.
///
/// The observer stores the first error a writer returns; see
/// [`FleetOutputObserver::take_error`][crate::FleetOutputObserver::take_error].
pub trait OutputWriter {
    fn write_snapshots(&mut self, rows: &[RobotSnapshotRow]) -> OutputResult<()>;

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush everything.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
