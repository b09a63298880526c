//! Writer traits implemented by the CSV and text backends.

use crate::{EventRow, OutputResult, SnapshotRow};

/// Sink for event rows.  Driven from the [`EventLogger`][crate::EventLogger]
/// thread, hence `Send`.
pub trait EventWriter: Send {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()>;

    /// Push buffered rows to the underlying handle.
    fn flush(&mut self) -> OutputResult<()>;

    /// Flush and close the underlying handle.
    ///
    /// Idempotent; later calls do nothing.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Sink for snapshot rows.
pub trait SnapshotWriter {
    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> OutputResult<()>;

    fn flush(&mut self) -> OutputResult<()>;

    /// Idempotent; later calls do nothing.
    fn finish(&mut self) -> OutputResult<()>;
}
