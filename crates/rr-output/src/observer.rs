//! `SnapshotObserver<W>` — bridges `SimObserver` to a `SnapshotWriter`.

use rr_sim::SimObserver;
use rr_train::Snapshot;
use tracing::warn;

use crate::row::SnapshotRow;
use crate::writer::SnapshotWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes one row per train per display refresh to
/// any [`SnapshotWriter`], flushing after each refresh.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  The observer lives on the display thread, so the
/// first error is also logged when it happens.
pub struct SnapshotObserver<W: SnapshotWriter> {
    writer:     W,
    last_seq:   Option<u64>,
    last_error: Option<OutputError>,
}

impl<W: SnapshotWriter> SnapshotObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_seq: None, last_error: None }
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "snapshot write failed");
                self.last_error = Some(e);
            }
        }
    }

    fn write(&mut self, snapshot: &Snapshot) {
        // Nothing moved since the last refresh.
        if self.last_seq == Some(snapshot.seq) {
            return;
        }
        self.last_seq = Some(snapshot.seq);
        let rows: Vec<SnapshotRow> =
            snapshot.trains.iter().map(|v| SnapshotRow::new(snapshot.seq, v)).collect();
        let result = self.writer.write_snapshots(&rows).and_then(|()| self.writer.flush());
        self.store_err(result);
    }
}

impl<W: SnapshotWriter> SimObserver for SnapshotObserver<W> {
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        self.write(snapshot);
    }

    fn on_sim_end(&mut self, snapshot: &Snapshot) {
        self.write(snapshot);
        let result = self.writer.finish();
        self.store_err(result);
    }
}

/// Drives two observers from one display thread.
pub struct Both<A, B>(pub A, pub B);

impl<A: SimObserver, B: SimObserver> SimObserver for Both<A, B> {
    fn on_start(&mut self, layout: &rr_track::TrackLayout) {
        self.0.on_start(layout);
        self.1.on_start(layout);
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        self.0.on_snapshot(snapshot);
        self.1.on_snapshot(snapshot);
    }

    fn on_sim_end(&mut self, snapshot: &Snapshot) {
        self.0.on_sim_end(snapshot);
        self.1.on_sim_end(snapshot);
    }
}
