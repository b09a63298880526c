//! Background event logger: trains hand events to a bounded channel, one
//! writer thread drains it.
//!
//! ```text
//! train-A ─┐ try_send            recv
//! train-B ─┴──────▶ [ bounded ] ──────▶ event-log thread ─▶ EventWriter
//! ```
//!
//! Trains never block on logging.  A full channel drops the event and counts
//! it; writer failures are logged and the first one is kept for
//! [`EventLogger::finish`].  The writer is flushed whenever the channel runs
//! empty, so the file on disk trails the trains by at most one burst.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use rr_train::{EventSink, TrainEvent};
use tracing::{debug, warn};

use crate::writer::EventWriter;
use crate::{EventRow, OutputError, OutputResult};

/// Default channel capacity.
pub const DEFAULT_CAPACITY: usize = 1024;

enum LogMsg {
    Event(EventRow),
    Close,
}

/// Counters reported by [`EventLogger::finish`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogStats {
    pub written: u64,
    pub dropped: u64,
    pub failed:  u64,
}

/// The [`EventSink`] half of an [`EventLogger`].  Cheap to share between
/// trains.
pub struct LogSink {
    tx:      Sender<LogMsg>,
    dropped: AtomicU64,
}

impl LogSink {
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl EventSink for LogSink {
    fn record(&self, event: &TrainEvent) {
        match self.tx.try_send(LogMsg::Event(EventRow::from(event))) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                let n = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                if n.is_power_of_two() {
                    warn!(dropped = n, "event log channel full, dropping events");
                }
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Owns the writer thread.  Call [`finish`][Self::finish] after the
/// simulation has been joined to flush everything.
pub struct EventLogger {
    sink:   Arc<LogSink>,
    thread: JoinHandle<(LogStats, Option<OutputError>)>,
}

impl EventLogger {
    /// Start the writer thread with a channel of `capacity` events.
    pub fn spawn<W: EventWriter + 'static>(writer: W, capacity: usize) -> OutputResult<Self> {
        let (tx, rx) = bounded(capacity.max(1));
        let thread = thread::Builder::new()
            .name("event-log".into())
            .spawn(move || drain(writer, rx))?;
        Ok(Self {
            sink: Arc::new(LogSink { tx, dropped: AtomicU64::new(0) }),
            thread,
        })
    }

    /// Sink to hand to [`SimBuilder::events`][rr_sim::SimBuilder::events].
    pub fn sink(&self) -> Arc<LogSink> {
        Arc::clone(&self.sink)
    }

    /// Drain what is queued, flush the writer and stop the thread.
    ///
    /// Returns the first write error, if any.  Events recorded after this
    /// call are counted as dropped.
    pub fn finish(self) -> OutputResult<LogStats> {
        if self.sink.tx.send(LogMsg::Close).is_err() {
            return Err(OutputError::LoggerGone);
        }
        let (mut stats, error) = self.thread.join().map_err(|_| OutputError::LoggerPanicked)?;
        stats.dropped = self.sink.dropped();
        debug!(?stats, "event log closed");
        match error {
            Some(e) => Err(e),
            None    => Ok(stats),
        }
    }
}

fn drain<W: EventWriter>(mut writer: W, rx: Receiver<LogMsg>) -> (LogStats, Option<OutputError>) {
    let mut stats = LogStats::default();
    let mut first_err: Option<OutputError> = None;

    let mut store = |result: OutputResult<()>, stats: &mut LogStats| match result {
        Ok(()) => true,
        Err(e) => {
            stats.failed += 1;
            warn!(error = %e, "event log write failed");
            first_err.get_or_insert(e);
            false
        }
    };

    // Runs until Close, or until every sender is gone.
    while let Ok(msg) = rx.recv() {
        match msg {
            LogMsg::Event(row) => {
                if store(writer.write_event(&row), &mut stats) {
                    stats.written += 1;
                }
                if rx.is_empty() {
                    store(writer.flush(), &mut stats);
                }
            }
            LogMsg::Close => break,
        }
    }
    store(writer.finish(), &mut stats);
    (stats, first_err)
}
