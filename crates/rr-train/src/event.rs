//! Discrete train events and the sinks that receive them.
//!
//! Control loops call [`EventSink::record`] from their own threads, so sinks
//! must be `Send + Sync` and should not block for long.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rr_core::{SegmentId, Tick, TrainId};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The next block was occupied; the train is holding at its platform.
    Waiting(SegmentId),
    Entered(SegmentId),
    Released(SegmentId),
    /// The odometer passed another full ring length.
    LapCompleted(u64),
    Stopped,
}

impl EventKind {
    /// Short lowercase tag, used as the `event` column by tabular writers.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Waiting(_)      => "waiting",
            EventKind::Entered(_)      => "entered",
            EventKind::Released(_)     => "released",
            EventKind::LapCompleted(_) => "lap",
            EventKind::Stopped         => "stopped",
        }
    }

    pub fn segment(&self) -> Option<SegmentId> {
        match *self {
            EventKind::Waiting(s) | EventKind::Entered(s) | EventKind::Released(s) => Some(s),
            EventKind::LapCompleted(_) | EventKind::Stopped => None,
        }
    }
}

/// One event emitted by a train's control loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainEvent {
    pub train:    TrainId,
    pub name:     Arc<str>,
    /// Control-loop tick at which the event happened.
    pub tick:     Tick,
    pub position: u32,
    pub kind:     EventKind,
}

impl fmt::Display for TrainEvent {
    /// Human-readable line, e.g. `Train A entered segment 3`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        match self.kind {
            EventKind::Waiting(s)      => write!(f, "Train {name} waiting for segment {}", s.0),
            EventKind::Entered(s)      => write!(f, "Train {name} entered segment {}", s.0),
            EventKind::Released(s)     => write!(f, "Train {name} released segment {}", s.0),
            EventKind::LapCompleted(n) => write!(f, "Train {name} completed lap {n}"),
            EventKind::Stopped         => write!(f, "Train {name} stopped at {}", self.position),
        }
    }
}

/// Receives [`TrainEvent`]s.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &TrainEvent);
}

/// Discards every event.
pub struct NoopSink;

impl EventSink for NoopSink {
    fn record(&self, _event: &TrainEvent) {}
}

/// Fans each event out to several sinks, in registration order.
#[derive(Default)]
pub struct SinkSet {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for SinkSet {
    fn record(&self, event: &TrainEvent) {
        for sink in &self.sinks {
            sink.record(event);
        }
    }
}

/// Keeps every event in memory.  Handy for checks after a run.
#[derive(Default)]
pub struct EventRecorder {
    events: Mutex<Vec<TrainEvent>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far, in arrival order.
    pub fn events(&self) -> Vec<TrainEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&TrainEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for EventRecorder {
    fn record(&self, event: &TrainEvent) {
        self.events.lock().push(event.clone());
    }
}
