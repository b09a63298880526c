//! Plain data row types written by output backends.

use rr_train::{TrainEvent, TrainView};

/// One train event, flattened for tabular output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub tick:     u64,
    pub train:    String,
    pub event:    &'static str,
    /// Segment index for enter/wait/release events.
    pub segment:  Option<u32>,
    pub position: u32,
    /// Human-readable line, e.g. `Train A completed lap 3`.
    pub message:  String,
}

impl From<&TrainEvent> for EventRow {
    fn from(e: &TrainEvent) -> Self {
        Self {
            tick:     e.tick.0,
            train:    e.name.to_string(),
            event:    e.kind.label(),
            segment:  e.kind.segment().map(|s| s.0),
            position: e.position,
            message:  e.to_string(),
        }
    }
}

/// One train's state in one display snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRow {
    pub seq:       u64,
    pub train:     String,
    pub position:  u32,
    pub direction: &'static str,
    pub held:      Option<u32>,
    pub phase:     String,
    pub tick:      u64,
    pub laps:      u64,
}

impl SnapshotRow {
    pub fn new(seq: u64, view: &TrainView) -> Self {
        Self {
            seq,
            train:     view.name.to_string(),
            position:  view.position,
            direction: view.direction.as_str(),
            held:      view.held.map(|s| s.0),
            phase:     view.phase.to_string(),
            tick:      view.tick.0,
            laps:      view.laps,
        }
    }
}
