//! Per-train identity, phase and the published view.

use std::fmt;
use std::sync::Arc;

use rr_core::{Direction, SegmentId, Tick, TrainId};

/// What a train is at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainSpec {
    pub id:        TrainId,
    /// Display label, e.g. `"A"`.
    pub name:      String,
    /// Initial position on the ring.
    pub start:     u32,
    pub direction: Direction,
}

impl TrainSpec {
    pub fn new(id: u32, name: impl Into<String>, start: u32, direction: Direction) -> Self {
        Self { id: TrainId(id), name: name.into(), start, direction }
    }
}

/// Where a train is in its per-tick state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainPhase {
    /// Moving through a station or block with nothing pending.
    Traveling,
    /// Blocked (or about to block) entering the next block.
    Entering,
    /// Holds the block it is about to run into.
    Occupying,
    /// Leaving a block; the lock is being handed back.
    Releasing,
    /// The control loop has exited.
    Stopped,
}

impl fmt::Display for TrainPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrainPhase::Traveling => "traveling",
            TrainPhase::Entering  => "entering",
            TrainPhase::Occupying => "occupying",
            TrainPhase::Releasing => "releasing",
            TrainPhase::Stopped   => "stopped",
        };
        f.write_str(s)
    }
}

/// Value copy of a train's state, as published to the board.
///
/// `held` is published as `Some` only after the segment was taken and as
/// `None` before it is handed back, so a view never claims a segment the
/// train does not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainView {
    pub id:        TrainId,
    pub name:      Arc<str>,
    pub direction: Direction,
    pub position:  u32,
    pub held:      Option<SegmentId>,
    pub phase:     TrainPhase,
    /// Ticks completed by the control loop.
    pub tick:      Tick,
    /// Units travelled since start.
    pub odometer:  u64,
    pub laps:      u64,
}
