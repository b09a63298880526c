//! Shared board of published train views, and consistent snapshots of it.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use rr_core::{SegmentId, TrainId};
use rr_track::Track;

use crate::TrainView;

#[derive(Debug, Default)]
struct BoardState {
    seq:   u64,
    views: Vec<TrainView>,
}

/// Latest [`TrainView`] of every train, behind one mutex.
///
/// Each control loop owns a slot (handed out by [`register`][Self::register])
/// and overwrites it on every phase change.
#[derive(Debug, Default)]
pub struct Board {
    state: Mutex<BoardState>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a train's initial view and return its slot.
    pub fn register(&self, view: TrainView) -> usize {
        let mut st = self.state.lock();
        st.views.push(view);
        st.seq += 1;
        st.views.len() - 1
    }

    pub fn publish(&self, slot: usize, view: TrainView) {
        let mut st = self.state.lock();
        st.views[slot] = view;
        st.seq += 1;
    }

    /// Number of publications so far.
    pub fn seq(&self) -> u64 {
        self.state.lock().seq
    }

    pub fn views(&self) -> Vec<TrainView> {
        self.state.lock().views.clone()
    }

    pub fn view(&self, id: TrainId) -> Option<TrainView> {
        self.state.lock().views.iter().find(|v| v.id == id).cloned()
    }

    /// Copy the board and the track's occupancy together.
    ///
    /// Segment states are read while the board lock is held.  A train
    /// publishes `held = None` before it leaves a segment, so every segment a
    /// snapshot's view claims is also occupied in that snapshot.
    pub fn capture(&self, track: &Track) -> Snapshot {
        let st = self.state.lock();
        let (occupancy, holders) = track
            .segments()
            .iter()
            .map(|s| {
                let s = s.state();
                (s.occupied, s.holder)
            })
            .unzip();
        Snapshot { seq: st.seq, trains: st.views.clone(), occupancy, holders }
    }
}

/// Point-in-time copy of every train and segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub seq:       u64,
    pub trains:    Vec<TrainView>,
    /// Occupancy flags in ring order.
    pub occupancy: Vec<bool>,
    pub holders:   Vec<Option<TrainId>>,
}

impl Snapshot {
    pub fn positions(&self) -> BTreeMap<TrainId, u32> {
        self.trains.iter().map(|v| (v.id, v.position)).collect()
    }

    pub fn train(&self, id: TrainId) -> Option<&TrainView> {
        self.trains.iter().find(|v| v.id == id)
    }

    pub fn is_occupied(&self, segment: SegmentId) -> bool {
        self.occupancy.get(segment.index()).copied().unwrap_or(false)
    }

    pub fn holder(&self, segment: SegmentId) -> Option<TrainId> {
        self.holders.get(segment.index()).copied().flatten()
    }
}
