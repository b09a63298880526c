//! The `Track` — the ring of segments plus its layout.

use rr_core::{RailConfig, SegmentId};
use tracing::debug;

use crate::{Segment, SegmentState, TrackLayout, TrackResult};

/// Ordered ring of [`Segment`]s.  Segment `N-1`'s successor is segment `0`.
///
/// Shared between all control loops behind an `Arc`.  The track itself is
/// immutable; all mutation happens inside each segment's own mutex.
#[derive(Debug)]
pub struct Track {
    layout:   TrackLayout,
    segments: Vec<Segment>,
}

impl Track {
    pub fn new(layout: TrackLayout) -> Self {
        let segments = layout
            .segment_ids()
            .map(|id| Segment::new(id, layout.segment_length(id)))
            .collect();
        debug!(
            segments = layout.segment_count(),
            total_length = layout.total_length(),
            "track built"
        );
        Self { layout, segments }
    }

    pub fn from_config(config: &RailConfig) -> TrackResult<Self> {
        Ok(Self::new(TrackLayout::from_config(config)?))
    }

    #[inline]
    pub fn layout(&self) -> &TrackLayout {
        &self.layout
    }

    /// Segment by id.  Ids come from this track's layout, so they are in range.
    #[inline]
    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id.index()]
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Occupancy flags in ring order, each read under its own segment's mutex.
    pub fn occupancy(&self) -> Vec<bool> {
        self.segments.iter().map(Segment::is_occupied).collect()
    }

    /// Full per-segment state in ring order.
    pub fn states(&self) -> Vec<SegmentState> {
        self.segments.iter().map(Segment::state).collect()
    }

    /// Wake every waiter on every segment (used after cancelling the stop token).
    pub fn interrupt_all(&self) {
        for segment in &self.segments {
            segment.interrupt();
        }
    }

    /// `true` when nothing is held and every enter was matched by a leave.
    pub fn is_quiescent(&self) -> bool {
        self.segments.iter().all(|s| {
            let st = s.state();
            !st.occupied && st.entries == st.exits
        })
    }
}
