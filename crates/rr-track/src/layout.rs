//! Ring geometry: segment lengths, stations and the position → segment map.
//!
//! Positions live in `0..total_length` and wrap.  Segment `k` covers
//! `start(k) .. start(k) + length(k)`; its first `station_length` units are
//! the station and the rest is the block.  Every function here is pure.

use rr_core::{Direction, RailConfig, SegmentId};

use crate::{TrackError, TrackResult};

/// Immutable description of the ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackLayout {
    lengths:        Vec<u32>,
    /// Prefix offsets: `starts[k]` is the first position of segment `k`.
    starts:         Vec<u32>,
    station_length: u32,
    total_length:   u32,
}

impl TrackLayout {
    /// `count` segments of `length` units each.
    pub fn uniform(count: u32, length: u32, station_length: u32) -> TrackResult<Self> {
        Self::from_lengths(vec![length; count as usize], station_length)
    }

    /// Segments with individual lengths, all sharing one station length.
    pub fn from_lengths(lengths: Vec<u32>, station_length: u32) -> TrackResult<Self> {
        if lengths.is_empty() {
            return Err(TrackError::InvalidLayout("a ring needs at least one segment".into()));
        }
        if u32::try_from(lengths.len()).is_err() {
            return Err(TrackError::InvalidLayout("too many segments".into()));
        }
        if station_length < 2 {
            return Err(TrackError::InvalidLayout(format!(
                "station length {station_length} leaves no platform slot for each direction"
            )));
        }

        let mut starts = Vec::with_capacity(lengths.len());
        let mut total: u32 = 0;
        for (k, &len) in lengths.iter().enumerate() {
            if len <= station_length {
                return Err(TrackError::InvalidLayout(format!(
                    "segment {k} has length {len}, no block after a {station_length}-unit station"
                )));
            }
            starts.push(total);
            total = total
                .checked_add(len)
                .ok_or_else(|| TrackError::InvalidLayout("ring length overflows u32".into()))?;
        }

        Ok(Self { lengths, starts, station_length, total_length: total })
    }

    /// Layout described by a validated [`RailConfig`].
    pub fn from_config(config: &RailConfig) -> TrackResult<Self> {
        config.validate()?;
        Self::uniform(config.segment_count, config.segment_length, config.station_length)
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.lengths.len()
    }

    /// Σ segment lengths.
    #[inline]
    pub fn total_length(&self) -> u32 {
        self.total_length
    }

    #[inline]
    pub fn station_length(&self) -> u32 {
        self.station_length
    }

    #[inline]
    pub fn segment_length(&self, segment: SegmentId) -> u32 {
        self.lengths[segment.index()]
    }

    #[inline]
    pub fn segment_start(&self, segment: SegmentId) -> u32 {
        self.starts[segment.index()]
    }

    pub fn segment_ids(&self) -> impl Iterator<Item = SegmentId> + '_ {
        (0..self.lengths.len()).map(|k| SegmentId(k as u32))
    }

    // ── Position mapping ──────────────────────────────────────────────────

    /// Validate a position coming from outside the simulation.
    pub fn check_position(&self, position: u32) -> TrackResult<SegmentId> {
        if position >= self.total_length {
            return Err(TrackError::PositionOutOfRange {
                position,
                total_length: self.total_length,
            });
        }
        Ok(self.segment_of(position))
    }

    /// Segment containing `position` (taken modulo the ring length).
    ///
    /// For a uniform ring this equals `position / length`.
    pub fn segment_of(&self, position: u32) -> SegmentId {
        let position = position % self.total_length;
        let k = self.starts.partition_point(|&start| start <= position) - 1;
        SegmentId(k as u32)
    }

    /// Offset of `position` inside its segment.
    #[inline]
    pub fn offset_in_segment(&self, position: u32) -> u32 {
        let position = position % self.total_length;
        position - self.segment_start(self.segment_of(position))
    }

    #[inline]
    pub fn is_station(&self, position: u32) -> bool {
        self.offset_in_segment(position) < self.station_length
    }

    /// The segment whose block contains `position`, or `None` on a station.
    pub fn block_of(&self, position: u32) -> Option<SegmentId> {
        if self.is_station(position) {
            None
        } else {
            Some(self.segment_of(position))
        }
    }

    /// Platform slot where a train moving in `direction` waits for the block
    /// it is about to enter, inside `segment`'s station.
    #[inline]
    pub fn platform_slot(&self, segment: SegmentId, direction: Direction) -> u32 {
        let start = self.segment_start(segment);
        match direction {
            Direction::Forward  => start + self.station_length - 1,
            Direction::Backward => start,
        }
    }

    /// If `position` is the entry boundary for `direction`, the block the
    /// next step runs into.
    ///
    /// Forward trains enter the block of their own segment from the last
    /// station unit; backward trains enter the previous segment's block from
    /// unit 0.
    pub fn entry_block(&self, position: u32, direction: Direction) -> Option<SegmentId> {
        let segment = self.segment_of(position);
        if position % self.total_length != self.platform_slot(segment, direction) {
            return None;
        }
        match direction {
            Direction::Forward  => Some(segment),
            Direction::Backward => Some(segment.prev(self.segment_count())),
        }
    }

    /// If the step `from → to` leaves a block for a station, the block left.
    pub fn exit_block(&self, from: u32, to: u32) -> Option<SegmentId> {
        match (self.block_of(from), self.block_of(to)) {
            (Some(left), None) => Some(left),
            _ => None,
        }
    }

    /// Number of unit steps from `from` to `to` moving in `direction`.
    pub fn distance(&self, from: u32, to: u32, direction: Direction) -> u32 {
        let total = self.total_length;
        let (from, to) = (from % total, to % total);
        let (ahead, behind) = match direction {
            Direction::Forward  => (to, from),
            Direction::Backward => (from, to),
        };
        if ahead >= behind { ahead - behind } else { total - (behind - ahead) }
    }
}
