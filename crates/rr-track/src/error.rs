use std::time::Duration;

use rr_core::{RrError, SegmentId, TrainId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("wait for {0} cancelled")]
    Cancelled(SegmentId),

    #[error("{segment} still occupied after {waited:?}")]
    TimedOut {
        segment: SegmentId,
        waited:  Duration,
    },

    #[error("{train} cannot leave {segment}: holder is {holder:?}")]
    NotHolder {
        segment: SegmentId,
        train:   TrainId,
        holder:  Option<TrainId>,
    },

    #[error("{train} already holds {segment}")]
    AlreadyHeld {
        segment: SegmentId,
        train:   TrainId,
    },

    #[error("position {position} is outside the ring 0..{total_length}")]
    PositionOutOfRange {
        position:     u32,
        total_length: u32,
    },

    #[error("invalid track layout: {0}")]
    InvalidLayout(String),

    #[error(transparent)]
    Core(#[from] RrError),
}

pub type TrackResult<T> = Result<T, TrackError>;
