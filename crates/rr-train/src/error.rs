use rr_core::{SegmentId, TrainId};
use rr_track::TrackError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrainError {
    #[error("{train} cannot start in {segment}: the block is already claimed")]
    StartBlockTaken {
        train:   TrainId,
        segment: SegmentId,
    },

    #[error("{train} left the block of {segment} while holding {held:?}")]
    HeldMismatch {
        train:   TrainId,
        segment: SegmentId,
        held:    Option<SegmentId>,
    },

    #[error(transparent)]
    Track(#[from] TrackError),
}

pub type TrainResult<T> = Result<T, TrainError>;
