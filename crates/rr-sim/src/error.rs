use rr_core::{Direction, RrError, SegmentId, TrainId};
use rr_track::TrackError;
use rr_train::TrainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("train id {0} is used twice")]
    DuplicateTrain(TrainId),

    #[error("{first} and {second} both start at position {position}")]
    SharedStartPosition {
        position: u32,
        first:    TrainId,
        second:   TrainId,
    },

    #[error("{first} and {second} both start inside the block of {segment}")]
    SharedStartBlock {
        segment: SegmentId,
        first:   TrainId,
        second:  TrainId,
    },

    #[error("more than one train runs {0}; each segment supports one waiter per direction")]
    CrowdedDirection(Direction),

    #[error("failed to spawn thread `{name}`: {source}")]
    Spawn {
        name:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("control loop of {0} panicked")]
    TrainPanicked(TrainId),

    #[error("display thread panicked")]
    DisplayPanicked,

    #[error(transparent)]
    Core(#[from] RrError),

    #[error(transparent)]
    Track(#[from] TrackError),

    #[error(transparent)]
    Train(#[from] TrainError),
}

pub type SimResult<T> = Result<T, SimError>;
