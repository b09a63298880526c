//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `RrError` as one variant
//! where configuration problems can surface.

use thiserror::Error;

use crate::TrainId;

/// The top-level error type for `rr-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum RrError {
    #[error("train {0} not found")]
    TrainNotFound(TrainId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `rr-*` crates.
pub type RrResult<T> = Result<T, RrError>;
