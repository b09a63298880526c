//! Error types for rr-output.

use thiserror::Error;

/// Errors that can occur when writing logs, snapshots or the display.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("event logger thread is gone")]
    LoggerGone,

    #[error("event logger thread panicked")]
    LoggerPanicked,
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
