//! `rr-output` — event logs, snapshot files and the console display for the
//! ring-rail simulation.
//!
//! | Type                 | Role                                                  |
//! |----------------------|-------------------------------------------------------|
//! | [`EventLogger`]      | Background thread draining train events into a writer |
//! | [`CsvEventLog`]      | `tick,train,event,segment,position,message` rows      |
//! | [`TextEventLog`]     | `[T12] Train A entered segment 1` lines               |
//! | [`SnapshotObserver`] | `SimObserver` writing one row per train per refresh   |
//! | [`ConsoleDisplay`]   | `SimObserver` redrawing the ring with ANSI colors     |
//!
//! # Usage
//!
//! ```rust,ignore
//! use rr_output::{ConsoleDisplay, CsvEventLog, DisplayStyle, EventLogger};
//!
//! let logger = EventLogger::spawn(CsvEventLog::create(path)?, 1024)?;
//! let handle = SimBuilder::new(config)
//!     .events(logger.sink())
//!     .observer(ConsoleDisplay::stdout(DisplayStyle::default()))
//!     .build()?
//!     .start()?;
//! // …
//! handle.stop();
//! handle.join()?;
//! let stats = logger.finish()?;
//! ```

pub mod csv;
pub mod display;
pub mod error;
pub mod logger;
pub mod observer;
pub mod row;
pub mod text;
pub mod writer;

#[cfg(test)]
mod tests;

pub use crate::csv::{CsvEventLog, CsvSnapshotLog};
pub use display::{ConsoleDisplay, DisplayStyle, render};
pub use error::{OutputError, OutputResult};
pub use logger::{EventLogger, LogSink, LogStats};
pub use observer::{Both, SnapshotObserver};
pub use row::{EventRow, SnapshotRow};
pub use text::TextEventLog;
pub use writer::{EventWriter, SnapshotWriter};
