//! `rr-sim` — simulation driver for the ring-rail simulation.
//!
//! # Threads
//!
//! ```text
//! train-A ─┐
//! train-B ─┼─ each runs its own ControlLoop until the stop token fires
//!          │
//! display ─┘  every display_interval: board.capture(track) → observer
//! ```
//!
//! [`SimHandle::stop`] cancels the shared stop token and interrupts every
//! segment, so trains blocked at a platform return promptly.
//! [`SimHandle::join`] waits for the trains first and the display last, so
//! the observer's final snapshot shows every train stopped.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rr_core::RailConfig;
//! use rr_sim::{NoopObserver, SimBuilder};
//!
//! let handle = SimBuilder::new(RailConfig::default())
//!     .observer(NoopObserver)
//!     .build()?
//!     .start()?;
//! std::thread::sleep(std::time::Duration::from_secs(10));
//! handle.stop();
//! let report = handle.join()?;
//! assert!(report.is_quiescent());
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::{SimBuilder, default_trains};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, SimHandle, SimReport};
