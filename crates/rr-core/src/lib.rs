//! `rr-core` — foundational types for the ring-rail segment-locking simulation.
//!
//! This crate is a dependency of every other `rr-*` crate.  It has no `rr-*`
//! dependencies and only small external ones (`parking_lot`, `rand`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `TrainId`, `SegmentId`                                |
//! | [`time`]        | `Tick`                                                |
//! | [`direction`]   | `Direction` (forward / backward around the ring)      |
//! | [`stop`]        | `StopToken` — shared cancellation flag                |
//! | [`rng`]         | `TrainRng` (per-train, deterministic)                 |
//! | [`config`]      | `RailConfig` — layout and timing knobs                |
//! | [`error`]       | `RrError`, `RrResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, `Direction` and     |
//! |         | `RailConfig`.                                              |

pub mod config;
pub mod direction;
pub mod error;
pub mod ids;
pub mod rng;
pub mod stop;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::RailConfig;
pub use direction::Direction;
pub use error::{RrError, RrResult};
pub use ids::{SegmentId, TrainId};
pub use rng::TrainRng;
pub use stop::StopToken;
pub use time::Tick;
