//! `rr-track` — exclusive segments arranged in a ring.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`segment`]   | `Segment` — mutex + condvar exclusive resource, `SegmentState`  |
//! | [`layout`]    | `TrackLayout` — lengths, stations, position → segment mapping   |
//! | [`track`]     | `Track` — the ring of segments plus its layout                  |
//! | [`error`]     | `TrackError`, `TrackResult<T>`                                  |
//!
//! # Segment geometry
//!
//! ```text
//!   segment k                                   segment k+1
//!  ┌────────┬──────────────────────────────────┬────────┬─────────
//!  │ s0  s1 │ b   b   b   b   b   b   b   b    │ s0  s1 │ b   b  …
//!  └────────┴──────────────────────────────────┴────────┴─────────
//!   station   block (guarded by segment k's lock)
//! ```
//!
//! Each segment opens with a station of `station_length` units followed by a
//! block.  A train holds a segment's lock exactly while it runs through that
//! segment's block.  Stations are unguarded platforms: a forward train waits
//! on the last station unit in front of the block it wants, a backward train
//! waits on unit 0 behind it.  A waiting train therefore never holds a lock,
//! which is what keeps two opposing trains from deadlocking when they meet.

pub mod error;
pub mod layout;
pub mod segment;
pub mod track;

#[cfg(test)]
mod tests;

pub use error::{TrackError, TrackResult};
pub use layout::TrackLayout;
pub use segment::{Segment, SegmentState};
pub use track::Track;
