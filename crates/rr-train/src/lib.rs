//! `rr-train` — one independent control loop per train.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`state`]    | `TrainSpec`, `TrainPhase`, `TrainView` — what a train is and shows |
//! | [`event`]    | `TrainEvent`, `EventSink`, `SinkSet`, `EventRecorder`            |
//! | [`board`]    | `Board` (published views), `Snapshot` (board + occupancy copy)    |
//! | [`pacer`]    | `Pacer` trait — fixed, jittered and zero-length step pacing       |
//! | [`control`]  | `ControlLoop` — the per-tick state machine and locking protocol   |
//! | [`error`]    | `TrainError`, `TrainResult<T>`                                    |
//!
//! # One tick
//!
//! ```text
//! ① stop?            — token cancelled → Stopped
//! ② entry boundary?  — Entering → Segment::enter (may block) → Occupying
//! ③ pause + advance  — pacer sleeps one step; position ± 1 mod length
//! ④ exit boundary?   — Releasing: publish held = None, emit, Segment::leave
//! ⑤ publish          — Traveling
//! ```
//!
//! A train releases at ④ before it can reach its next ②, so it never holds
//! two segments at once.

pub mod board;
pub mod control;
pub mod error;
pub mod event;
pub mod pacer;
pub mod state;


pub use board::{Board, Snapshot};
pub use control::{ControlLoop, StepOutcome};
pub use error::{TrainError, TrainResult};
pub use event::{EventKind, EventRecorder, EventSink, NoopSink, SinkSet, TrainEvent};
pub use pacer::{FixedPacer, JitterPacer, NoPacer, Pacer, pacer_for};
pub use state::{TrainPhase, TrainSpec, TrainView};
