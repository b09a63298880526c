//! `ControlLoop` — one train's per-tick state machine.

use std::sync::Arc;
use std::time::Duration;

use rr_core::{Direction, SegmentId, StopToken, Tick};
use rr_track::{Track, TrackError};
use tracing::{debug, info, warn};

use crate::{
    Board, EventKind, EventSink, Pacer, TrainError, TrainEvent, TrainPhase, TrainResult,
    TrainSpec, TrainView,
};

/// How long a blocked train waits before logging that it is still waiting.
pub const DEFAULT_PATIENCE: Duration = Duration::from_secs(5);

/// Result of one [`ControlLoop::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The train advanced one unit.
    Moved,
    /// The stop token fired; the loop should exit.
    Stopped,
}

/// Drives one train around the ring.
///
/// Owns the train's mutable state; everything other threads see goes through
/// the [`Board`] or the event sink.  Built on the caller's thread, then moved
/// into the train's own thread and consumed by [`run`][Self::run].
pub struct ControlLoop {
    spec_name: Arc<str>,
    spec:      TrainSpec,

    // ── Mutable train state ───────────────────────────────────────────────
    position:  u32,
    held:      Option<SegmentId>,
    phase:     TrainPhase,
    tick:      Tick,
    odometer:  u64,
    laps:      u64,

    // ── Shared ────────────────────────────────────────────────────────────
    track:     Arc<Track>,
    board:     Arc<Board>,
    slot:      usize,
    sink:      Arc<dyn EventSink>,
    pacer:     Box<dyn Pacer>,
    stop:      StopToken,
    patience:  Duration,
}

impl ControlLoop {
    /// Place the train and register it on the board.
    ///
    /// A train that starts inside a block claims that block now, so no other
    /// train can enter it before this one has left.
    pub fn new(
        spec:  TrainSpec,
        track: Arc<Track>,
        board: Arc<Board>,
        sink:  Arc<dyn EventSink>,
        pacer: Box<dyn Pacer>,
        stop:  StopToken,
    ) -> TrainResult<Self> {
        let layout = track.layout();
        layout.check_position(spec.start)?;

        let held = match layout.block_of(spec.start) {
            Some(segment) => {
                if !track.segment(segment).try_enter(spec.id)? {
                    return Err(TrainError::StartBlockTaken { train: spec.id, segment });
                }
                Some(segment)
            }
            None => None,
        };

        let mut this = Self {
            spec_name: Arc::from(spec.name.as_str()),
            position:  spec.start,
            spec,
            held,
            phase:     if held.is_some() { TrainPhase::Occupying } else { TrainPhase::Traveling },
            tick:      Tick::ZERO,
            odometer:  0,
            laps:      0,
            track,
            slot:      0,
            board,
            sink,
            pacer,
            stop,
            patience:  DEFAULT_PATIENCE,
        };
        this.slot = this.board.register(this.view());
        debug!(
            train = %this.spec.name,
            position = this.position,
            direction = %this.spec.direction,
            held = ?this.held,
            "train placed"
        );
        Ok(this)
    }

    /// Wait this long on a blocked segment before each "still waiting" warning.
    pub fn with_patience(mut self, patience: Duration) -> Self {
        self.patience = patience;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn position(&self) -> u32 {
        self.position
    }

    #[inline]
    pub fn held(&self) -> Option<SegmentId> {
        self.held
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.spec.direction
    }

    pub fn view(&self) -> TrainView {
        TrainView {
            id:        self.spec.id,
            name:      Arc::clone(&self.spec_name),
            direction: self.spec.direction,
            position:  self.position,
            held:      self.held,
            phase:     self.phase,
            tick:      self.tick,
            odometer:  self.odometer,
            laps:      self.laps,
        }
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Run until the stop token fires, then release whatever is held.
    pub fn run(self) -> TrainResult<TrainView> {
        self.drive(None)
    }

    /// Run at most `n` ticks (fewer if stopped), then release whatever is held.
    pub fn run_ticks(self, n: u64) -> TrainResult<TrainView> {
        self.drive(Some(n))
    }

    fn drive(mut self, limit: Option<u64>) -> TrainResult<TrainView> {
        let mut result = Ok(());
        let mut done = 0u64;
        while limit.is_none_or(|n| done < n) {
            match self.step() {
                Ok(StepOutcome::Moved)   => done += 1,
                Ok(StepOutcome::Stopped) => break,
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        // Release even after an error, so the other train is not stranded.
        let shutdown = self.shutdown();
        result.and(shutdown)?;
        Ok(self.view())
    }

    /// One tick: acquire at an entry boundary, pause, advance, release at an
    /// exit boundary.
    pub fn step(&mut self) -> TrainResult<StepOutcome> {
        if self.stop.is_cancelled() {
            return Ok(StepOutcome::Stopped);
        }

        let total = self.track.layout().total_length();
        if let Some(segment) = self.track.layout().entry_block(self.position, self.spec.direction)
            && !self.acquire(segment)?
        {
            return Ok(StepOutcome::Stopped);
        }

        if !self.pacer.pause(&self.stop) {
            return Ok(StepOutcome::Stopped);
        }

        let from = self.position;
        self.position = self.spec.direction.step(from, total);
        self.odometer += 1;
        self.tick = self.tick + 1;

        if let Some(segment) = self.track.layout().exit_block(from, self.position) {
            self.release(segment)?;
        }

        self.phase = TrainPhase::Traveling;
        self.publish();
        Ok(StepOutcome::Moved)
    }

    /// Take `segment`, waiting at the platform if it is occupied.
    ///
    /// Returns `Ok(false)` if the wait was cancelled.
    fn acquire(&mut self, segment: SegmentId) -> TrainResult<bool> {
        self.phase = TrainPhase::Entering;
        self.publish();

        let seg = self.track.segment(segment);
        if !seg.try_enter(self.spec.id)? {
            self.emit(EventKind::Waiting(segment));
            let mut waited = Duration::ZERO;
            loop {
                match seg.enter_within(self.spec.id, &self.stop, self.patience) {
                    Ok(()) => break,
                    Err(TrackError::TimedOut { waited: w, .. }) => {
                        waited += w;
                        warn!(
                            train = %self.spec.name,
                            segment = segment.0,
                            holder = ?seg.holder(),
                            ?waited,
                            "still waiting for segment"
                        );
                    }
                    Err(TrackError::Cancelled(_)) => return Ok(false),
                    Err(e) => return Err(e.into()),
                }
            }
        }

        // Publish only once the lock is ours.
        self.held  = Some(segment);
        self.phase = TrainPhase::Occupying;
        self.publish();
        self.emit(EventKind::Entered(segment));
        Ok(true)
    }

    /// Hand `segment` back after leaving its block.
    fn release(&mut self, segment: SegmentId) -> TrainResult<()> {
        if self.held != Some(segment) {
            return Err(TrainError::HeldMismatch {
                train: self.spec.id,
                segment,
                held: self.held,
            });
        }

        // Announce before unlocking so no observer sees two holders.
        self.held  = None;
        self.phase = TrainPhase::Releasing;
        self.publish();
        self.emit(EventKind::Released(segment));

        let total = u64::from(self.track.layout().total_length());
        let laps = self.odometer / total;
        if laps > self.laps {
            self.laps = laps;
            info!(train = %self.spec.name, lap = laps, "lap completed");
            self.emit(EventKind::LapCompleted(laps));
        }

        self.track.segment(segment).leave(self.spec.id)?;
        Ok(())
    }

    /// Release any held segment and mark the train stopped.
    fn shutdown(&mut self) -> TrainResult<()> {
        let held = self.held.take();
        self.phase = TrainPhase::Stopped;
        self.publish();
        if let Some(segment) = held {
            self.emit(EventKind::Released(segment));
            self.track.segment(segment).leave(self.spec.id)?;
        }
        self.emit(EventKind::Stopped);
        debug!(
            train = %self.spec.name,
            position = self.position,
            ticks = self.tick.0,
            laps = self.laps,
            "train stopped"
        );
        Ok(())
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn publish(&self) {
        self.board.publish(self.slot, self.view());
    }

    fn emit(&self, kind: EventKind) {
        self.sink.record(&TrainEvent {
            train:    self.spec.id,
            name:     Arc::clone(&self.spec_name),
            tick:     self.tick,
            position: self.position,
            kind,
        });
    }
}
