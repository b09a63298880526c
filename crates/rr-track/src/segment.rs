//! A single exclusive segment: occupancy flag, holder and wait/notify.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use rr_core::{SegmentId, StopToken, TrainId};
use tracing::trace;

use crate::{TrackError, TrackResult};

/// Everything a segment's mutex protects.
///
/// `entries` and `exits` count successful enters and leaves over the
/// segment's lifetime; at any quiescent point they are equal and `occupied`
/// is `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentState {
    pub occupied: bool,
    pub holder:   Option<TrainId>,
    pub entries:  u64,
    pub exits:    u64,
}

/// One lockable unit of track.
///
/// All state lives behind one `parking_lot::Mutex`, paired 1:1 with the
/// condvar blocked trains wait on.  `occupied` is never touched outside that
/// mutex.
pub struct Segment {
    id:     SegmentId,
    length: u32,
    state:  Mutex<SegmentState>,
    freed:  Condvar,
}

impl Segment {
    pub fn new(id: SegmentId, length: u32) -> Self {
        Self {
            id,
            length,
            state: Mutex::new(SegmentState::default()),
            freed: Condvar::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> SegmentId {
        self.id
    }

    /// Units spanned, station included.
    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Block until the segment is free, then take it for `train`.
    ///
    /// The wait predicate checks `stop` as well as `occupied`, so a
    /// cancelled token (followed by [`interrupt`][Self::interrupt]) returns
    /// `Err(Cancelled)` instead of stranding the caller.  A cancelled token
    /// also refuses a free segment.
    pub fn enter(&self, train: TrainId, stop: &StopToken) -> TrackResult<()> {
        let mut state = self.state.lock();
        self.check_not_held(&state, train)?;
        loop {
            if stop.is_cancelled() {
                return Err(self.cancelled(&state));
            }
            if !state.occupied {
                self.occupy(&mut state, train);
                return Ok(());
            }
            self.freed.wait(&mut state);
        }
    }

    /// Like [`enter`][Self::enter] but gives up with `Err(TimedOut)` once
    /// `timeout` has passed without the segment coming free.
    pub fn enter_within(
        &self,
        train:   TrainId,
        stop:    &StopToken,
        timeout: Duration,
    ) -> TrackResult<()> {
        let deadline  = Instant::now() + timeout;
        let mut state = self.state.lock();
        self.check_not_held(&state, train)?;
        loop {
            if stop.is_cancelled() {
                return Err(self.cancelled(&state));
            }
            if !state.occupied {
                self.occupy(&mut state, train);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(TrackError::TimedOut { segment: self.id, waited: timeout });
            }
            self.freed.wait_until(&mut state, deadline);
        }
    }

    /// Take the segment only if it is free right now.
    pub fn try_enter(&self, train: TrainId) -> TrackResult<bool> {
        let mut state = self.state.lock();
        self.check_not_held(&state, train)?;
        if state.occupied {
            return Ok(false);
        }
        self.occupy(&mut state, train);
        Ok(true)
    }

    /// Free the segment and wake one waiter.
    ///
    /// Only the current holder may leave; anything else is a protocol
    /// violation and leaves the state untouched.
    pub fn leave(&self, train: TrainId) -> TrackResult<()> {
        let mut state = self.state.lock();
        match state.holder {
            Some(holder) if holder == train => {
                state.occupied = false;
                state.holder   = None;
                state.exits   += 1;
                self.freed.notify_one();
                trace!(segment = self.id.0, train = train.0, "segment freed");
                Ok(())
            }
            holder => Err(TrackError::NotHolder { segment: self.id, train, holder }),
        }
    }

    /// Wake every waiter so it re-checks its stop token.
    ///
    /// The mutex is taken first: a waiter that has checked the token but not
    /// yet parked cannot miss this notification.
    pub fn interrupt(&self) {
        let _state = self.state.lock();
        self.freed.notify_all();
    }

    pub fn is_occupied(&self) -> bool {
        self.state.lock().occupied
    }

    pub fn holder(&self) -> Option<TrainId> {
        self.state.lock().holder
    }

    /// Copy of the full state, read under the mutex.
    pub fn state(&self) -> SegmentState {
        *self.state.lock()
    }

    // ── Helpers (mutex held) ──────────────────────────────────────────────

    fn check_not_held(&self, state: &SegmentState, train: TrainId) -> TrackResult<()> {
        if state.holder == Some(train) {
            return Err(TrackError::AlreadyHeld { segment: self.id, train });
        }
        Ok(())
    }

    fn occupy(&self, state: &mut SegmentState, train: TrainId) {
        state.occupied = true;
        state.holder   = Some(train);
        state.entries += 1;
        trace!(segment = self.id.0, train = train.0, "segment taken");
    }

    fn cancelled(&self, state: &SegmentState) -> TrackError {
        // A notify_one may have been spent on this waiter; pass it on.
        if !state.occupied {
            self.freed.notify_one();
        }
        TrackError::Cancelled(self.id)
    }
}

impl std::fmt::Debug for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Segment")
            .field("id", &self.id)
            .field("length", &self.length)
            .field("state", &self.state())
            .finish()
    }
}
