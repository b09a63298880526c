//! Shared cancellation flag for the train and display loops.
//!
//! A `StopToken` is cheap to clone; all clones observe the same flag.  Loops
//! check it at the top of every iteration and inside every blocking wait.  The
//! token also owns a small gate (mutex + condvar) so that a paced sleep wakes
//! immediately on `cancel()` instead of running out its full duration.
//!
//! Segment waits do not park on this gate: they park on the segment's own
//! condvar, and whoever cancels the token must also interrupt the segments
//! (see `rr_track::Track::interrupt_all`).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

struct Inner {
    cancelled: AtomicBool,
    gate:      Mutex<()>,
    wake:      Condvar,
}

/// Cloneable cancellation token.
#[derive(Clone)]
pub struct StopToken {
    inner: Arc<Inner>,
}

impl StopToken {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                gate:      Mutex::new(()),
                wake:      Condvar::new(),
            }),
        }
    }

    /// Flip the flag and wake every sleeper.  Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        // Taking the gate orders this notify after any sleeper's flag check.
        let _guard = self.inner.gate.lock();
        self.inner.wake.notify_all();
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Sleep for `dur` unless cancelled first.
    ///
    /// Returns `true` if the full duration elapsed, `false` if the token was
    /// (or already is) cancelled.  A zero duration never parks.
    pub fn sleep(&self, dur: Duration) -> bool {
        if dur.is_zero() {
            return !self.is_cancelled();
        }
        let deadline = Instant::now() + dur;
        let mut guard = self.inner.gate.lock();
        while !self.is_cancelled() {
            if self.inner.wake.wait_until(&mut guard, deadline).timed_out() {
                return !self.is_cancelled();
            }
        }
        false
    }
}

impl Default for StopToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StopToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
