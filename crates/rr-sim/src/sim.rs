//! The `Sim` driver: train threads, the display thread and shutdown.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rr_core::{RailConfig, RrError, StopToken, TrainId};
use rr_track::{SegmentState, Track};
use rr_train::{Board, ControlLoop, Snapshot, TrainResult, TrainView};
use tracing::{debug, info, warn};

use crate::{SimError, SimObserver, SimResult};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// A built, not yet running simulation.
///
/// Every train is already placed and its initial block claimed.  Create via
/// [`SimBuilder`][crate::SimBuilder], then either [`start`][Self::start] it
/// (runs until stopped) or [`run_ticks`][Self::run_ticks] it (test facility).
pub struct Sim {
    pub(crate) config:   RailConfig,
    pub(crate) track:    Arc<Track>,
    pub(crate) board:    Arc<Board>,
    pub(crate) stop:     StopToken,
    pub(crate) loops:    Vec<ControlLoop>,
    pub(crate) observer: Option<Box<dyn SimObserver + Send>>,
}

impl Sim {
    pub fn config(&self) -> &RailConfig {
        &self.config
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn snapshot(&self) -> Snapshot {
        self.board.capture(&self.track)
    }

    /// Launch one thread per train, plus the display thread if an observer
    /// was supplied.  Trains run until [`SimHandle::stop`].
    pub fn start(self) -> SimResult<SimHandle> {
        self.launch(None)
    }

    /// Run every train for exactly `n` ticks (fewer if stopped), without a
    /// display thread, and wait for all of them.
    pub fn run_ticks(mut self, n: u64) -> SimResult<SimReport> {
        self.observer = None;
        self.launch(Some(n))?.join()
    }

    fn launch(self, limit: Option<u64>) -> SimResult<SimHandle> {
        let Sim { config, track, board, stop, loops, observer } = self;

        let display_stop = StopToken::new();
        let mut handle = SimHandle {
            track:        Arc::clone(&track),
            board:        Arc::clone(&board),
            stop:         stop.clone(),
            display_stop: display_stop.clone(),
            trains:       Vec::with_capacity(loops.len()),
            display:      None,
        };

        let mut loops = loops.into_iter();
        while let Some(control) = loops.next() {
            let view = control.view();
            let name = format!("train-{}", view.name);
            let spawned = thread::Builder::new().name(name.clone()).spawn(move || match limit {
                Some(n) => control.run_ticks(n),
                None    => control.run(),
            });
            match spawned {
                Ok(join) => handle.trains.push((view.id, join)),
                Err(source) => {
                    abort_launch(handle, loops, Some(&view));
                    return Err(SimError::Spawn { name, source });
                }
            }
        }

        if let Some(mut observer) = observer {
            let track    = Arc::clone(&track);
            let board    = Arc::clone(&board);
            let interval = config.display_interval();
            let spawned = thread::Builder::new().name("display".into()).spawn(move || {
                observer.on_start(track.layout());
                loop {
                    observer.on_snapshot(&board.capture(&track));
                    if !display_stop.sleep(interval) {
                        break;
                    }
                }
                observer.on_sim_end(&board.capture(&track));
            });
            match spawned {
                Ok(join) => handle.display = Some(join),
                Err(source) => {
                    abort_launch(handle, std::iter::empty(), None);
                    return Err(SimError::Spawn { name: "display".into(), source });
                }
            }
        }

        info!(trains = handle.trains.len(), display = handle.display.is_some(), "simulation started");
        Ok(handle)
    }
}

/// Undo a partial launch.
///
/// Running trains are stopped and joined.  Loops that never got a thread are
/// shut down in place, and `lost` (a loop dropped by a failed spawn) has its
/// start block handed back directly.
pub(crate) fn abort_launch(
    handle:    SimHandle,
    unstarted: impl IntoIterator<Item = ControlLoop>,
    lost:      Option<&TrainView>,
) {
    handle.stop();
    if let Some(view) = lost
        && let Some(segment) = view.held
        && let Err(e) = handle.track.segment(segment).leave(view.id)
    {
        warn!(train = %view.name, error = %e, "could not release block of unspawned train");
    }
    for control in unstarted {
        if let Err(e) = control.run_ticks(0) {
            warn!(error = %e, "could not shut down unspawned train");
        }
    }
    if let Err(e) = handle.join() {
        warn!(error = %e, "train failed while aborting launch");
    }
}

// ── SimHandle ─────────────────────────────────────────────────────────────────

/// Control over a running simulation.
pub struct SimHandle {
    track:        Arc<Track>,
    board:        Arc<Board>,
    stop:         StopToken,
    display_stop: StopToken,
    trains:       Vec<(TrainId, JoinHandle<TrainResult<TrainView>>)>,
    display:      Option<JoinHandle<()>>,
}

impl SimHandle {
    /// Ask every train to stop.  Blocked trains are woken and give up their
    /// wait; a train inside a block releases it on the way out.
    pub fn stop(&self) {
        if !self.stop.is_cancelled() {
            debug!("stop requested");
        }
        self.stop.cancel();
        self.track.interrupt_all();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Clone of the trains' stop token, for timers and signal handlers.
    /// Cancelling it alone does not wake a blocked train; use
    /// [`stop`][Self::stop] for that.
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    /// Live, consistent copy of every train and segment.
    pub fn snapshot(&self) -> Snapshot {
        self.board.capture(&self.track)
    }

    pub fn train_view(&self, id: TrainId) -> SimResult<TrainView> {
        self.board.view(id).ok_or(SimError::Core(RrError::TrainNotFound(id)))
    }

    /// `true` once every train thread has returned.
    pub fn is_finished(&self) -> bool {
        self.trains.iter().all(|(_, h)| h.is_finished())
    }

    /// Wait for every train, then for the display thread.
    ///
    /// Does not stop anything itself: call [`stop`][Self::stop] first unless
    /// the trains were given a tick limit.  The first train error is returned
    /// after every thread has been joined.
    pub fn join(mut self) -> SimResult<SimReport> {
        let mut first_err: Option<SimError> = None;
        let mut trains = Vec::with_capacity(self.trains.len());

        for (id, join) in self.trains.drain(..) {
            match join.join() {
                Ok(Ok(view)) => trains.push(view),
                Ok(Err(e)) => {
                    warn!(train = %id, error = %e, "control loop failed");
                    // A failed loop may strand the others on its segment.
                    self.stop.cancel();
                    self.track.interrupt_all();
                    first_err.get_or_insert(SimError::Train(e));
                }
                Err(_) => {
                    self.stop.cancel();
                    self.track.interrupt_all();
                    first_err.get_or_insert(SimError::TrainPanicked(id));
                }
            }
        }

        self.display_stop.cancel();
        if let Some(display) = self.display.take()
            && display.join().is_err()
        {
            first_err.get_or_insert(SimError::DisplayPanicked);
        }

        if let Some(e) = first_err {
            return Err(e);
        }
        let report = SimReport { trains, segments: self.track.states() };
        info!(quiescent = report.is_quiescent(), "simulation finished");
        Ok(report)
    }
}

// ── SimReport ─────────────────────────────────────────────────────────────────

/// Final state after every thread has been joined.
#[derive(Debug, Clone)]
pub struct SimReport {
    /// Final view of every train, in build order.
    pub trains:   Vec<TrainView>,
    /// Per-segment counters in ring order.
    pub segments: Vec<SegmentState>,
}

impl SimReport {
    pub fn train(&self, id: TrainId) -> Option<&TrainView> {
        self.trains.iter().find(|v| v.id == id)
    }

    /// Nothing held and every entry matched by an exit.
    pub fn is_quiescent(&self) -> bool {
        self.segments.iter().all(|s| !s.occupied && s.entries == s.exits)
    }
}
