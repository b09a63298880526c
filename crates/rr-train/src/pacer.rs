//! Step pacing: how long a train dwells on each unit.

use std::time::Duration;

use rr_core::{RailConfig, StopToken, TrainId, TrainRng};

/// Pauses a control loop for one step.
///
/// Returns `false` if the stop token fired during the pause.
pub trait Pacer: Send {
    fn pause(&mut self, stop: &StopToken) -> bool;
}

/// Zero-length steps.  Runs as fast as the locks allow.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPacer;

impl Pacer for NoPacer {
    fn pause(&mut self, stop: &StopToken) -> bool {
        !stop.is_cancelled()
    }
}

/// Same dwell every step.
#[derive(Debug, Clone, Copy)]
pub struct FixedPacer(pub Duration);

impl Pacer for FixedPacer {
    fn pause(&mut self, stop: &StopToken) -> bool {
        stop.sleep(self.0)
    }
}

/// `base ± spread` milliseconds per step, drawn from the train's own RNG so
/// runs with the same seed pace identically.
pub struct JitterPacer {
    base_ms:   u64,
    spread_ms: u64,
    rng:       TrainRng,
}

impl JitterPacer {
    pub fn new(base: Duration, spread: Duration, rng: TrainRng) -> Self {
        Self {
            base_ms:   base.as_millis() as u64,
            spread_ms: spread.as_millis() as u64,
            rng,
        }
    }

    /// Next dwell; never negative.
    pub fn next_dwell(&mut self) -> Duration {
        let ms = self.base_ms as i64 + self.rng.jitter(self.spread_ms);
        Duration::from_millis(ms.max(0) as u64)
    }
}

impl Pacer for JitterPacer {
    fn pause(&mut self, stop: &StopToken) -> bool {
        let dwell = self.next_dwell();
        stop.sleep(dwell)
    }
}

/// The pacer a train gets from `config`: jittered when `jitter_millis > 0`,
/// free-running when `step_millis == 0`, fixed otherwise.
pub fn pacer_for(config: &RailConfig, train: TrainId) -> Box<dyn Pacer> {
    if config.jitter_millis > 0 {
        Box::new(JitterPacer::new(
            config.step_duration(),
            Duration::from_millis(config.jitter_millis),
            TrainRng::new(config.seed, train),
        ))
    } else if config.step_millis == 0 {
        Box::new(NoPacer)
    } else {
        Box::new(FixedPacer(config.step_duration()))
    }
}
