//! Fluent builder for constructing a [`Sim`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use rr_core::{Direction, RailConfig, StopToken};
use rr_track::{Track, TrackLayout};
use rr_train::{Board, ControlLoop, EventSink, SinkSet, TrainSpec, pacer_for};
use tracing::info;

use crate::{Sim, SimError, SimObserver, SimResult};

/// The two trains of the classic layout: `A` just past the start heading
/// forward, `B` on the last unit heading backward.
pub fn default_trains(total_length: u32) -> Vec<TrainSpec> {
    vec![
        TrainSpec::new(0, "A", 1, Direction::Forward),
        TrainSpec::new(1, "B", total_length - 1, Direction::Backward),
    ]
}

/// Fluent builder for [`Sim`].
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                   |
/// |----------------------|-------------------------------------------|
/// | `.layout(l)`         | `TrackLayout::from_config(&config)`       |
/// | `.train(spec)`       | [`default_trains`] if none are added      |
/// | `.events(sink)`      | events are dropped                        |
/// | `.observer(o)`       | no display thread                         |
/// | `.patience(d)`       | `rr_train::control::DEFAULT_PATIENCE`     |
///
/// # Example
///
/// ```rust,ignore
/// let handle = SimBuilder::new(RailConfig::default())
///     .events(logger.sink())
///     .observer(ConsoleDisplay::stdout(DisplayStyle::default()))
///     .build()?
///     .start()?;
/// ```
pub struct SimBuilder {
    config:   RailConfig,
    layout:   Option<TrackLayout>,
    trains:   Vec<TrainSpec>,
    sinks:    SinkSet,
    observer: Option<Box<dyn SimObserver + Send>>,
    patience: Option<Duration>,
}

impl SimBuilder {
    pub fn new(config: RailConfig) -> Self {
        Self {
            config,
            layout:   None,
            trains:   Vec::new(),
            sinks:    SinkSet::new(),
            observer: None,
            patience: None,
        }
    }

    /// Use a custom ring instead of the uniform one described by the config.
    pub fn layout(mut self, layout: TrackLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn train(mut self, spec: TrainSpec) -> Self {
        self.trains.push(spec);
        self
    }

    /// Add an event sink.  May be called more than once; every sink sees
    /// every event.
    pub fn events(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Observer driven by the display thread.
    pub fn observer(mut self, observer: impl SimObserver + Send + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn patience(mut self, patience: Duration) -> Self {
        self.patience = Some(patience);
        self
    }

    /// Validate inputs, place every train (claiming initial blocks) and
    /// return a ready-to-start [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let layout = match self.layout {
            Some(l) => l,
            None    => TrackLayout::from_config(&self.config)?,
        };
        let trains = if self.trains.is_empty() {
            default_trains(layout.total_length())
        } else {
            self.trains
        };
        check_placement(&layout, &trains)?;

        let track = Arc::new(Track::new(layout));
        let board = Arc::new(Board::new());
        let stop  = StopToken::new();
        let sinks: Arc<dyn EventSink> = Arc::new(self.sinks);

        let mut loops = Vec::with_capacity(trains.len());
        for spec in trains {
            let pacer = pacer_for(&self.config, spec.id);
            let mut control = ControlLoop::new(
                spec,
                Arc::clone(&track),
                Arc::clone(&board),
                Arc::clone(&sinks),
                pacer,
                stop.clone(),
            )?;
            if let Some(p) = self.patience {
                control = control.with_patience(p);
            }
            loops.push(control);
        }

        info!(
            trains = loops.len(),
            segments = track.layout().segment_count(),
            total_length = track.layout().total_length(),
            "simulation built"
        );

        Ok(Sim {
            config:   self.config,
            track,
            board,
            stop,
            loops,
            observer: self.observer,
        })
    }
}

/// Reject placements the locking protocol cannot run safely.
fn check_placement(layout: &TrackLayout, trains: &[TrainSpec]) -> SimResult<()> {
    let mut ids       = HashSet::new();
    let mut positions = HashMap::new();
    let mut blocks    = HashMap::new();
    let mut forward   = 0usize;
    let mut backward  = 0usize;

    for spec in trains {
        layout.check_position(spec.start)?;
        if !ids.insert(spec.id) {
            return Err(SimError::DuplicateTrain(spec.id));
        }
        if let Some(first) = positions.insert(spec.start, spec.id) {
            return Err(SimError::SharedStartPosition {
                position: spec.start,
                first,
                second: spec.id,
            });
        }
        if let Some(segment) = layout.block_of(spec.start)
            && let Some(first) = blocks.insert(segment, spec.id)
        {
            return Err(SimError::SharedStartBlock { segment, first, second: spec.id });
        }
        let count = match spec.direction {
            Direction::Forward  => &mut forward,
            Direction::Backward => &mut backward,
        };
        *count += 1;
        if *count > 1 {
            return Err(SimError::CrowdedDirection(spec.direction));
        }
    }
    Ok(())
}

