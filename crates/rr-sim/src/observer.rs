//! Display-side observer trait.

use rr_track::TrackLayout;
use rr_train::Snapshot;

/// Callbacks invoked by the display thread started by
/// [`Sim::start`][crate::Sim::start].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Observers only ever see [`Snapshot`]
/// copies, never live train state.
///
/// # Example: one line per refresh
///
/// ```rust,ignore
/// struct Ticker;
///
/// impl SimObserver for Ticker {
///     fn on_snapshot(&mut self, snapshot: &Snapshot) {
///         println!("{:?}", snapshot.positions());
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once before the first snapshot.
    fn on_start(&mut self, _layout: &TrackLayout) {}

    /// Called every `config.display_interval()`.
    fn on_snapshot(&mut self, _snapshot: &Snapshot) {}

    /// Called once after every train has stopped, with the final state.
    fn on_sim_end(&mut self, _final: &Snapshot) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

impl<T: SimObserver + ?Sized> SimObserver for Box<T> {
    fn on_start(&mut self, layout: &TrackLayout) {
        (**self).on_start(layout);
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        (**self).on_snapshot(snapshot);
    }

    fn on_sim_end(&mut self, snapshot: &Snapshot) {
        (**self).on_sim_end(snapshot);
    }
}
