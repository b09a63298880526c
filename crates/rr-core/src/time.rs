//! Simulation time model.
//!
//! Every train runs its own control loop, so there is no global clock.  Each
//! loop counts its own steps as a `Tick`: one tick is one attempted unit of
//! movement, including any time spent blocked on a segment.  Wall-clock pacing
//! is a separate concern handled by the train's pacer.

use std::fmt;

/// A per-train step counter.
///
/// Stored as `u64`: at one step per millisecond a `u64` lasts far longer than
/// any run of the simulation could.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
