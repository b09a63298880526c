//! Direction of travel around the ring.

use std::fmt;

/// Which way a train moves around the ring.  Fixed for a train's lifetime.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Increasing positions (+1 per step).
    Forward,
    /// Decreasing positions (−1 per step).
    Backward,
}

impl Direction {
    /// Position one unit further along on a ring of `total_length` units.
    ///
    /// `position` must already lie in `0..total_length`; no intermediate
    /// value exceeds `total_length`, so any `u32` ring length works.
    #[inline]
    pub fn step(self, position: u32, total_length: u32) -> u32 {
        match self {
            Direction::Forward  => (position + 1) % total_length,
            Direction::Backward if position == 0 => total_length - 1,
            Direction::Backward => position - 1,
        }
    }

    /// Lowercase name, as written to logs and snapshot files.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward  => "forward",
            Direction::Backward => "backward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
