//! Top-level simulation configuration.
//!
//! Typically loaded from a TOML file by the application crate (with the
//! `serde` feature) and then overridden from the command line.  Every field
//! has a default, and the defaults reproduce the classic station layout:
//! seven segments of twelve units, each opening with a two-unit station.

use std::time::Duration;

use crate::{RrError, RrResult};

/// Layout and timing knobs for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RailConfig {
    /// Number of segments in the ring.
    pub segment_count: u32,

    /// Units spanned by each segment, station included.
    pub segment_length: u32,

    /// Units at the start of each segment that form the station platform.
    /// Each direction waits on its own platform slot, so this must be ≥ 2.
    pub station_length: u32,

    /// Wall-clock duration of one movement step, in milliseconds.
    pub step_millis: u64,

    /// Random ± spread applied to each step, in milliseconds.  0 disables.
    pub jitter_millis: u64,

    /// How often the display loop polls a snapshot, in milliseconds.
    pub display_interval_millis: u64,

    /// Master RNG seed for pacing jitter.
    pub seed: u64,
}

impl Default for RailConfig {
    fn default() -> Self {
        Self {
            segment_count:           7,
            segment_length:          12,
            station_length:          2,
            step_millis:             1_000,
            jitter_millis:           0,
            display_interval_millis: 500,
            seed:                    42,
        }
    }
}

impl RailConfig {
    /// Ring circumference in position units.
    #[inline]
    pub fn total_length(&self) -> u32 {
        self.segment_count * self.segment_length
    }

    #[inline]
    pub fn step_duration(&self) -> Duration {
        Duration::from_millis(self.step_millis)
    }

    #[inline]
    pub fn display_interval(&self) -> Duration {
        Duration::from_millis(self.display_interval_millis)
    }

    /// Reject layouts the locking protocol cannot run on.
    pub fn validate(&self) -> RrResult<()> {
        if self.segment_count == 0 {
            return Err(RrError::Config("segment_count must be at least 1".into()));
        }
        if self.station_length < 2 {
            return Err(RrError::Config(format!(
                "station_length must be at least 2 (one platform slot per direction), got {}",
                self.station_length
            )));
        }
        if self.segment_length <= self.station_length {
            return Err(RrError::Config(format!(
                "segment_length {} leaves no block after a {}-unit station",
                self.segment_length, self.station_length
            )));
        }
        if self.segment_count.checked_mul(self.segment_length).is_none() {
            return Err(RrError::Config("ring length overflows u32".into()));
        }
        if self.display_interval_millis == 0 {
            return Err(RrError::Config("display_interval_millis must be positive".into()));
        }
        Ok(())
    }
}
