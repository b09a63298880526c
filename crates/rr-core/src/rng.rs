//! Deterministic per-train RNG.
//!
//! # Determinism strategy
//!
//! Each train gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (train_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive train IDs uniformly across the seed space.
//! Trains never share RNG state, so the jitter a train draws depends only on
//! the seed and its own id, never on how the threads interleave.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::TrainId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-train deterministic RNG.
///
/// Owned by exactly one control loop; it is moved into the train's thread and
/// never shared.
pub struct TrainRng(SmallRng);

impl TrainRng {
    /// Seed deterministically from the run's global seed and a train ID.
    pub fn new(global_seed: u64, train: TrainId) -> Self {
        let seed = global_seed ^ (train.0 as u64).wrapping_mul(MIXING_CONSTANT);
        TrainRng(SmallRng::seed_from_u64(seed))
    }

    /// Signed offset uniformly drawn from `-spread..=spread`.
    #[inline]
    pub fn jitter(&mut self, spread: u64) -> i64 {
        if spread == 0 {
            return 0;
        }
        let spread = spread.min(i64::MAX as u64) as i64;
        self.0.gen_range(-spread..=spread)
    }
}
