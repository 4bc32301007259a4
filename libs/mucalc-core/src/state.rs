//! Random generator state
//!
//! `random()`, `gaussian()` and `seed(x)` share one generator so that a
//! `seed` call makes every later draw in the session reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Process-wide pseudo random generator
pub struct RandomState {
    rng: StdRng,
}

impl RandomState {
    /// Generator seeded from the system clock (nanosecond resolution).
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::seeded(nanos)
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Restart the sequence from `x`.
    ///
    /// The bit pattern of `x` is the seed, so `seed(1)` and `seed(1.5)`
    /// start different sequences.
    pub fn reseed(&mut self, x: f64) {
        debug!(seed = x, "reseeding generator");
        self.rng = StdRng::seed_from_u64(x.to_bits());
    }

    /// Uniform draw from `[0, 1)`
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Standard normal draw
    pub fn gaussian(&mut self) -> f64 {
        StandardNormal.sample(&mut self.rng)
    }
}

impl Default for RandomState {
    fn default() -> Self {
        Self::from_clock()
    }
}
