//! Seeded, serializable random source
//!
//! The simulation draws every random number through [`SimRng`]. It counts the
//! 32-bit words it has consumed so a snapshot only needs `{seed, draws}`; on
//! restore the PCG stream is fast-forwarded with `advance` and continues
//! exactly where it left off.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    /// Number of 32-bit words drawn since seeding
    pub draws: u64,
}

/// Deterministic generator used by the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RngState", into = "RngState")]
pub struct SimRng {
    seed: u64,
    draws: u64,
    rng: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            draws: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    #[inline]
    fn next_word(&mut self) -> u32 {
        self.draws += 1;
        self.rng.next_u32()
    }

    /// Uniform in [0, 1)
    #[inline]
    pub fn unit(&mut self) -> f32 {
        // 24 high bits fill the f32 mantissa exactly
        (self.next_word() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
    }

    /// Uniform in [min, max)
    #[inline]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.unit() * (max - min)
    }

    /// True with probability `p`
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// Fair coin flip
    #[inline]
    pub fn coin(&mut self) -> bool {
        self.chance(0.5)
    }

    /// Pick one element uniformly; `None` for an empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = ((self.unit() * items.len() as f32) as usize).min(items.len() - 1);
        items.get(idx)
    }
}

impl From<RngState> for SimRng {
    fn from(state: RngState) -> Self {
        let mut rng = Pcg32::seed_from_u64(state.seed);
        rng.advance(state.draws);
        Self {
            seed: state.seed,
            draws: state.draws,
            rng,
        }
    }
}

impl From<SimRng> for RngState {
    fn from(rng: SimRng) -> Self {
        Self {
            seed: rng.seed,
            draws: rng.draws,
        }
    }
}
