//! Injectable randomness for speed jitter and palette picks.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Default source backed by `SmallRng`.
#[derive(Debug, Clone)]
pub struct SmallRandom(SmallRng);

impl SmallRandom {
    /// Seeded from OS / browser entropy.
    pub fn from_entropy() -> Self {
        Self(SmallRng::from_entropy())
    }

    /// Reproducible stream, handy for demos and soak tests.
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

impl RandomSource for SmallRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
/// Values are clamped into `[0, 1)`.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    pos: usize,
}

impl SequenceSource {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            pos: 0,
        }
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        if v.is_nan() {
            0.0
        } else {
            v.clamp(0.0, 1.0 - f64::EPSILON)
        }
    }
}
