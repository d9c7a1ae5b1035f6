//! Seeded random selection used by the generator

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Deterministic source of random choices
///
/// Every stochastic decision in generation flows through one selector so that
/// a seed fully determines the output.
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Weighted random selection
    ///
    /// Returns an index into `weights` using the cumulative distribution, or
    /// `None` when no weight is positive.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|weight| **weight > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut rand_val = self.rng.random::<f64>() * total;
        let mut last_positive = None;
        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            last_positive = Some(i);
            rand_val -= weight;
            if rand_val <= 0.0 {
                return Some(i);
            }
        }
        last_positive
    }

    /// Uniform index below `len`
    pub fn index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }

    /// Uniform integer in an inclusive range
    pub fn range_inclusive(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            low
        } else {
            self.rng.random_range(low..=high)
        }
    }

    /// Bernoulli trial with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.random_bool(p.clamp(0.0, 1.0))
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Fresh seed for a derived selector
    pub fn next_seed(&mut self) -> u64 {
        self.rng.random()
    }
}
