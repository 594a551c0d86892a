//! Pluggable sources of preference matrices.
//!
//! The engine only ever sees a validated [`PreferenceModel`]; where the raw
//! matrix comes from (a file, a request body, a generator) is the caller's
//! business. [`RandomPreferences`] is the built-in generator: every row is a
//! uniform shuffle of the opposite side, driven by a seeded ChaCha RNG so the
//! same seed always yields the same matrix.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::types::{PreferenceModel, Result};

/// Anything that can produce a raw `2n x n` preference matrix.
pub trait PreferenceSource {
    /// Produce raw preference rows for `n` pairs
    fn matrix(&mut self, n: usize) -> Vec<Vec<usize>>;

    /// Produce and validate a model for `n` pairs
    fn model(&mut self, n: usize) -> Result<PreferenceModel> {
        PreferenceModel::from_matrix(&self.matrix(n))
    }
}

/// Uniformly random complete preference lists.
#[derive(Debug, Clone)]
pub struct RandomPreferences {
    rng: ChaCha8Rng,
}

impl RandomPreferences {
    /// Deterministic generator: same seed = same matrices
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl PreferenceSource for RandomPreferences {
    fn matrix(&mut self, n: usize) -> Vec<Vec<usize>> {
        let mut rows = Vec::with_capacity(2 * n);

        // Proposers rank reviewers (n..2n)
        for _ in 0..n {
            let mut row: Vec<usize> = (n..2 * n).collect();
            row.shuffle(&mut self.rng);
            rows.push(row);
        }

        // Reviewers rank proposers (0..n)
        for _ in 0..n {
            let mut row: Vec<usize> = (0..n).collect();
            row.shuffle(&mut self.rng);
            rows.push(row);
        }

        rows
    }
}

/// A fixed matrix, handed out as-is regardless of the requested size.
///
/// Useful for feeding parsed or hand-written input through the same path
/// as generated input.
#[derive(Debug, Clone)]
pub struct FixedPreferences(pub Vec<Vec<usize>>);

impl PreferenceSource for FixedPreferences {
    fn matrix(&mut self, _n: usize) -> Vec<Vec<usize>> {
        self.0.clone()
    }
}
