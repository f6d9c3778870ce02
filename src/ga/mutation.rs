//! Bit-flip mutation.
//!
//! The engine applies [`MutationOperator::mutate`]: one Bernoulli trial per
//! offspring, and on success a single uniformly chosen gene is flipped. The
//! remaining operators are alternatives for experiments.

use super::individual::Individual;
use crate::error::{DomSetError, Result};
use rand::Rng;

/// Lower and upper clamp for the adaptive rate.
const ADAPTIVE_RATE_BOUNDS: (f64, f64) = (0.01, 0.5);

/// Perturbs chromosomes with probability `rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationOperator {
    rate: f64,
}

impl Default for MutationOperator {
    fn default() -> Self {
        Self { rate: 0.1 }
    }
}

impl MutationOperator {
    /// # Errors
    /// [`DomSetError::InvalidRate`] if `rate` is outside `[0, 1]` or NaN.
    pub fn new(rate: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(DomSetError::InvalidRate {
                name: "mutation rate",
                value: rate,
            });
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// With probability `rate`, flips one random gene.
    ///
    /// Returns whether a gene was flipped. Empty chromosomes are never
    /// mutated.
    pub fn mutate<R: Rng>(&self, individual: &mut Individual, rng: &mut R) -> bool {
        if individual.is_empty() || rng.random::<f64>() >= self.rate {
            return false;
        }
        flip_random(individual, rng);
        true
    }

    /// Independent trial per gene; returns the number of flips.
    pub fn mutate_all_genes<R: Rng>(&self, individual: &mut Individual, rng: &mut R) -> usize {
        let mut flips = 0;
        for i in 0..individual.len() {
            if rng.random::<f64>() < self.rate {
                // index is in range by construction
                let _ = individual.flip_gene(i);
                flips += 1;
            }
        }
        flips
    }

    /// Flips one random gene unconditionally.
    pub fn uniform_mutation<R: Rng>(&self, individual: &mut Individual, rng: &mut R) {
        if !individual.is_empty() {
            flip_random(individual, rng);
        }
    }

    /// Swaps the values at two distinct random positions.
    ///
    /// Leaves chromosomes shorter than 2 untouched.
    pub fn swap_mutation<R: Rng>(&self, individual: &mut Individual, rng: &mut R) {
        let n = individual.len();
        if n < 2 {
            return;
        }
        let i = rng.random_range(0..n);
        let mut j = rng.random_range(0..n);
        while j == i {
            j = rng.random_range(0..n);
        }
        individual.swap_genes(i, j);
    }

    /// Single-gene mutation with a rate scaled by relative fitness.
    ///
    /// `rate · (1 − fitness / population_best)`, clamped to `[0.01, 0.5]`.
    /// Unevaluated individuals, or a zero `population_best`, use the base
    /// rate.
    pub fn adaptive_mutate<R: Rng>(
        &self,
        individual: &mut Individual,
        population_best: f64,
        rng: &mut R,
    ) -> bool {
        let rate = self.adaptive_rate(individual, population_best);
        if individual.is_empty() || rng.random::<f64>() >= rate {
            return false;
        }
        flip_random(individual, rng);
        true
    }

    fn adaptive_rate(&self, individual: &Individual, population_best: f64) -> f64 {
        match individual.fitness() {
            Some(f) if population_best != 0.0 => {
                let (lo, hi) = ADAPTIVE_RATE_BOUNDS;
                (self.rate * (1.0 - f / population_best)).clamp(lo, hi)
            }
            _ => self.rate,
        }
    }
}

fn flip_random<R: Rng>(individual: &mut Individual, rng: &mut R) {
    let index = rng.random_range(0..individual.len());
    // index is in range by construction
    let _ = individual.flip_gene(index);
}
