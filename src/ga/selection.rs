//! Parent selection.
//!
//! The engine uses truncation elitism: the top `elite_size` individuals
//! survive unchanged, and every parent pair is drawn uniformly from that
//! elite pool. Tournament and roulette selection are provided as
//! alternatives over a whole population.
//!
//! All strategies assume **maximization** (higher fitness = better).
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::individual::Individual;
use super::population::Population;
use crate::error::{DomSetError, Result};
use rand::Rng;

/// Elite extraction and parent sampling.
///
/// Stateless: randomness comes from the `Rng` passed to each call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionOperator;

impl SelectionOperator {
    pub fn new() -> Self {
        Self
    }

    /// Returns a new population holding copies of the `elite_size` best
    /// members of `population`.
    ///
    /// Sorts `population` first if needed; equal-fitness members keep their
    /// existing order.
    ///
    /// # Errors
    /// - [`DomSetError::NonPositive`] if `elite_size == 0`
    /// - [`DomSetError::EliteTooLarge`] if `elite_size > population.len()`
    pub fn select_elite(&self, population: &mut Population, elite_size: usize) -> Result<Population> {
        if elite_size == 0 {
            return Err(DomSetError::NonPositive { what: "elite size" });
        }
        if elite_size > population.len() {
            return Err(DomSetError::EliteTooLarge {
                elite_size,
                population_size: population.len(),
            });
        }
        population.ensure_sorted();

        let mut elite = Population::new(elite_size)?;
        for ind in population.iter().take(elite_size) {
            elite.add(ind.clone())?;
        }
        elite.sort_by_fitness();
        Ok(elite)
    }

    /// Draws two distinct members of `elite` uniformly at random.
    ///
    /// The second index is re-drawn until it differs from the first.
    ///
    /// # Errors
    /// [`DomSetError::NotEnoughParents`] if `elite` has fewer than 2 members.
    pub fn select_two_parents<'a, R: Rng>(
        &self,
        elite: &'a Population,
        rng: &mut R,
    ) -> Result<(&'a Individual, &'a Individual)> {
        let n = elite.len();
        if n < 2 {
            return Err(DomSetError::NotEnoughParents(n));
        }
        let first = rng.random_range(0..n);
        let mut second = rng.random_range(0..n);
        while second == first {
            second = rng.random_range(0..n);
        }
        Ok((&elite.individuals()[first], &elite.individuals()[second]))
    }

    /// Draws one member uniformly at random.
    pub fn select_random<'a, R: Rng>(
        &self,
        population: &'a Population,
        rng: &mut R,
    ) -> Result<&'a Individual> {
        if population.is_empty() {
            return Err(DomSetError::EmptyPopulation);
        }
        Ok(&population.individuals()[rng.random_range(0..population.len())])
    }

    /// Tournament selection: sample `k` members with replacement, keep the
    /// fittest. `k` is clamped to `[1, population.len()]`.
    ///
    /// # Complexity
    /// O(k)
    pub fn tournament<'a, R: Rng>(
        &self,
        population: &'a Population,
        k: usize,
        rng: &mut R,
    ) -> Result<&'a Individual> {
        let members = population.individuals();
        let n = members.len();
        if n == 0 {
            return Err(DomSetError::EmptyPopulation);
        }
        let k = k.clamp(1, n);

        let mut best_idx = rng.random_range(0..n);
        for _ in 1..k {
            let idx = rng.random_range(0..n);
            if members[idx].rank_fitness() > members[best_idx].rank_fitness() {
                best_idx = idx;
            }
        }
        Ok(&members[best_idx])
    }

    /// Fitness-proportionate selection.
    ///
    /// Fitness values are negative here, so every weight is shifted by
    /// `|worst| + 1` when the worst fitness is negative.
    ///
    /// **Warning**: with the default penalty, valid individuals dwarf
    /// invalid ones and the wheel degenerates towards uniform among them.
    ///
    /// # Complexity
    /// O(n)
    pub fn roulette<'a, R: Rng>(
        &self,
        population: &'a Population,
        rng: &mut R,
    ) -> Result<&'a Individual> {
        let members = population.individuals();
        let n = members.len();
        if n == 0 {
            return Err(DomSetError::EmptyPopulation);
        }

        let fitnesses: Vec<f64> = members
            .iter()
            .map(|ind| ind.fitness().unwrap_or(f64::MIN))
            .collect();
        let worst = fitnesses.iter().cloned().fold(f64::INFINITY, f64::min);
        let shift = if worst < 0.0 { worst.abs() + 1.0 } else { 0.0 };

        let total: f64 = fitnesses.iter().map(|f| f + shift).sum();
        if !(total > 0.0) || !total.is_finite() {
            return Ok(&members[rng.random_range(0..n)]);
        }

        let threshold = rng.random_range(0.0..total);
        let mut cumulative = 0.0;
        for (ind, f) in members.iter().zip(&fitnesses) {
            cumulative += f + shift;
            if cumulative >= threshold {
                return Ok(ind);
            }
        }

        Ok(&members[n - 1]) // floating-point fallback
    }
}
