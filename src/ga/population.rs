//! Fixed-capacity populations.

use super::individual::Individual;
use crate::error::{DomSetError, Result};
use rand::Rng;

/// An ordered, bounded collection of [`Individual`]s.
///
/// The population remembers whether it is currently sorted by fitness;
/// [`best`](Self::best) and [`worst`](Self::worst) sort lazily. Any
/// insertion or replacement clears the flag.
///
/// Sorting is stable: individuals with equal fitness keep their insertion
/// order.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
    capacity: usize,
    sorted: bool,
}

/// Aggregate view of a population's fitness.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationStatistics {
    pub size: usize,
    pub best_fitness: f64,
    pub worst_fitness: f64,
    pub average_fitness: f64,
    pub valid_individuals: usize,
    pub average_set_size: f64,
}

impl Population {
    /// Creates an empty population.
    ///
    /// # Errors
    /// [`DomSetError::NonPositive`] if `capacity == 0`.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(DomSetError::NonPositive {
                what: "population size",
            });
        }
        Ok(Self {
            individuals: Vec::with_capacity(capacity),
            capacity,
            sorted: false,
        })
    }

    /// Creates a full population of random, unevaluated individuals.
    pub fn random<R: Rng>(capacity: usize, chromosome_len: usize, rng: &mut R) -> Result<Self> {
        let mut population = Self::new(capacity)?;
        population
            .individuals
            .extend((0..capacity).map(|_| Individual::random(chromosome_len, rng)));
        Ok(population)
    }

    /// Appends an individual.
    ///
    /// # Errors
    /// [`DomSetError::PopulationFull`] when already at capacity.
    pub fn add(&mut self, individual: Individual) -> Result<()> {
        if self.is_full() {
            return Err(DomSetError::PopulationFull(self.capacity));
        }
        self.individuals.push(individual);
        self.sorted = false;
        Ok(())
    }

    /// Replaces the individual at `index`, returning the old one.
    pub fn replace(&mut self, index: usize, individual: Individual) -> Option<Individual> {
        let slot = self.individuals.get_mut(index)?;
        self.sorted = false;
        Some(std::mem::replace(slot, individual))
    }

    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Mutable access for in-place evaluation.
    ///
    /// Clears the sorted flag, since fitness may change.
    pub fn individuals_mut(&mut self) -> &mut [Individual] {
        self.sorted = false;
        &mut self.individuals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.individuals.iter()
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.individuals.len() >= self.capacity
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn clear(&mut self) {
        self.individuals.clear();
        self.sorted = false;
    }

    /// Sorts best-first (non-increasing fitness), stable.
    pub fn sort_by_fitness(&mut self) {
        self.individuals.sort_by(Individual::cmp_by_fitness);
        self.sorted = true;
    }

    /// Sorts only if the population may be out of order.
    pub fn ensure_sorted(&mut self) {
        if !self.sorted {
            self.sort_by_fitness();
        }
    }

    /// Highest-fitness individual.
    ///
    /// # Errors
    /// [`DomSetError::EmptyPopulation`].
    pub fn best(&mut self) -> Result<&Individual> {
        self.ensure_sorted();
        self.individuals.first().ok_or(DomSetError::EmptyPopulation)
    }

    /// Lowest-fitness individual.
    ///
    /// # Errors
    /// [`DomSetError::EmptyPopulation`].
    pub fn worst(&mut self) -> Result<&Individual> {
        self.ensure_sorted();
        self.individuals.last().ok_or(DomSetError::EmptyPopulation)
    }

    /// Mean fitness over evaluated members; 0.0 if none are evaluated.
    pub fn average_fitness(&self) -> f64 {
        let (sum, count) = self
            .individuals
            .iter()
            .filter_map(Individual::fitness)
            .fold((0.0, 0usize), |(s, c), f| (s + f, c + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    /// Number of evaluated members that are valid dominating sets.
    pub fn valid_count(&self) -> usize {
        self.individuals
            .iter()
            .filter(|ind| ind.is_valid() == Some(true))
            .count()
    }

    /// Mean number of selected vertices; 0.0 for an empty population.
    pub fn average_set_size(&self) -> f64 {
        if self.individuals.is_empty() {
            return 0.0;
        }
        let total: usize = self
            .individuals
            .iter()
            .map(Individual::dominating_set_size)
            .sum();
        total as f64 / self.individuals.len() as f64
    }

    /// Collects best/worst/average statistics.
    pub fn statistics(&mut self) -> Result<PopulationStatistics> {
        let best_fitness = self.best()?.rank_fitness();
        let worst_fitness = self.worst()?.rank_fitness();
        Ok(PopulationStatistics {
            size: self.len(),
            best_fitness,
            worst_fitness,
            average_fitness: self.average_fitness(),
            valid_individuals: self.valid_count(),
            average_set_size: self.average_set_size(),
        })
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn scored(genes: Vec<u8>, fitness: f64, valid: bool) -> Individual {
        let mut ind = Individual::new(genes).unwrap();
        ind.set_fitness(fitness, valid);
        ind
    }

    fn make_population(fitnesses: &[f64]) -> Population {
        let mut pop = Population::new(fitnesses.len()).unwrap();
        for (i, &f) in fitnesses.iter().enumerate() {
            // Distinct genes so insertion order is observable.
            let genes = (0..8).map(|b| ((i >> b) & 1) as u8).collect();
            pop.add(scored(genes, f, f > -1000.0)).unwrap();
        }
        pop
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(Population::new(0).is_err());
    }

    #[test]
    fn test_add_respects_capacity() {
        let mut pop = Population::new(2).unwrap();
        pop.add(Individual::new(vec![0]).unwrap()).unwrap();
        pop.add(Individual::new(vec![1]).unwrap()).unwrap();
        assert!(pop.is_full());
        assert_eq!(
            pop.add(Individual::new(vec![1]).unwrap()),
            Err(DomSetError::PopulationFull(2))
        );
        assert_eq!(pop.len(), 2);
    }

    #[test]
    fn test_random_population() {
        let mut rng = create_rng(42);
        let pop = Population::random(10, 6, &mut rng).unwrap();
        assert_eq!(pop.len(), 10);
        assert!(pop.is_full());
        assert!(pop.iter().all(|ind| ind.len() == 6));
    }

    #[test]
    fn test_sort_is_non_increasing() {
        let mut pop = make_population(&[-3.0, -1.0, -2005.0, -2.0, -1.0]);
        assert!(!pop.is_sorted());
        pop.sort_by_fitness();
        assert!(pop.is_sorted());

        let fits: Vec<f64> = pop.iter().map(|i| i.fitness().unwrap()).collect();
        assert_eq!(fits, vec![-1.0, -1.0, -2.0, -3.0, -2005.0]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut pop = make_population(&[-2.0, -1.0, -2.0, -1.0]);
        let originals: Vec<Individual> = pop.iter().cloned().collect();
        pop.sort_by_fitness();
        assert_eq!(pop.get(0), Some(&originals[1]));
        assert_eq!(pop.get(1), Some(&originals[3]));
        assert_eq!(pop.get(2), Some(&originals[0]));
        assert_eq!(pop.get(3), Some(&originals[2]));
    }

    #[test]
    fn test_best_and_worst_sort_lazily() {
        let mut pop = make_population(&[-5.0, -1.0, -3.0]);
        assert_eq!(pop.best().unwrap().fitness(), Some(-1.0));
        assert!(pop.is_sorted());
        assert_eq!(pop.worst().unwrap().fitness(), Some(-5.0));
    }

    #[test]
    fn test_mutation_clears_sorted() {
        let mut pop = Population::new(3).unwrap();
        pop.add(scored(vec![1], -1.0, true)).unwrap();
        pop.sort_by_fitness();
        pop.add(scored(vec![0], -1000.0, false)).unwrap();
        assert!(!pop.is_sorted());

        pop.sort_by_fitness();
        let old = pop.replace(0, scored(vec![1], -1.0, true));
        assert!(old.is_some());
        assert!(!pop.is_sorted());
        assert!(pop.replace(9, scored(vec![1], -1.0, true)).is_none());
    }

    #[test]
    fn test_empty_population_errors() {
        let mut pop = Population::new(3).unwrap();
        assert_eq!(pop.best().err(), Some(DomSetError::EmptyPopulation));
        assert_eq!(pop.worst().err(), Some(DomSetError::EmptyPopulation));
        assert!(pop.statistics().is_err());
        assert_eq!(pop.average_fitness(), 0.0);
        assert_eq!(pop.average_set_size(), 0.0);
    }

    #[test]
    fn test_aggregates() {
        let mut pop = Population::new(3).unwrap();
        pop.add(scored(vec![1, 0, 0], -1.0, true)).unwrap();
        pop.add(scored(vec![1, 1, 0], -2.0, true)).unwrap();
        pop.add(scored(vec![0, 0, 0], -3000.0, false)).unwrap();

        assert!((pop.average_fitness() - (-3003.0 / 3.0)).abs() < 1e-9);
        assert_eq!(pop.valid_count(), 2);
        assert!((pop.average_set_size() - 1.0).abs() < 1e-12);

        let stats = pop.statistics().unwrap();
        assert_eq!(stats.size, 3);
        assert_eq!(stats.best_fitness, -1.0);
        assert_eq!(stats.worst_fitness, -3000.0);
        assert_eq!(stats.valid_individuals, 2);
    }

    #[test]
    fn test_clear() {
        let mut pop = make_population(&[-1.0, -2.0]);
        pop.clear();
        assert!(pop.is_empty());
        assert_eq!(pop.capacity(), 2);
    }
}
