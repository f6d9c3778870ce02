//! Engine configuration.
//!
//! [`EngineConfig`] holds all parameters that control the evolutionary loop.

use super::fitness::PenaltyPolicy;
use crate::error::{DomSetError, Result};

/// Configuration for the [`EvolutionEngine`](super::EvolutionEngine).
///
/// # Defaults
///
/// ```
/// use u_domset::ga::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_iterations, 50);
/// assert_eq!(config.num_crossover(), 40);
/// assert_eq!(config.elite_size(), 60);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_domset::ga::{EngineConfig, PenaltyPolicy};
///
/// let config = EngineConfig::default()
///     .with_population_size(200)
///     .with_crossover_rate(0.5)
///     .with_mutation_rate(0.05)
///     .with_penalty(PenaltyPolicy::Scaled)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Number of individuals in every generation.
    pub population_size: usize,

    /// Fraction of each generation produced by crossover (0.0–1.0).
    ///
    /// `floor(population_size · crossover_rate)` offspring are bred; the
    /// remaining slots are filled by the elite.
    pub crossover_rate: f64,

    /// Probability that an offspring has one gene flipped (0.0–1.0).
    pub mutation_rate: f64,

    /// Number of generations after initialization. The loop always runs to
    /// this count.
    pub max_iterations: usize,

    /// Per-violation penalty used by the fitness evaluator.
    pub penalty: PenaltyPolicy,

    /// Whether to evaluate offspring in parallel (requires the `parallel`
    /// feature; ignored otherwise).
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            crossover_rate: 0.4,
            mutation_rate: 0.1,
            max_iterations: 50,
            penalty: PenaltyPolicy::default(),
            parallel: false,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the crossover rate. Out-of-range values are rejected by
    /// [`validate`](Self::validate), not clamped.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation rate. Out-of-range values are rejected by
    /// [`validate`](Self::validate), not clamped.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the penalty policy.
    pub fn with_penalty(mut self, penalty: PenaltyPolicy) -> Self {
        self.penalty = penalty;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Offspring bred per generation: `floor(population_size · crossover_rate)`.
    pub fn num_crossover(&self) -> usize {
        (self.population_size as f64 * self.crossover_rate) as usize
    }

    /// Survivors per generation: `population_size − num_crossover`.
    pub fn elite_size(&self) -> usize {
        self.population_size - self.num_crossover()
    }

    /// Parameters as ordered key/value pairs, for reports.
    pub fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("populationSize", self.population_size.to_string()),
            ("crossoverRate", self.crossover_rate.to_string()),
            ("mutationRate", self.mutation_rate.to_string()),
            ("maxIterations", self.max_iterations.to_string()),
        ]
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// - population size of zero
    /// - a rate outside `[0, 1]`
    /// - a non-positive fixed penalty
    /// - an elite pool of fewer than 2 while offspring must be bred
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(DomSetError::NonPositive {
                what: "population size",
            });
        }
        check_rate("crossover rate", self.crossover_rate)?;
        check_rate("mutation rate", self.mutation_rate)?;
        if let PenaltyPolicy::Fixed(c) = self.penalty {
            if !(c > 0.0) || !c.is_finite() {
                return Err(DomSetError::InvalidConfig(format!(
                    "penalty coefficient must be positive and finite, got {c}"
                )));
            }
        }
        let elite = self.elite_size();
        if self.num_crossover() > 0 && elite < 2 {
            return Err(DomSetError::InvalidConfig(format!(
                "crossover rate {} leaves an elite pool of {elite}; \
                 parent selection needs at least 2",
                self.crossover_rate
            )));
        }
        Ok(())
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(DomSetError::InvalidRate { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.population_size, 100);
        assert!((config.crossover_rate - 0.4).abs() < 1e-10);
        assert!((config.mutation_rate - 0.1).abs() < 1e-10);
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.penalty, PenaltyPolicy::Fixed(1000.0));
        assert!(!config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .with_population_size(30)
            .with_crossover_rate(0.5)
            .with_mutation_rate(0.05)
            .with_max_iterations(10)
            .with_penalty(PenaltyPolicy::Scaled)
            .with_parallel(true)
            .with_seed(42);

        assert_eq!(config.population_size, 30);
        assert!((config.crossover_rate - 0.5).abs() < 1e-10);
        assert!((config.mutation_rate - 0.05).abs() < 1e-10);
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.penalty, PenaltyPolicy::Scaled);
        assert!(config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_derived_sizes() {
        let config = EngineConfig::default()
            .with_population_size(15)
            .with_crossover_rate(0.5);
        assert_eq!(config.num_crossover(), 7);
        assert_eq!(config.elite_size(), 8);

        let none = EngineConfig::default().with_crossover_rate(0.0);
        assert_eq!(none.num_crossover(), 0);
        assert_eq!(none.elite_size(), 100);
    }

    #[test]
    fn test_validate_ok() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::default()
            .with_max_iterations(0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rates() {
        let config = EngineConfig::default().with_crossover_rate(1.5);
        assert_eq!(
            config.validate(),
            Err(DomSetError::InvalidRate {
                name: "crossover rate",
                value: 1.5
            })
        );
        assert!(EngineConfig::default()
            .with_mutation_rate(-0.1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_zero_population() {
        assert!(EngineConfig::default()
            .with_population_size(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_elite_too_small() {
        let config = EngineConfig::default()
            .with_population_size(10)
            .with_crossover_rate(1.0);
        assert!(matches!(
            config.validate(),
            Err(DomSetError::InvalidConfig(_))
        ));

        // 10 · 0.9 = 9 offspring, elite of 1
        assert!(EngineConfig::default()
            .with_population_size(10)
            .with_crossover_rate(0.9)
            .validate()
            .is_err());

        // A single-individual population is fine when nothing is bred.
        assert!(EngineConfig::default()
            .with_population_size(1)
            .with_crossover_rate(0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_penalty() {
        assert!(EngineConfig::default()
            .with_penalty(PenaltyPolicy::Fixed(0.0))
            .validate()
            .is_err());
        assert!(EngineConfig::default()
            .with_penalty(PenaltyPolicy::Fixed(f64::INFINITY))
            .validate()
            .is_err());
    }

    #[test]
    fn test_parameters_order() {
        let keys: Vec<_> = EngineConfig::default()
            .parameters()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            vec!["populationSize", "crossoverRate", "mutationRate", "maxIterations"]
        );
    }
}
