//! Generational evolution loop.
//!
//! [`EvolutionEngine`] orchestrates the complete evolutionary process:
//! initialization → evaluation → elite selection → crossover → mutation →
//! evaluation → replacement → repeat.
//!
//! # State machine
//!
//! ```text
//!   Uninitialized ──initialize──► Initialized ──step──► Evolving(1..max) ──► Done
//! ```
//!
//! The loop always runs for exactly `max_iterations` generations; reaching
//! convergence is recorded but does not stop it.

use super::config::EngineConfig;
use super::crossover::CrossoverOperator;
use super::fitness::FitnessEvaluator;
use super::individual::Individual;
use super::mutation::MutationOperator;
use super::population::{Population, PopulationStatistics};
use super::selection::SelectionOperator;
use crate::error::{DomSetError, Result};
use crate::graph::Graph;
use crate::random::rng_from_option;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Best-fitness change below which a generation counts as converged.
pub const CONVERGENCE_EPSILON: f64 = 1e-6;

/// Lifecycle of an [`EvolutionEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Initialized,
    /// `generation` generations have completed.
    Evolving { generation: usize },
    Done,
}

/// Result of a complete run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionResult {
    /// The best individual found during the entire run.
    pub best: Individual,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Best-ever fitness after initialization (index 0) and after each
    /// generation.
    pub fitness_history: Vec<f64>,

    /// First generation whose best-ever fitness moved by less than
    /// [`CONVERGENCE_EPSILON`] from the previous one.
    pub convergence_iteration: Option<usize>,

    /// Wall time from initialization to the last generation.
    pub elapsed: Duration,
}

impl EvolutionResult {
    /// Whether the best individual is a dominating set.
    pub fn is_valid(&self) -> bool {
        self.best.is_valid().unwrap_or(false)
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Evolves a population of candidate dominating sets for one graph.
///
/// # Usage
///
/// ```
/// use u_domset::ga::{EngineConfig, EvolutionEngine};
/// use u_domset::graph::GraphGenerator;
///
/// let graph = GraphGenerator::star(5).unwrap();
/// let config = EngineConfig::default()
///     .with_population_size(30)
///     .with_max_iterations(20)
///     .with_seed(42);
///
/// let mut engine = EvolutionEngine::new(&graph, config).unwrap();
/// let result = engine.run().unwrap();
/// assert_eq!(result.fitness_history.len(), 21);
/// ```
#[derive(Debug)]
pub struct EvolutionEngine<'g> {
    graph: &'g Graph,
    config: EngineConfig,
    evaluator: FitnessEvaluator<'g>,
    selection: SelectionOperator,
    crossover: CrossoverOperator,
    mutation: MutationOperator,
    rng: StdRng,
    state: EngineState,
    population: Option<Population>,
    best: Option<Individual>,
    fitness_history: Vec<f64>,
    convergence_iteration: Option<usize>,
    started: Option<Instant>,
    elapsed: Option<Duration>,
}

impl<'g> EvolutionEngine<'g> {
    /// Creates an engine for `graph`.
    ///
    /// # Errors
    /// Any error from [`EngineConfig::validate`]; nothing is run until the
    /// configuration is accepted.
    pub fn new(graph: &'g Graph, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let mutation = MutationOperator::new(config.mutation_rate)?;

        let n = graph.num_vertices();
        if !config.penalty.separates_invalid(n) {
            warn!(
                vertices = n,
                penalty = config.penalty.coefficient(n),
                "penalty does not exceed vertex count; invalid sets may outrank valid ones"
            );
        }

        Ok(Self {
            graph,
            evaluator: FitnessEvaluator::from_policy(graph, config.penalty),
            selection: SelectionOperator::new(),
            crossover: CrossoverOperator::default(),
            mutation,
            rng: rng_from_option(config.seed),
            state: EngineState::Uninitialized,
            population: None,
            best: None,
            fitness_history: Vec::with_capacity(config.max_iterations + 1),
            convergence_iteration: None,
            started: None,
            elapsed: None,
            config,
        })
    }

    /// Replaces the random source (overrides `config.seed`).
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Replaces the crossover operator.
    pub fn with_crossover(mut self, crossover: CrossoverOperator) -> Self {
        self.crossover = crossover;
        self
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &FitnessEvaluator<'g> {
        &self.evaluator
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Generations completed so far.
    pub fn generation(&self) -> usize {
        match self.state {
            EngineState::Uninitialized | EngineState::Initialized => 0,
            EngineState::Evolving { generation } => generation,
            EngineState::Done => self.config.max_iterations,
        }
    }

    /// Best individual found so far.
    pub fn best(&self) -> Option<&Individual> {
        self.best.as_ref()
    }

    pub fn fitness_history(&self) -> &[f64] {
        &self.fitness_history
    }

    pub fn convergence_iteration(&self) -> Option<usize> {
        self.convergence_iteration
    }

    pub fn population(&self) -> Option<&Population> {
        self.population.as_ref()
    }

    /// Statistics of the current population.
    ///
    /// # Errors
    /// [`DomSetError::NotInitialized`] before [`initialize`](Self::initialize).
    pub fn population_statistics(&mut self) -> Result<PopulationStatistics> {
        self.population
            .as_mut()
            .ok_or(DomSetError::NotInitialized)?
            .statistics()
    }

    /// Builds, evaluates and sorts a random initial population, and records
    /// its best member as generation 0.
    ///
    /// Calling it again restarts the run from a fresh population.
    pub fn initialize(&mut self) -> Result<()> {
        self.started = Some(Instant::now());
        self.elapsed = None;

        let mut population = Population::random(
            self.config.population_size,
            self.graph.num_vertices(),
            &mut self.rng,
        )?;
        self.evaluate_batch(population.individuals_mut())?;
        population.sort_by_fitness();

        let best = population.best()?.clone();
        self.fitness_history.clear();
        self.fitness_history.push(best.rank_fitness());
        self.convergence_iteration = None;
        self.best = Some(best);
        self.population = Some(population);

        self.state = if self.config.max_iterations == 0 {
            self.finish();
            EngineState::Done
        } else {
            EngineState::Initialized
        };
        Ok(())
    }

    /// Runs one generation and returns its number (1-based).
    ///
    /// # Errors
    /// - [`DomSetError::NotInitialized`] before [`initialize`](Self::initialize)
    /// - [`DomSetError::AlreadyFinished`] after the last generation
    pub fn step(&mut self) -> Result<usize> {
        let generation = match self.state {
            EngineState::Uninitialized => return Err(DomSetError::NotInitialized),
            EngineState::Done => {
                return Err(DomSetError::AlreadyFinished(self.config.max_iterations))
            }
            EngineState::Initialized => 1,
            EngineState::Evolving { generation } => generation + 1,
        };

        let elite_size = self.config.elite_size();
        let num_crossover = self.config.num_crossover();

        let elite = {
            let current = self
                .population
                .as_mut()
                .ok_or(DomSetError::NotInitialized)?;
            self.selection.select_elite(current, elite_size)?
        };

        let mut next = Population::new(self.config.population_size)?;
        for ind in &elite {
            next.add(ind.clone())?;
        }

        let mut offspring = Vec::with_capacity(num_crossover + 1);
        while offspring.len() < num_crossover {
            let (p1, p2) = self.selection.select_two_parents(&elite, &mut self.rng)?;
            let (mut c1, mut c2) = self.crossover.crossover(p1, p2, &mut self.rng)?;
            self.mutation.mutate(&mut c1, &mut self.rng);
            self.mutation.mutate(&mut c2, &mut self.rng);
            offspring.push(c1);
            if offspring.len() < num_crossover {
                offspring.push(c2);
            }
        }
        self.evaluate_batch(&mut offspring)?;
        for child in offspring {
            next.add(child)?;
        }
        next.sort_by_fitness();

        let previous = self.best_fitness()?;
        let candidate = next.best()?;
        if candidate.rank_fitness() > previous {
            self.best = Some(candidate.clone());
        }
        self.population = Some(next);

        let current = self.best_fitness()?;
        self.fitness_history.push(current);
        if self.convergence_iteration.is_none() && (current - previous).abs() < CONVERGENCE_EPSILON
        {
            self.convergence_iteration = Some(generation);
        }

        let last = generation >= self.config.max_iterations;
        if self.is_progress_generation(generation) {
            self.log_progress(generation);
        }

        self.state = if last {
            self.finish();
            EngineState::Done
        } else {
            EngineState::Evolving { generation }
        };
        Ok(generation)
    }

    /// Runs to completion, initializing first if needed.
    pub fn run(&mut self) -> Result<EvolutionResult> {
        self.run_with(|_, _| Ok::<(), DomSetError>(()))
    }

    /// [`run`](Self::run), calling `on_generation` after every generation.
    ///
    /// The callback sees the engine and the generation just completed. An
    /// error from it stops the run and is returned as is.
    #[instrument(
        name = "run",
        level = "info",
        skip(self, on_generation),
        fields(
            vertices = self.graph.num_vertices(),
            population = self.config.population_size,
            iterations = self.config.max_iterations
        )
    )]
    pub fn run_with<F, E>(&mut self, mut on_generation: F) -> std::result::Result<EvolutionResult, E>
    where
        F: FnMut(&Self, usize) -> std::result::Result<(), E>,
        E: From<DomSetError>,
    {
        info!(
            crossover_rate = self.config.crossover_rate,
            mutation_rate = self.config.mutation_rate,
            elite_size = self.config.elite_size(),
            num_crossover = self.config.num_crossover(),
            "starting evolution"
        );

        if self.state == EngineState::Uninitialized {
            self.initialize()?;
        }
        while self.state != EngineState::Done {
            let generation = self.step()?;
            on_generation(self, generation)?;
        }

        let result = self.result()?;
        info!(
            best_fitness = result.best_fitness,
            set_size = result.best.dominating_set_size(),
            valid = result.is_valid(),
            convergence = ?result.convergence_iteration,
            elapsed_ms = result.elapsed_ms() as u64,
            "evolution completed"
        );
        Ok(result)
    }

    /// Whether `generation` is one the engine reports progress for: the
    /// first, every fifth, and the last.
    pub fn is_progress_generation(&self, generation: usize) -> bool {
        generation == 1 || generation % 5 == 0 || generation >= self.config.max_iterations
    }

    /// Snapshot of the run so far.
    ///
    /// # Errors
    /// [`DomSetError::NotInitialized`] before [`initialize`](Self::initialize).
    pub fn result(&self) -> Result<EvolutionResult> {
        let best = self.best.clone().ok_or(DomSetError::NotInitialized)?;
        let elapsed = match (self.elapsed, self.started) {
            (Some(elapsed), _) => elapsed,
            (None, Some(started)) => started.elapsed(),
            (None, None) => Duration::ZERO,
        };
        Ok(EvolutionResult {
            best_fitness: best.rank_fitness(),
            best,
            generations: self.generation(),
            fitness_history: self.fitness_history.clone(),
            convergence_iteration: self.convergence_iteration,
            elapsed,
        })
    }

    fn best_fitness(&self) -> Result<f64> {
        self.best
            .as_ref()
            .map(Individual::rank_fitness)
            .ok_or(DomSetError::NotInitialized)
    }

    fn evaluate_batch(&self, individuals: &mut [Individual]) -> Result<()> {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                return self.evaluator.par_evaluate_all(individuals);
            }
        }
        self.evaluator.evaluate_all(individuals)
    }

    fn finish(&mut self) {
        self.elapsed = self.started.map(|s| s.elapsed());
    }

    fn log_progress(&self, generation: usize) {
        if let Some(best) = &self.best {
            debug!(
                generation,
                best_fitness = best.rank_fitness(),
                set_size = best.dominating_set_size(),
                valid = best.is_valid().unwrap_or(false),
                converged = self.convergence_iteration == Some(generation),
                "generation progress"
            );
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::PenaltyPolicy;
    use crate::graph::GraphGenerator;
    use crate::random::create_rng;

    fn small_config() -> EngineConfig {
        EngineConfig::default()
            .with_population_size(30)
            .with_max_iterations(25)
            .with_seed(42)
    }

    // ---- Scenarios ----

    #[test]
    fn test_star_finds_center() {
        let graph = GraphGenerator::star(5).unwrap();
        let config = EngineConfig::default().with_seed(42);
        let result = EvolutionEngine::new(&graph, config).unwrap().run().unwrap();

        assert_eq!(result.best_fitness, -1.0);
        assert!(result.is_valid());
        assert_eq!(result.best.genes(), &[1, 0, 0, 0, 0]);
        assert_eq!(result.generations, 50);
    }

    #[test]
    fn test_complete_graph_single_vertex() {
        let graph = GraphGenerator::complete(6).unwrap();
        let result = EvolutionEngine::new(&graph, small_config())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(result.best_fitness, -1.0);
        assert_eq!(result.best.dominating_set_size(), 1);
    }

    // ---- History and convergence ----

    #[test]
    fn test_history_length_and_monotone() {
        let graph = GraphGenerator::grid(4, 4).unwrap();
        let result = EvolutionEngine::new(&graph, small_config())
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(result.fitness_history.len(), 26);
        for window in result.fitness_history.windows(2) {
            assert!(
                window[1] >= window[0],
                "best-ever fitness must never decrease: {} < {}",
                window[1],
                window[0]
            );
        }
        assert_eq!(result.fitness_history.last(), Some(&result.best_fitness));
    }

    #[test]
    fn test_convergence_is_sticky() {
        let graph = GraphGenerator::grid(5, 5).unwrap();
        let mut engine = EvolutionEngine::new(&graph, small_config().with_max_iterations(40)).unwrap();
        engine.initialize().unwrap();

        let mut recorded = None;
        while engine.state() != EngineState::Done {
            engine.step().unwrap();
            match (recorded, engine.convergence_iteration()) {
                (None, now) => recorded = now,
                (Some(first), now) => assert_eq!(now, Some(first)),
            }
        }

        let history = engine.fitness_history();
        let g = engine.convergence_iteration().unwrap();
        assert!((history[g] - history[g - 1]).abs() < CONVERGENCE_EPSILON);
        for t in 1..g {
            assert!((history[t] - history[t - 1]).abs() >= CONVERGENCE_EPSILON);
        }
        // The best keeps improving after convergence, yet the record stays put.
        assert!(history[g..].windows(2).any(|w| w[1] > w[0]));
        assert_eq!(engine.convergence_iteration(), Some(g));
    }

    #[test]
    fn test_run_with_reports_every_generation() {
        let graph = GraphGenerator::path(8).unwrap();
        let mut engine =
            EvolutionEngine::new(&graph, small_config().with_max_iterations(12)).unwrap();

        let mut seen = Vec::new();
        let mut progress = Vec::new();
        let result = engine
            .run_with(|engine, generation| {
                assert_eq!(engine.generation(), generation);
                seen.push(generation);
                if engine.is_progress_generation(generation) {
                    progress.push(generation);
                }
                Ok::<(), DomSetError>(())
            })
            .unwrap();

        assert_eq!(seen, (1..=12).collect::<Vec<_>>());
        assert_eq!(progress, vec![1, 5, 10, 12]);
        assert_eq!(result.generations, 12);
    }

    #[test]
    fn test_run_with_stops_on_callback_error() {
        let graph = GraphGenerator::path(8).unwrap();
        let mut engine = EvolutionEngine::new(&graph, small_config()).unwrap();

        let err = engine
            .run_with(|_, generation| {
                if generation == 3 {
                    Err(DomSetError::InvalidConfig("stop".into()))
                } else {
                    Ok(())
                }
            })
            .unwrap_err();

        assert_eq!(err, DomSetError::InvalidConfig("stop".into()));
        assert_eq!(engine.generation(), 3);
        assert_ne!(engine.state(), EngineState::Done);
    }

    #[test]
    fn test_zero_iterations() {
        let graph = GraphGenerator::path(6).unwrap();
        let mut engine =
            EvolutionEngine::new(&graph, small_config().with_max_iterations(0)).unwrap();
        let result = engine.run().unwrap();

        assert_eq!(engine.state(), EngineState::Done);
        assert_eq!(result.generations, 0);
        assert_eq!(result.fitness_history.len(), 1);
        assert_eq!(result.convergence_iteration, None);
    }

    // ---- Population bookkeeping ----

    #[test]
    fn test_odd_offspring_count_keeps_size() {
        let graph = GraphGenerator::cycle(8).unwrap();
        // 11 · 0.3 = 3 offspring, elite of 8
        let config = small_config()
            .with_population_size(11)
            .with_crossover_rate(0.3)
            .with_max_iterations(5);
        let mut engine = EvolutionEngine::new(&graph, config).unwrap();
        engine.initialize().unwrap();
        for _ in 0..5 {
            engine.step().unwrap();
            let pop = engine.population().unwrap();
            assert_eq!(pop.len(), 11);
            assert!(pop.iter().all(Individual::is_evaluated));
            assert!(pop.is_sorted());
        }
    }

    #[test]
    fn test_no_crossover_keeps_initial_best() {
        let graph = GraphGenerator::path(10).unwrap();
        let config = small_config().with_crossover_rate(0.0).with_max_iterations(5);
        let mut engine = EvolutionEngine::new(&graph, config).unwrap();
        let result = engine.run().unwrap();
        assert!(result
            .fitness_history
            .iter()
            .all(|&f| f == result.fitness_history[0]));
        assert_eq!(result.convergence_iteration, Some(1));
    }

    #[test]
    fn test_population_statistics() {
        let graph = GraphGenerator::star(6).unwrap();
        let mut engine = EvolutionEngine::new(&graph, small_config()).unwrap();
        assert_eq!(
            engine.population_statistics().err(),
            Some(DomSetError::NotInitialized)
        );

        engine.run().unwrap();
        let stats = engine.population_statistics().unwrap();
        assert_eq!(stats.size, 30);
        assert!(stats.best_fitness >= stats.average_fitness);
        assert!(stats.average_fitness >= stats.worst_fitness);
        assert!(stats.valid_individuals >= 1);
    }

    // ---- State machine and errors ----

    #[test]
    fn test_state_transitions() {
        let graph = GraphGenerator::path(4).unwrap();
        let config = small_config().with_max_iterations(2);
        let mut engine = EvolutionEngine::new(&graph, config).unwrap();

        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert_eq!(engine.step(), Err(DomSetError::NotInitialized));
        assert!(engine.result().is_err());

        engine.initialize().unwrap();
        assert_eq!(engine.state(), EngineState::Initialized);
        assert_eq!(engine.fitness_history().len(), 1);

        assert_eq!(engine.step(), Ok(1));
        assert_eq!(engine.state(), EngineState::Evolving { generation: 1 });
        assert_eq!(engine.step(), Ok(2));
        assert_eq!(engine.state(), EngineState::Done);
        assert_eq!(engine.step(), Err(DomSetError::AlreadyFinished(2)));
    }

    #[test]
    fn test_invalid_config_rejected_before_run() {
        let graph = GraphGenerator::path(4).unwrap();
        assert!(matches!(
            EvolutionEngine::new(&graph, EngineConfig::default().with_mutation_rate(2.0)),
            Err(DomSetError::InvalidRate { .. })
        ));
        assert!(matches!(
            EvolutionEngine::new(
                &graph,
                EngineConfig::default()
                    .with_population_size(4)
                    .with_crossover_rate(1.0)
            ),
            Err(DomSetError::InvalidConfig(_))
        ));
    }

    // ---- Reproducibility ----

    #[test]
    fn test_seed_reproducibility() {
        let mut generator = GraphGenerator::seeded(3);
        let graph = generator.random(20, 35).unwrap();

        let run = || {
            EvolutionEngine::new(&graph, small_config().with_seed(7))
                .unwrap()
                .run()
                .unwrap()
        };
        let a = run();
        let b = run();
        assert_eq!(a.fitness_history, b.fitness_history);
        assert_eq!(a.best.genes(), b.best.genes());
        assert_eq!(a.convergence_iteration, b.convergence_iteration);
    }

    #[test]
    fn test_with_rng_overrides_seed() {
        let graph = GraphGenerator::path(12).unwrap();
        let a = EvolutionEngine::new(&graph, small_config().with_seed(1))
            .unwrap()
            .with_rng(create_rng(99))
            .run()
            .unwrap();
        let b = EvolutionEngine::new(&graph, small_config().with_seed(99))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(a.fitness_history, b.fitness_history);
    }

    #[test]
    fn test_scaled_penalty_on_large_graph() {
        let graph = GraphGenerator::path(30).unwrap();
        let config = small_config()
            .with_penalty(PenaltyPolicy::Scaled)
            .with_max_iterations(10);
        let result = EvolutionEngine::new(&graph, config).unwrap().run().unwrap();
        assert_eq!(result.fitness_history.len(), 11);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let graph = GraphGenerator::grid(4, 5).unwrap();
        let serial = EvolutionEngine::new(&graph, small_config())
            .unwrap()
            .run()
            .unwrap();
        let parallel = EvolutionEngine::new(&graph, small_config().with_parallel(true))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(serial.fitness_history, parallel.fitness_history);
        assert_eq!(serial.best.genes(), parallel.best.genes());
    }
}
