//! Genetic algorithm for small dominating sets.
//!
//! Candidate solutions are binary chromosomes over the graph's vertices.
//! Fitness is the negated set size, with a per-vertex penalty for every
//! vertex left undominated. Each generation keeps the elite unchanged and
//! refills the rest of the population with mutated crossover offspring of
//! elite parents.
//!
//! # Key Types
//!
//! - [`Individual`]: a chromosome with its fitness lifecycle
//! - [`Population`]: fixed-capacity, lazily sorted collection
//! - [`FitnessEvaluator`]: penalty-based scoring against a [`Graph`](crate::graph::Graph)
//! - [`SelectionOperator`], [`CrossoverOperator`], [`MutationOperator`]
//! - [`EngineConfig`]: algorithm parameters
//! - [`EvolutionEngine`]: executes the generational loop
//! - [`EvolutionResult`]: best solution, fitness history, convergence
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Haynes, Hedetniemi & Slater (1998), *Fundamentals of Domination in Graphs*

mod config;
pub mod crossover;
mod engine;
mod fitness;
mod individual;
pub mod mutation;
mod population;
mod selection;

pub use config::EngineConfig;
pub use crossover::{CrossoverOperator, CrossoverStrategy};
pub use engine::{EngineState, EvolutionEngine, EvolutionResult, CONVERGENCE_EPSILON};
pub use fitness::{Evaluation, FitnessEvaluator, PenaltyPolicy, VertexStatus, DEFAULT_PENALTY};
pub use individual::{FitnessState, Individual};
pub use mutation::MutationOperator;
pub use population::{Population, PopulationStatistics};
pub use selection::SelectionOperator;
