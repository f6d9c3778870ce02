//! Evolutionary search for small dominating sets.
//!
//! A dominating set of a graph is a vertex subset `D` such that every vertex
//! is in `D` or adjacent to a member of `D`. Finding a minimum one is
//! NP-hard; this crate runs a generational genetic algorithm over binary
//! chromosomes and returns the best set it finds.
//!
//! - **Graph**: undirected simple graphs and generators (random, path,
//!   cycle, star, grid, complete).
//! - **Genetic Algorithm (GA)**: penalty-based fitness, elitist selection,
//!   midpoint crossover and single-gene mutation, driven by a
//!   seedable [`EvolutionEngine`](ga::EvolutionEngine).
//! - **Reporting**: text report, fitness CSV, run summary and edge list.
//! - **CLI**: the interactive menu behind the `u-domset` binary.
//!
//! # Example
//!
//! ```
//! use u_domset::ga::{EngineConfig, EvolutionEngine};
//! use u_domset::graph::GraphGenerator;
//!
//! let graph = GraphGenerator::grid(4, 4).unwrap();
//! let config = EngineConfig::default().with_seed(7);
//! let result = EvolutionEngine::new(&graph, config).unwrap().run().unwrap();
//!
//! assert_eq!(result.fitness_history.len(), 51);
//! println!("best set: {:?}", result.best.dominating_set());
//! ```
//!
//! # Features
//!
//! - `parallel`: evaluate offspring with rayon when
//!   [`EngineConfig::parallel`](ga::EngineConfig::parallel) is set
//! - `serde`: `Serialize`/`Deserialize` for configuration, results and
//!   statistics

pub mod cli;
pub mod error;
pub mod ga;
pub mod graph;
pub mod logging;
pub mod random;
pub mod report;

pub use error::{DomSetError, ReportError, Result};
