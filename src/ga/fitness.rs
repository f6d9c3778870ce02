//! Penalty-based fitness for dominating-set chromosomes.
//!
//! # Scoring
//!
//! Let `size` be the number of selected vertices and `violations` the number
//! of vertices that are neither selected nor adjacent to a selected vertex.
//!
//! ```text
//!   violations == 0  →  fitness = −size                         (valid)
//!   violations  > 0  →  fitness = −size − penalty · violations  (invalid)
//! ```
//!
//! Higher is better. Every invalid chromosome ranks below every valid one
//! only while `penalty > num_vertices`; see [`PenaltyPolicy`].

use super::individual::Individual;
use super::population::Population;
use crate::error::{DomSetError, Result};
use crate::graph::Graph;

/// Default penalty per undominated vertex.
pub const DEFAULT_PENALTY: f64 = 1000.0;

/// How the per-violation penalty is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PenaltyPolicy {
    /// A constant coefficient.
    Fixed(f64),
    /// `num_vertices + 1`: the smallest integer coefficient that keeps any
    /// invalid individual below every valid one on the given graph.
    Scaled,
}

impl Default for PenaltyPolicy {
    fn default() -> Self {
        PenaltyPolicy::Fixed(DEFAULT_PENALTY)
    }
}

impl PenaltyPolicy {
    /// Resolves the coefficient for a graph with `num_vertices` vertices.
    pub fn coefficient(&self, num_vertices: usize) -> f64 {
        match *self {
            PenaltyPolicy::Fixed(c) => c,
            PenaltyPolicy::Scaled => num_vertices as f64 + 1.0,
        }
    }

    /// Whether invalid individuals are guaranteed to rank below valid ones.
    pub fn separates_invalid(&self, num_vertices: usize) -> bool {
        self.coefficient(num_vertices) > num_vertices as f64
    }
}

/// Outcome of scoring one chromosome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub fitness: f64,
    pub valid: bool,
    pub size: usize,
    pub violations: usize,
}

/// Per-vertex domination status, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexStatus {
    InSet,
    DominatedBy(usize),
    NotDominated,
}

/// Scores [`Individual`]s against a fixed graph.
///
/// # Examples
///
/// ```
/// use u_domset::ga::{FitnessEvaluator, Individual};
/// use u_domset::graph::GraphGenerator;
///
/// let path = GraphGenerator::path(4).unwrap();
/// let evaluator = FitnessEvaluator::new(&path);
///
/// let mut empty = Individual::new(vec![0, 0, 0, 0]).unwrap();
/// let fitness = evaluator.evaluate(&mut empty).unwrap();
/// assert_eq!(fitness, -4000.0);
/// assert_eq!(empty.is_valid(), Some(false));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'g> {
    graph: &'g Graph,
    penalty: f64,
}

impl<'g> FitnessEvaluator<'g> {
    /// Evaluator with the default penalty of 1000 per violation.
    pub fn new(graph: &'g Graph) -> Self {
        Self::with_penalty(graph, DEFAULT_PENALTY)
    }

    pub fn with_penalty(graph: &'g Graph, penalty: f64) -> Self {
        Self { graph, penalty }
    }

    pub fn from_policy(graph: &'g Graph, policy: PenaltyPolicy) -> Self {
        Self::with_penalty(graph, policy.coefficient(graph.num_vertices()))
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// Scores `genes` without touching any individual.
    ///
    /// # Errors
    /// [`DomSetError::LengthMismatch`] if the chromosome length differs from
    /// the vertex count.
    pub fn score(&self, genes: &[u8]) -> Result<Evaluation> {
        self.check_len(genes)?;
        let size = genes.iter().filter(|&&g| g == 1).count();
        let violations = self.count_violations(genes);
        let valid = violations == 0;
        let fitness = if valid {
            -(size as f64)
        } else {
            -(size as f64) - self.penalty * violations as f64
        };
        Ok(Evaluation {
            fitness,
            valid,
            size,
            violations,
        })
    }

    /// Scores `individual` and stores the result in it.
    pub fn evaluate(&self, individual: &mut Individual) -> Result<f64> {
        let eval = self.score(individual.genes())?;
        individual.set_fitness(eval.fitness, eval.valid);
        Ok(eval.fitness)
    }

    /// Evaluates every individual whose fitness is stale.
    pub fn evaluate_population(&self, population: &mut Population) -> Result<()> {
        self.evaluate_all(population.individuals_mut())
    }

    /// Evaluates every stale individual in `individuals`.
    pub fn evaluate_all(&self, individuals: &mut [Individual]) -> Result<()> {
        for ind in individuals.iter_mut().filter(|i| !i.is_evaluated()) {
            self.evaluate(ind)?;
        }
        Ok(())
    }

    /// Parallel variant of [`evaluate_all`](Self::evaluate_all).
    ///
    /// Scoring consumes no randomness, so the outcome matches the serial
    /// path exactly.
    #[cfg(feature = "parallel")]
    pub fn par_evaluate_all(&self, individuals: &mut [Individual]) -> Result<()> {
        use rayon::prelude::*;
        individuals
            .par_iter_mut()
            .filter(|i| !i.is_evaluated())
            .try_for_each(|ind| self.evaluate(ind).map(|_| ()))
    }

    /// Whether `individual` selects a dominating set.
    pub fn is_valid_dominating_set(&self, individual: &Individual) -> Result<bool> {
        Ok(self.violation_count(individual)? == 0)
    }

    /// Number of undominated vertices.
    pub fn violation_count(&self, individual: &Individual) -> Result<usize> {
        self.check_len(individual.genes())?;
        Ok(self.count_violations(individual.genes()))
    }

    /// Explains, vertex by vertex, why `individual` is or is not valid.
    ///
    /// A dominated vertex reports its lowest-numbered selected neighbour.
    pub fn domination_report(&self, individual: &Individual) -> Result<Vec<VertexStatus>> {
        let genes = individual.genes();
        self.check_len(genes)?;
        Ok(self
            .graph
            .adjacency()
            .map(|(v, neighbors)| {
                if genes[v] == 1 {
                    VertexStatus::InSet
                } else {
                    neighbors
                        .iter()
                        .find(|&&u| genes[u] == 1)
                        .map_or(VertexStatus::NotDominated, |&u| {
                            VertexStatus::DominatedBy(u)
                        })
                }
            })
            .collect())
    }

    fn count_violations(&self, genes: &[u8]) -> usize {
        self.graph
            .adjacency()
            .filter(|&(v, neighbors)| genes[v] == 0 && !neighbors.iter().any(|&u| genes[u] == 1))
            .count()
    }

    fn check_len(&self, genes: &[u8]) -> Result<()> {
        let expected = self.graph.num_vertices();
        if genes.len() != expected {
            return Err(DomSetError::LengthMismatch {
                expected,
                actual: genes.len(),
            });
        }
        Ok(())
    }
}
