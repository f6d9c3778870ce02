//! Candidate solutions.
//!
//! An [`Individual`] is a binary chromosome (gene `i` = 1 means vertex `i`
//! is in the candidate dominating set) plus the result of its last
//! evaluation.
//!
//! # Fitness lifecycle
//!
//! ```text
//!   new / crossover ──► Dirty ──evaluate──► Fresh
//!                         ▲                   │
//!                         └── gene changed ───┘
//! ```
//!
//! [`Individual::fitness`] returns `None` while dirty, so a stale score can
//! never be read.

use crate::error::{DomSetError, Result};
use rand::Rng;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Evaluation state of an [`Individual`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FitnessState {
    /// Genes changed since the last evaluation (or never evaluated).
    Dirty,
    /// Score matches the current genes.
    Fresh { fitness: f64, valid: bool },
}

/// A binary chromosome with cached fitness.
///
/// Equality and hashing look at the genes only.
///
/// # Examples
///
/// ```
/// use u_domset::ga::Individual;
///
/// let mut ind = Individual::new(vec![1, 0, 0, 1]).unwrap();
/// assert_eq!(ind.dominating_set_size(), 2);
/// assert_eq!(ind.fitness(), None);
///
/// ind.set_fitness(-2.0, true);
/// assert_eq!(ind.fitness(), Some(-2.0));
///
/// ind.flip_gene(1).unwrap();
/// assert_eq!(ind.fitness(), None); // stale again
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "IndividualRepr"))]
pub struct Individual {
    genes: Vec<u8>,
    state: FitnessState,
}

/// Unchecked wire form; genes are validated on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct IndividualRepr {
    genes: Vec<u8>,
    state: FitnessState,
}

#[cfg(feature = "serde")]
impl TryFrom<IndividualRepr> for Individual {
    type Error = DomSetError;

    fn try_from(repr: IndividualRepr) -> Result<Self> {
        let mut individual = Individual::new(repr.genes)?;
        individual.state = repr.state;
        Ok(individual)
    }
}

impl Individual {
    /// Creates an unevaluated individual from explicit genes.
    ///
    /// # Errors
    /// [`DomSetError::InvalidGene`] if any value is not 0 or 1.
    pub fn new(genes: Vec<u8>) -> Result<Self> {
        if let Some(&bad) = genes.iter().find(|&&g| g > 1) {
            return Err(DomSetError::InvalidGene(bad));
        }
        Ok(Self::from_bits(genes))
    }

    /// Creates an unevaluated individual with each gene drawn uniformly.
    pub fn random<R: Rng>(len: usize, rng: &mut R) -> Self {
        Self::from_bits((0..len).map(|_| rng.random_range(0..=1u8)).collect())
    }

    /// Builds from genes already known to be binary.
    pub(crate) fn from_bits(genes: Vec<u8>) -> Self {
        debug_assert!(genes.iter().all(|&g| g <= 1));
        Self {
            genes,
            state: FitnessState::Dirty,
        }
    }

    pub fn genes(&self) -> &[u8] {
        &self.genes
    }

    /// Gene at `index`, or `None` past the end.
    pub fn gene(&self, index: usize) -> Option<u8> {
        self.genes.get(index).copied()
    }

    /// Chromosome length (== number of graph vertices).
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Toggles gene `index` and marks the fitness stale.
    pub fn flip_gene(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.genes[index] ^= 1;
        self.state = FitnessState::Dirty;
        Ok(())
    }

    /// Sets gene `index` to `value`. Fitness goes stale only on change.
    ///
    /// # Errors
    /// `value` not in {0, 1}, or `index` out of range.
    pub fn set_gene(&mut self, index: usize, value: u8) -> Result<()> {
        if value > 1 {
            return Err(DomSetError::InvalidGene(value));
        }
        self.check_index(index)?;
        if self.genes[index] != value {
            self.genes[index] = value;
            self.state = FitnessState::Dirty;
        }
        Ok(())
    }

    /// Swaps two genes; fitness goes stale only if they differed.
    pub(crate) fn swap_genes(&mut self, i: usize, j: usize) {
        if self.genes[i] != self.genes[j] {
            self.genes.swap(i, j);
            self.state = FitnessState::Dirty;
        }
    }

    /// Number of genes set to 1.
    pub fn dominating_set_size(&self) -> usize {
        self.genes.iter().filter(|&&g| g == 1).count()
    }

    /// Vertices selected by this chromosome.
    pub fn dominating_set(&self) -> BTreeSet<usize> {
        self.genes
            .iter()
            .enumerate()
            .filter(|(_, &g)| g == 1)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn state(&self) -> FitnessState {
        self.state
    }

    pub fn is_evaluated(&self) -> bool {
        matches!(self.state, FitnessState::Fresh { .. })
    }

    /// Fitness of the current genes, `None` if stale.
    pub fn fitness(&self) -> Option<f64> {
        match self.state {
            FitnessState::Fresh { fitness, .. } => Some(fitness),
            FitnessState::Dirty => None,
        }
    }

    /// Whether the current genes form a dominating set, `None` if stale.
    pub fn is_valid(&self) -> Option<bool> {
        match self.state {
            FitnessState::Fresh { valid, .. } => Some(valid),
            FitnessState::Dirty => None,
        }
    }

    /// Records an evaluation result. Called by the fitness evaluator.
    pub fn set_fitness(&mut self, fitness: f64, valid: bool) {
        self.state = FitnessState::Fresh { fitness, valid };
    }

    /// Fitness used for ranking; unevaluated individuals rank last.
    pub(crate) fn rank_fitness(&self) -> f64 {
        self.fitness().unwrap_or(f64::NEG_INFINITY)
    }

    /// Descending-fitness order: `Less` means `self` ranks ahead.
    pub fn cmp_by_fitness(&self, other: &Self) -> Ordering {
        other.rank_fitness().total_cmp(&self.rank_fitness())
    }

    /// Genes as `[1, 0, 1]`.
    pub fn to_compact_string(&self) -> String {
        format!("{:?}", self.genes)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.genes.len() {
            return Err(DomSetError::GeneOutOfRange {
                index,
                len: self.genes.len(),
            });
        }
        Ok(())
    }
}

impl PartialEq for Individual {
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes
    }
}

impl Eq for Individual {}

impl Hash for Individual {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.genes.hash(state);
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            FitnessState::Fresh { fitness, valid } => write!(
                f,
                "Individual[genes={:?}, fitness={:.2}, size={}, valid={}]",
                self.genes,
                fitness,
                self.dominating_set_size(),
                valid
            ),
            FitnessState::Dirty => write!(
                f,
                "Individual[genes={:?}, fitness=?, size={}]",
                self.genes,
                self.dominating_set_size()
            ),
        }
    }
}
