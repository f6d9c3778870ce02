//! Binary-chromosome crossover.
//!
//! Every strategy takes two equal-length parents and yields two unevaluated
//! offspring. Gene `i` of each child always comes from gene `i` of one
//! parent, so positions (vertices) are never shuffled.
//!
//! - [`CrossoverStrategy::Midpoint`]: cut at `len / 2` (the engine default)
//! - [`CrossoverStrategy::RandomPoint`]: cut at a random point in `1..len`
//! - [`CrossoverStrategy::TwoPoint`]: swap a random middle segment
//! - [`CrossoverStrategy::Uniform`]: coin flip per gene

use super::individual::Individual;
use crate::error::{DomSetError, Result};
use rand::Rng;

/// Which recombination rule a [`CrossoverOperator`] applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossoverStrategy {
    #[default]
    Midpoint,
    RandomPoint,
    TwoPoint,
    Uniform,
}

/// Recombines two parents into two offspring.
///
/// # Examples
///
/// ```
/// use u_domset::ga::{CrossoverOperator, Individual};
/// use u_domset::random::create_rng;
///
/// let p1 = Individual::new(vec![1, 1, 1, 1]).unwrap();
/// let p2 = Individual::new(vec![0, 0, 0, 0]).unwrap();
/// let mut rng = create_rng(0);
///
/// let (c1, c2) = CrossoverOperator::default()
///     .crossover(&p1, &p2, &mut rng)
///     .unwrap();
/// assert_eq!(c1.genes(), &[1, 1, 0, 0]);
/// assert_eq!(c2.genes(), &[0, 0, 1, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrossoverOperator {
    strategy: CrossoverStrategy,
}

impl CrossoverOperator {
    pub fn new(strategy: CrossoverStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> CrossoverStrategy {
        self.strategy
    }

    /// Applies the configured strategy.
    ///
    /// # Errors
    /// [`DomSetError::LengthMismatch`] if the parents differ in length.
    pub fn crossover<R: Rng>(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        rng: &mut R,
    ) -> Result<(Individual, Individual)> {
        match self.strategy {
            CrossoverStrategy::Midpoint => single_point(parent1, parent2),
            CrossoverStrategy::RandomPoint => random_point(parent1, parent2, rng),
            CrossoverStrategy::TwoPoint => two_point(parent1, parent2, rng),
            CrossoverStrategy::Uniform => uniform(parent1, parent2, rng),
        }
    }
}

/// Single-point crossover at `len / 2`.
///
/// `child1 = p1[..mid] ++ p2[mid..]`, `child2 = p2[..mid] ++ p1[mid..]`.
pub fn single_point(parent1: &Individual, parent2: &Individual) -> Result<(Individual, Individual)> {
    let n = check_lengths(parent1, parent2)?;
    Ok(cut_at(parent1, parent2, n / 2))
}

/// Single-point crossover at a random point in `1..len`.
///
/// Chromosomes shorter than 2 genes have no interior point and are copied.
pub fn random_point<R: Rng>(
    parent1: &Individual,
    parent2: &Individual,
    rng: &mut R,
) -> Result<(Individual, Individual)> {
    let n = check_lengths(parent1, parent2)?;
    if n < 2 {
        return Ok(cut_at(parent1, parent2, n));
    }
    Ok(cut_at(parent1, parent2, rng.random_range(1..n)))
}

/// Two-point crossover: genes in `[a, b)` are exchanged, with `a, b` drawn
/// from `1..len` and ordered.
pub fn two_point<R: Rng>(
    parent1: &Individual,
    parent2: &Individual,
    rng: &mut R,
) -> Result<(Individual, Individual)> {
    let n = check_lengths(parent1, parent2)?;
    if n < 2 {
        return Ok(cut_at(parent1, parent2, n));
    }
    let a = rng.random_range(1..n);
    let b = rng.random_range(1..n);
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

    let (g1, g2) = (parent1.genes(), parent2.genes());
    let mut c1 = g1.to_vec();
    let mut c2 = g2.to_vec();
    c1[lo..hi].copy_from_slice(&g2[lo..hi]);
    c2[lo..hi].copy_from_slice(&g1[lo..hi]);
    Ok((Individual::from_bits(c1), Individual::from_bits(c2)))
}

/// Uniform crossover: each position is swapped between the children with
/// probability 1/2.
pub fn uniform<R: Rng>(
    parent1: &Individual,
    parent2: &Individual,
    rng: &mut R,
) -> Result<(Individual, Individual)> {
    check_lengths(parent1, parent2)?;
    let (c1, c2): (Vec<u8>, Vec<u8>) = parent1
        .genes()
        .iter()
        .zip(parent2.genes())
        .map(|(&a, &b)| if rng.random_bool(0.5) { (a, b) } else { (b, a) })
        .unzip();
    Ok((Individual::from_bits(c1), Individual::from_bits(c2)))
}

fn cut_at(parent1: &Individual, parent2: &Individual, point: usize) -> (Individual, Individual) {
    let (g1, g2) = (parent1.genes(), parent2.genes());
    let c1 = [&g1[..point], &g2[point..]].concat();
    let c2 = [&g2[..point], &g1[point..]].concat();
    (Individual::from_bits(c1), Individual::from_bits(c2))
}

fn check_lengths(parent1: &Individual, parent2: &Individual) -> Result<usize> {
    if parent1.len() != parent2.len() {
        return Err(DomSetError::LengthMismatch {
            expected: parent1.len(),
            actual: parent2.len(),
        });
    }
    Ok(parent1.len())
}
