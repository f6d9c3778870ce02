//! Seeded random sources.
//!
//! Every component draws randomness from an `Rng` passed in by the caller.
//! These helpers build the concrete generator the engine and the graph
//! generators own.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from `seed`, or from OS entropy when `None`.
pub fn rng_from_option(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = create_rng(7);
        let mut b = create_rng(7);
        let xs: Vec<u32> = (0..16).map(|_| a.random_range(0..1000)).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.random_range(0..1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_option_seed() {
        let mut a = rng_from_option(Some(3));
        let mut b = create_rng(3);
        assert_eq!(a.random::<u64>(), b.random::<u64>());
    }
}
