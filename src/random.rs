//! Seeded random sources.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a reproducible random source from a 64-bit seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Derives `count` per-worker seeds from `base_seed`.
///
/// The same base seed always yields the same sequence, so a multi-start run
/// is reproducible worker by worker.
pub fn derive_seeds(base_seed: u64, count: usize) -> Vec<u64> {
    let mut rng = create_rng(base_seed);
    (0..count).map(|_| rng.random::<u64>()).collect()
}
