//! Seeded random number generation.
//!
//! Every stochastic component in this crate takes an explicit `&mut R: Rng`.
//! Runners build their generator here from `config.seed`, so a seeded run is
//! reproducible end to end.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from an optional seed, drawing fresh entropy when
/// `seed` is `None`.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}
