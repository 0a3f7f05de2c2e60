//! Genetic Algorithm (GA) over deployed-site genes.
//!
//! Individuals are full solutions; crossover and mutation act on their
//! deployed-site bit vectors, and children are rebuilt by greedy
//! coverage decoding. Fitness is the inverse cost `max_cost - cost`.
//! Offspring are produced in parallel on a fixed-size rayon pool, and the
//! best few of every generation are polished with a short tabu search.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, selection, workers)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Final optimization result with statistics
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod crossover;
mod population;
mod runner;
mod selection;

pub use config::GaConfig;
pub use crossover::{crossover, decode_child, gene_sites, recombine_genes, Offspring};
pub use population::Population;
pub use runner::{GaResult, GaRunner, GenerationStats};
pub use selection::Selection;
