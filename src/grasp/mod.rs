//! Greedy Randomized Adaptive Search Procedure (GRASP).
//!
//! Each restart builds a site cover greedily: sites are ranked by how many
//! still-uncovered devices they reach, one is drawn from the restricted
//! candidate list of near-best sites, and it takes as many uncovered
//! devices as its per-slice capacity margin allows. The cover is turned
//! into a solution at a fixed spreading factor and refined with tabu
//! search.
//!
//! # References
//!
//! - Feo, T. A. & Resende, M. G. C. (1995). "Greedy Randomized Adaptive
//!   Search Procedures", *Journal of Global Optimization* 6, 109-133.

mod config;
mod construct;
mod runner;

pub use config::GraspConfig;
pub use construct::greedy_randomized_cover;
pub use runner::{GraspResult, GraspRunner};
