//! Gateway placement and device configuration optimization.
//!
//! Given end-devices, candidate gateway sites and a discrete space of radio
//! configurations (spreading factor × transmission power), find an
//! assignment of every device to one (site, configuration) pair that
//! reaches the site, meets the QoS bound of the device's slice, and keeps
//! every site within its per-slice datarate capacity, while minimizing
//! `alpha · deployed sites + beta · worst spreading-factor count`.
//!
//! - [`problem`]: immutable instance with precomputed feasibility tables.
//! - [`solution`]: assignment state with incremental cost bookkeeping,
//!   capacity repair and constructions.
//! - [`neighbor`]: single-move, batch and chained neighbor generation.
//! - **Tabu Search** ([`tabu`]): intensify/diversify search with a
//!   short-term move list and a long-term site memory.
//! - **Simulated Annealing** ([`sa`]): chained-move annealing with
//!   pluggable cooling schedules.
//! - **Genetic Algorithm** ([`ga`]): deployed-site genes, parallel
//!   reproduction and tabu refinement of the elite.
//! - **GRASP** ([`grasp`]): greedy randomized coverage construction
//!   followed by tabu search.
//!
//! Solvers never write files; each result carries a [`progress::ProgressLog`]
//! and the best solution exposes CSV-style reports.
//!
//! # Example
//!
//! ```
//! use u_placement::model::{CandidatePosition, Device, GatewayProfile, Position};
//! use u_placement::problem::{Problem, ProblemConfig};
//! use u_placement::tabu::{TabuConfig, TabuRunner};
//!
//! # fn main() -> u_placement::Result<()> {
//! let devices = vec![
//!     Device::new(0, Position::new(100.0, 0.0, 0.0), 0),
//!     Device::new(1, Position::new(0.0, 150.0, 0.0), 0),
//! ];
//! let sites = vec![
//!     CandidatePosition::new(0, Position::new(0.0, 0.0, 30.0)),
//!     CandidatePosition::new(1, Position::new(500.0, 0.0, 30.0)),
//! ];
//! let gateway = GatewayProfile::reference(1);
//! let problem = Problem::new(ProblemConfig::default(), devices, sites, gateway)?;
//!
//! let config = TabuConfig::default().with_max_iterations(200).with_seed(1);
//! let result = TabuRunner::run(&problem, &config)?;
//! assert!(result.best.is_feasible());
//! assert_eq!(result.best.num_deployed(), 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ga;
pub mod grasp;
pub mod model;
pub mod neighbor;
pub mod problem;
pub mod progress;
pub mod random;
pub mod sa;
pub mod solution;
pub mod tabu;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{PlacementError, Result};
