//! Simulated Annealing (SA) over device assignments.
//!
//! Each step draws a neighbor 1 to 5 chained moves away from the current
//! solution. Non-worsening neighbors are always accepted; worse ones with
//! probability `exp(-(next - current) / T)`. The global best is tracked
//! independently of acceptance.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod config;
mod runner;

pub use config::{CoolingSchedule, SaConfig};
pub use runner::{SaResult, SaRunner};
