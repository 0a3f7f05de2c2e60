//! Tabu Search (TS) over device assignments.
//!
//! The search alternates two phases until the iteration cap, the time
//! limit, or cancellation stops it:
//!
//! - **Intensify**: repeatedly sample a batch of neighbors of the current
//!   solution and move to the cheapest admissible one, as long as it is
//!   not worse. A short-term FIFO list forbids recently changed
//!   `(device, axis)` pairs unless the move reaches the global best
//!   (aspiration). The phase ends after `max_no_improve` iterations without
//!   beating the phase's elite solution.
//! - **Diversify**: add the elite solution's deployed sites to a long-term
//!   tabu site memory and restart from a random solution that avoids them.
//!
//! GA refinement and GRASP local search start the same engine from their
//! own solution via [`TabuRunner::run_from`].
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search, Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search, Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod runner;
mod types;

pub use config::TabuConfig;
pub use runner::{TabuResult, TabuRunner};
pub use types::{Phase, SiteMemory, TabuList};
