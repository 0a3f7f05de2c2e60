//! Device-to-(site, configuration) assignments.
//!
//! A [`Solution`] borrows its [`Problem`](crate::problem::Problem) and keeps
//! the aggregates every solver reads on the hot path:
//!
//! - per (site, slice) load
//! - per site device membership
//! - the deployed-site set
//! - per spreading-factor device counts
//!
//! All of them are maintained by one mutation point,
//! [`Solution::update_association`], so cost is an O(#SF) pure function of
//! the current state.
//!
//! Cloning a solution deep-copies every aggregate. Solvers mutate clones,
//! never the solution they were handed.
//!
//! # Capacity
//!
//! A freshly mutated solution may overload a (site, slice). Call
//! [`Solution::fix_capacity`] before exposing it as a current or best
//! solution. Every constructor in this module does so already.

mod construct;
mod repair;
mod report;
mod state;
mod types;

pub use state::Solution;
pub use types::{Assignment, Axis, Move};
