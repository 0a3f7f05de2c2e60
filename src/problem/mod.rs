//! Problem definition and feasibility precomputation.
//!
//! A [`Problem`] owns the loaded devices, candidate sites, and gateway
//! profile, plus three read-only tables computed once at construction:
//!
//! - feasible configurations per (device, site), sorted by id
//! - feasible sites per device
//! - coverage (reachable devices) per site
//!
//! Construction fails with
//! [`PlacementError::UnreachableDevice`](crate::PlacementError::UnreachableDevice)
//! when some device has no feasible site at all.

mod config;
mod instance;

pub use config::{LinkModel, ProblemConfig};
pub use instance::Problem;
