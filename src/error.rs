//! Error type shared by the problem model and every solver.

use crate::model::{ConfigId, DeviceId, SiteId, SliceId};

/// Errors raised while building a problem, constructing a solution, or
/// searching.
///
/// None of these are retried internally. Solvers either discard the
/// candidate that produced the error (GA children, GRASP restarts) or
/// abort the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementError {
    /// No candidate site reaches the device with any configuration.
    #[error("infeasible problem: no candidate site is able to reach device {device}")]
    UnreachableDevice { device: DeviceId },

    /// The device belongs to a slice the gateway profile does not describe.
    #[error("device {device} uses slice {slice}, but the gateway profile defines {defined} slices")]
    UnknownSlice {
        device: DeviceId,
        slice: SliceId,
        defined: usize,
    },

    /// The (site, configuration) pair is not in the device's feasibility table.
    #[error("device {device} cannot be served by site {site} with configuration {config}")]
    InfeasibleAssignment {
        device: DeviceId,
        site: SiteId,
        config: ConfigId,
    },

    /// Capacity repair ran out of devices to move off an overloaded site.
    #[error("capacity repair exhausted: site {site} stays overloaded on slice {slice}")]
    CapacityExhausted { site: SiteId, slice: SliceId },

    /// Neighbor generation produced no valid move within its retry budget.
    #[error("no valid move found after {attempts} attempts")]
    NoMoveFound { attempts: usize },

    /// A construction finished with a device left without a site.
    #[error("construction left device {device} unassigned")]
    UnassignedDevice { device: DeviceId },

    /// Deployed-site decoding found no site able to take the device.
    #[error("no candidate site is available for device {device}")]
    NoSiteAvailable { device: DeviceId },

    /// A configuration struct failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The genetic algorithm's worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}

/// Result alias using [`PlacementError`].
pub type Result<T> = std::result::Result<T, PlacementError>;
