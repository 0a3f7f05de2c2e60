//! Assignment and move value types.

use crate::model::{ConfigId, DeviceId, SiteId};

/// The (site, configuration) pair serving one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub site: SiteId,
    pub config: ConfigId,
}

impl Assignment {
    pub fn new(site: SiteId, config: ConfigId) -> Self {
        Self { site, config }
    }
}

/// The dimension a single move changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// The device moves to another site (the configuration follows if needed).
    Site,
    /// The device keeps its site and steps to another configuration.
    Config,
}

/// The single-device move that produced a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    pub device: DeviceId,
    pub axis: Axis,
    pub previous: Assignment,
    pub next: Assignment,
}

impl Move {
    /// Short-term memory key: `(device, axis)`.
    pub fn key(&self) -> (DeviceId, Axis) {
        (self.device, self.axis)
    }
}
