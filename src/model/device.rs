//! End devices and candidate gateway sites.

use super::{DeviceId, Position, SiteId, SliceId};

/// An end device requiring one radio link.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Device {
    pub id: DeviceId,
    pub position: Position,
    pub slice: SliceId,
}

impl Device {
    pub fn new(id: DeviceId, position: Position, slice: SliceId) -> Self {
        Self {
            id,
            position,
            slice,
        }
    }
}

/// A location where a gateway may be deployed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidatePosition {
    pub id: SiteId,
    pub position: Position,
}

impl CandidatePosition {
    pub fn new(id: SiteId, position: Position) -> Self {
        Self { id, position }
    }
}
