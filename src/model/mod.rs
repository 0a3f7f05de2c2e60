//! Input data model: positions, devices, candidate sites, radio
//! configurations, and the gateway radio profile.
//!
//! All of these are immutable once loaded. Identifiers are dense indices
//! assigned by the loader, so every table in [`Problem`](crate::problem::Problem)
//! and [`Solution`](crate::solution::Solution) is a plain `Vec` indexed by id.

mod device;
mod gateway;
mod position;
mod radio;

pub use device::{CandidatePosition, Device};
pub use gateway::{GatewayProfile, SliceProfile};
pub use position::Position;
pub use radio::{
    config_id, ConfigCatalogue, Configuration, MAX_SF, MAX_TP, MIN_SF, MIN_TP, NUM_CONFIGS,
    NUM_SF, STEP_TP,
};

/// Dense device identifier.
pub type DeviceId = usize;

/// Dense candidate-site identifier.
pub type SiteId = usize;

/// Traffic-class (slice) identifier.
pub type SliceId = usize;

/// Dense configuration identifier, see [`config_id`].
pub type ConfigId = usize;
