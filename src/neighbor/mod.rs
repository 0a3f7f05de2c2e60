//! Neighbor operators.
//!
//! A single move changes one device along one axis:
//!
//! - **config axis**: step through the sorted feasible configurations of the
//!   device at its current site
//! - **site axis**: step through a ring of candidate sites, carrying the
//!   configuration over (or advancing it to the next feasible one)
//!
//! The site ring is either every feasible site ([`SiteRingKind::Plain`]) or,
//! for site-aware generation, deployed sites
//! ([`SiteRingKind::Deployed`]) with probability `1 - new_site_probability`
//! and undeployed ones ([`SiteRingKind::NewSite`]) otherwise. Long-term
//! tabu sites filter either variant.
//!
//! Every neighbor is a fresh clone of its parent, capacity-repaired, with
//! its generating [`Move`](crate::solution::Move) recorded.

mod generator;
mod ring;

pub use generator::{NeighborGenerator, MAX_ATTEMPTS};
pub use ring::{
    carry_config, config_step, site_step, step_ordered, step_sorted, Direction, SiteRing,
    SiteRingKind,
};
