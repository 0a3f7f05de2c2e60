//! Cyclic stepping over site and configuration lists.
//!
//! Feasible configuration lists and plain site lists are sorted, so
//! stepping uses binary search and also works from an id that is not in
//! the list. Tabu-aware site lists are ordered (non-tabu sites first), so
//! they are stepped by position.

use std::collections::BTreeSet;

use crate::model::{ConfigId, DeviceId, SiteId};
use crate::problem::Problem;
use crate::solution::{Assignment, Solution};

/// Stepping direction along a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn random<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

/// Steps from `current` along a sorted ring, wrapping at both ends.
///
/// When `current` is absent, `Forward` lands on the smallest element
/// greater than it and `Backward` on the largest element smaller than it.
/// Returns `None` for an empty ring.
///
/// # Examples
///
/// ```
/// use u_placement::neighbor::{step_sorted, Direction};
///
/// let ring = [2, 5, 9];
/// assert_eq!(step_sorted(&ring, 5, Direction::Forward), Some(9));
/// assert_eq!(step_sorted(&ring, 9, Direction::Forward), Some(2));
/// assert_eq!(step_sorted(&ring, 2, Direction::Backward), Some(9));
/// assert_eq!(step_sorted(&ring, 6, Direction::Forward), Some(9));
/// assert_eq!(step_sorted(&ring, 6, Direction::Backward), Some(5));
/// ```
pub fn step_sorted<T: Ord + Copy>(ring: &[T], current: T, direction: Direction) -> Option<T> {
    if ring.is_empty() {
        return None;
    }
    let n = ring.len();
    let index = match (ring.binary_search(&current), direction) {
        (Ok(i), Direction::Forward) => (i + 1) % n,
        (Err(i), Direction::Forward) => i % n,
        (Ok(i) | Err(i), Direction::Backward) => (i + n - 1) % n,
    };
    Some(ring[index])
}

/// Steps from `current` along an ordered ring by position. An absent
/// `current` starts from the front.
pub fn step_ordered<T: PartialEq + Copy>(
    ring: &[T],
    current: T,
    direction: Direction,
) -> Option<T> {
    if ring.is_empty() {
        return None;
    }
    let n = ring.len();
    let Some(i) = ring.iter().position(|&x| x == current) else {
        return Some(ring[0]);
    };
    let index = match direction {
        Direction::Forward => (i + 1) % n,
        Direction::Backward => (i + n - 1) % n,
    };
    Some(ring[index])
}

/// The configuration `device` keeps when it moves to `site`: the same id if
/// it is feasible there, otherwise the next feasible id after it.
pub fn carry_config(
    problem: &Problem,
    device: DeviceId,
    site: SiteId,
    config: ConfigId,
) -> Option<ConfigId> {
    let configs = problem.feasible_configs(device, site);
    if configs.binary_search(&config).is_ok() {
        Some(config)
    } else {
        step_sorted(configs, config, Direction::Forward)
    }
}

/// Config-axis step: neighbor configuration on the same site.
pub fn config_step(
    problem: &Problem,
    device: DeviceId,
    current: Assignment,
    direction: Direction,
) -> Option<Assignment> {
    let configs = problem.feasible_configs(device, current.site);
    step_sorted(configs, current.config, direction).map(|c| Assignment::new(current.site, c))
}

/// Site-axis step along `ring`, carrying the configuration across.
pub fn site_step(
    problem: &Problem,
    device: DeviceId,
    current: Assignment,
    ring: &SiteRing,
    direction: Direction,
) -> Option<Assignment> {
    let site = ring.step(current.site, direction)?;
    let config = carry_config(problem, device, site, current.config)?;
    Some(Assignment::new(site, config))
}

/// Which candidate sites a site-axis move may visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteRingKind {
    /// Every feasible site of the device.
    Plain,
    /// Feasible sites that are already deployed.
    Deployed,
    /// The current site plus feasible sites that are not deployed.
    NewSite,
}

/// A site ring built for one device in one solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteRing {
    Sorted(Vec<SiteId>),
    /// Non-tabu sites first, then (optionally) tabu sites.
    Ordered(Vec<SiteId>),
}

impl SiteRing {
    /// Builds the ring for `device`, currently on `current`.
    pub fn build(
        solution: &Solution<'_>,
        device: DeviceId,
        current: SiteId,
        kind: SiteRingKind,
    ) -> Self {
        let feasible = solution.problem().feasible_sites(device);
        let sites = match kind {
            SiteRingKind::Plain => feasible.to_vec(),
            SiteRingKind::Deployed => feasible
                .iter()
                .copied()
                .filter(|&s| solution.is_deployed(s))
                .collect(),
            SiteRingKind::NewSite => feasible
                .iter()
                .copied()
                .filter(|&s| s == current || !solution.is_deployed(s))
                .collect(),
        };
        SiteRing::Sorted(sites)
    }

    /// Builds the ring for `device` and filters it against the long-term
    /// tabu sites.
    ///
    /// Tabu sites other than `current` are dropped, unless `permit_tabu` is
    /// set, in which case they follow the non-tabu sites. If filtering
    /// leaves only `current`, the unfiltered ring is used.
    pub fn build_tabu_aware(
        solution: &Solution<'_>,
        device: DeviceId,
        current: SiteId,
        kind: SiteRingKind,
        tabu: &BTreeSet<SiteId>,
        permit_tabu: bool,
    ) -> Self {
        let base = match Self::build(solution, device, current, kind) {
            SiteRing::Sorted(sites) | SiteRing::Ordered(sites) => sites,
        };
        if tabu.is_empty() {
            return SiteRing::Sorted(base);
        }
        let (mut open, banned): (Vec<SiteId>, Vec<SiteId>) = base
            .iter()
            .copied()
            .partition(|&s| s == current || !tabu.contains(&s));
        if permit_tabu {
            open.extend(banned);
        }
        if open.len() <= 1 {
            SiteRing::Sorted(base)
        } else {
            SiteRing::Ordered(open)
        }
    }

    pub fn step(&self, current: SiteId, direction: Direction) -> Option<SiteId> {
        match self {
            SiteRing::Sorted(sites) => step_sorted(sites, current, direction),
            SiteRing::Ordered(sites) => step_ordered(sites, current, direction),
        }
    }

    pub fn sites(&self) -> &[SiteId] {
        match self {
            SiteRing::Sorted(sites) | SiteRing::Ordered(sites) => sites,
        }
    }
}
