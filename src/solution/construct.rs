//! Solution constructions.
//!
//! Every constructor assigns all devices and then repairs capacity, so the
//! result is either a feasible solution or an error.

use std::collections::BTreeSet;

use rand::seq::IndexedRandom;
use rand::Rng;

use super::state::Solution;
use super::types::Assignment;
use crate::error::{PlacementError, Result};
use crate::model::{config_id, DeviceId, SiteId, MIN_TP};
use crate::problem::Problem;

/// Uniformly random site among `sites`, then a uniformly random feasible
/// configuration on it.
fn random_on<R: Rng + ?Sized>(
    problem: &Problem,
    device: DeviceId,
    sites: &[SiteId],
    rng: &mut R,
) -> Result<Assignment> {
    let &site = sites
        .choose(rng)
        .ok_or(PlacementError::NoSiteAvailable { device })?;
    let &config = problem
        .feasible_configs(device, site)
        .choose(rng)
        .ok_or(PlacementError::NoSiteAvailable { device })?;
    Ok(Assignment::new(site, config))
}

/// First feasible configuration of `device` at `site` using spreading
/// factor `sf`, or a random feasible one when `sf` is not available there.
pub(crate) fn config_for_sf<R: Rng + ?Sized>(
    problem: &Problem,
    device: DeviceId,
    site: SiteId,
    sf: u8,
    rng: &mut R,
) -> Result<Assignment> {
    let configs = problem.feasible_configs(device, site);
    let config = configs
        .iter()
        .copied()
        .find(|&c| problem.configuration(c).sf == sf)
        .or_else(|| configs.choose(rng).copied())
        .ok_or(PlacementError::InfeasibleAssignment {
            device,
            site,
            config: config_id(sf, MIN_TP),
        })?;
    Ok(Assignment::new(site, config))
}

impl<'p> Solution<'p> {
    /// Uniformly random feasible (site, configuration) for every device,
    /// followed by capacity repair.
    pub fn random<R: Rng + ?Sized>(problem: &'p Problem, rng: &mut R) -> Result<Self> {
        let mut solution = Self::empty(problem);
        for device in 0..problem.num_devices() {
            let a = random_on(problem, device, problem.feasible_sites(device), rng)?;
            solution.update_association(device, a);
        }
        solution.fix_capacity(rng)?;
        Ok(solution)
    }

    /// Random construction that steers away from `tabu` sites.
    ///
    /// Devices are assigned in id order. Once the fraction of `tabu` sites
    /// already opened reaches `ratio`, a device may only go to a non-tabu
    /// site or a tabu site that is already open (any feasible site if that
    /// leaves nothing).
    pub fn random_avoiding<R: Rng + ?Sized>(
        problem: &'p Problem,
        tabu: &BTreeSet<SiteId>,
        ratio: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let mut solution = Self::empty(problem);
        let mut used_tabu = 0usize;

        for device in 0..problem.num_devices() {
            let feasible = problem.feasible_sites(device);
            let restrict = !tabu.is_empty() && used_tabu as f64 / tabu.len() as f64 >= ratio;
            let candidates: Vec<SiteId> = if restrict {
                feasible
                    .iter()
                    .copied()
                    .filter(|s| !tabu.contains(s) || solution.is_deployed(*s))
                    .collect()
            } else {
                feasible.to_vec()
            };
            let sites = if candidates.is_empty() {
                feasible
            } else {
                &candidates[..]
            };

            let a = random_on(problem, device, sites, rng)?;
            if tabu.contains(&a.site) && !solution.is_deployed(a.site) {
                used_tabu += 1;
            }
            solution.update_association(device, a);
        }
        solution.fix_capacity(rng)?;
        Ok(solution)
    }

    /// Builds a solution from an ordered site cover: every device listed
    /// under a site is assigned there with the first feasible configuration
    /// using `sf`.
    ///
    /// # Errors
    ///
    /// [`PlacementError::UnassignedDevice`] if the cover misses a device,
    /// [`PlacementError::InfeasibleAssignment`] if it lists a device under a
    /// site that cannot serve it.
    pub fn from_coverage<R: Rng + ?Sized>(
        problem: &'p Problem,
        cover: &[(SiteId, Vec<DeviceId>)],
        sf: u8,
        rng: &mut R,
    ) -> Result<Self> {
        let mut solution = Self::empty(problem);
        for (site, devices) in cover {
            for &device in devices {
                let a = config_for_sf(problem, device, *site, sf, rng)?;
                solution.update_association(device, a);
            }
        }
        if let Some(device) = solution.assignment.iter().position(Option::is_none) {
            return Err(PlacementError::UnassignedDevice { device });
        }
        solution.fix_capacity(rng)?;
        Ok(solution)
    }

    /// Decodes a deployed-site set into a full solution.
    ///
    /// Devices are placed in ascending order of how many of `sites` can
    /// serve them with spreading factor `sf`. Each goes to the supporting
    /// site with the fewest devices so far that still has room for an
    /// `sf` load on its slice. A device with no such site opens the
    /// undeployed site of largest coverage that reaches it.
    ///
    /// # Errors
    ///
    /// [`PlacementError::NoSiteAvailable`] if a device can neither be placed
    /// nor open a new site.
    pub fn from_deployed_sites<R: Rng + ?Sized>(
        problem: &'p Problem,
        sites: &[SiteId],
        sf: u8,
        rng: &mut R,
    ) -> Result<Self> {
        let mut open: Vec<SiteId> = Vec::with_capacity(sites.len());
        for &site in sites {
            if site < problem.num_sites() && !open.contains(&site) {
                open.push(site);
            }
        }

        let support = |device: DeviceId, open: &[SiteId]| -> Vec<SiteId> {
            open.iter()
                .copied()
                .filter(|&s| problem.supports_sf(device, s, sf))
                .collect()
        };

        let mut order: Vec<DeviceId> = (0..problem.num_devices()).collect();
        order.sort_by_cached_key(|&d| support(d, &open).len());

        // Opening order: largest coverage first, ties by id.
        let mut by_coverage: Vec<SiteId> = (0..problem.num_sites()).collect();
        by_coverage.sort_by_key(|&s| std::cmp::Reverse(problem.coverage(s).len()));

        let mut solution = Self::empty(problem);
        let mut count = vec![0usize; problem.num_sites()];

        for device in order {
            let slice = problem.slice_of(device);
            let rate = problem.gateway().datarate(sf, slice);
            let max = problem.max_datarate(slice);

            let mut selected: Option<SiteId> = None;
            for site in support(device, &open) {
                if solution.load(site, slice) + rate > max {
                    continue;
                }
                if selected.map_or(true, |best| count[site] < count[best]) {
                    selected = Some(site);
                }
            }

            let site = match selected {
                Some(site) => site,
                None => {
                    let site = by_coverage
                        .iter()
                        .copied()
                        .find(|s| {
                            !open.contains(s)
                                && problem.feasible_sites(device).binary_search(s).is_ok()
                        })
                        .ok_or(PlacementError::NoSiteAvailable { device })?;
                    open.push(site);
                    site
                }
            };

            let a = config_for_sf(problem, device, site, sf, rng)?;
            solution.update_association(device, a);
            count[site] += 1;
        }

        solution.fix_capacity(rng)?;
        Ok(solution)
    }
}
