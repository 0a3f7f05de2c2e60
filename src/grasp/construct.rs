//! Greedy randomized coverage construction.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::trace;

use crate::error::{PlacementError, Result};
use crate::model::{DeviceId, SiteId};
use crate::problem::Problem;

/// Builds a site cover: a list of opened sites with the devices each one
/// serves, covering every device exactly once.
///
/// Devices are offered in ascending priority, where a device's priority
/// is the summed coverage size of the sites that reach it. Each round
/// draws a site from the restricted candidate list (remaining coverage
/// above `floor(rcl_alpha * best)`, never empty), fills it while every
/// slice stays within `capacity_alpha` of its max datarate at spreading
/// factor `sf`, and removes the served devices from all remaining sites.
///
/// # Errors
///
/// [`PlacementError::UnassignedDevice`] when the sites run out, or no
/// remaining site reaches an uncovered device.
pub fn greedy_randomized_cover<R: Rng + ?Sized>(
    problem: &Problem,
    rcl_alpha: f64,
    capacity_alpha: f64,
    sf: u8,
    rng: &mut R,
) -> Result<Vec<(SiteId, Vec<DeviceId>)>> {
    let mut coverage: Vec<Vec<DeviceId>> = (0..problem.num_sites())
        .map(|site| problem.coverage(site).to_vec())
        .collect();

    let mut priority = vec![0usize; problem.num_devices()];
    for devices in &coverage {
        for &device in devices {
            priority[device] += devices.len();
        }
    }

    let mut uncovered: Vec<DeviceId> = (0..problem.num_devices()).collect();
    uncovered.sort_by_key(|&d| priority[d]);

    let mut remaining: Vec<SiteId> = (0..problem.num_sites()).collect();
    let mut cover = Vec::new();

    while let Some(&first) = uncovered.first() {
        remaining.sort_by_key(|&s| std::cmp::Reverse(coverage[s].len()));
        let best = match remaining.first() {
            Some(&site) if !coverage[site].is_empty() => coverage[site].len(),
            _ => return Err(PlacementError::UnassignedDevice { device: first }),
        };

        let threshold = (best as f64 * rcl_alpha).floor() as usize;
        let size = remaining
            .iter()
            .take_while(|&&s| coverage[s].len() > threshold)
            .count()
            .max(1);
        let &site = remaining[..size]
            .choose(rng)
            .ok_or(PlacementError::UnassignedDevice { device: first })?;

        let mut used = vec![0.0f64; problem.num_slices()];
        let mut served = Vec::new();
        for &device in &uncovered {
            if coverage[site].binary_search(&device).is_err() {
                continue;
            }
            let slice = problem.slice_of(device);
            let rate = problem.gateway().datarate(sf, slice);
            if used[slice] + rate > problem.max_datarate(slice) * capacity_alpha {
                continue;
            }
            used[slice] += rate;
            served.push(device);
        }
        trace!(site, served = served.len(), rcl = size, "site opened");

        remaining.retain(|&s| s != site);
        if served.is_empty() {
            continue;
        }
        uncovered.retain(|d| !served.contains(d));
        for &s in &remaining {
            coverage[s].retain(|d| !served.contains(d));
        }
        cover.push((site, served));
    }

    Ok(cover)
}
