//! Capacity repair.
//!
//! An overloaded (site, slice) is relieved by moving randomly chosen
//! devices on that slice along their plain site ring until a site with
//! room for them is found. Randomization makes repeated repairs explore
//! different paths.

use rand::Rng;
use tracing::trace;

use super::state::Solution;
use super::types::Assignment;
use crate::error::{PlacementError, Result};
use crate::model::{SiteId, SliceId};
use crate::neighbor::{carry_config, step_sorted, Direction};

impl Solution<'_> {
    /// Relieves every overloaded (site, slice) pair.
    ///
    /// # Errors
    ///
    /// [`PlacementError::CapacityExhausted`] if some pair cannot be relieved.
    /// The solution is then partially repaired and must be discarded.
    pub fn fix_capacity<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        for site in 0..self.problem.num_sites() {
            for slice in 0..self.problem.num_slices() {
                if self.is_overloaded(site, slice) {
                    self.unload(site, slice, rng)?;
                }
            }
        }
        Ok(())
    }

    /// Moves devices off `(site, slice)` until its load fits.
    ///
    /// Each candidate device is drawn at random without replacement. It
    /// walks its feasible sites cyclically from `site` and moves to the
    /// first one that can take its (carried) configuration without going
    /// over capacity.
    pub fn unload<R: Rng + ?Sized>(
        &mut self,
        site: SiteId,
        slice: SliceId,
        rng: &mut R,
    ) -> Result<()> {
        let problem = self.problem;
        let max = problem.max_datarate(slice);
        let mut pool: Vec<_> = self.devices_at[site]
            .iter()
            .copied()
            .filter(|&d| problem.slice_of(d) == slice)
            .collect();

        while self.load(site, slice) > max {
            if pool.is_empty() {
                return Err(PlacementError::CapacityExhausted { site, slice });
            }
            let device = pool.swap_remove(rng.random_range(0..pool.len()));
            let Some(current) = self.assignment[device] else {
                continue;
            };

            let ring = problem.feasible_sites(device);
            let mut candidate = site;
            while let Some(next) = step_sorted(ring, candidate, Direction::Forward) {
                if next == site {
                    break;
                }
                candidate = next;
                let Some(config) = carry_config(problem, device, next, current.config) else {
                    continue;
                };
                if self.load(next, slice) + problem.datarate(config, slice) <= max {
                    trace!(device, from = site, to = next, slice, "capacity repair move");
                    self.update_association(device, Assignment::new(next, config));
                    break;
                }
            }
        }
        Ok(())
    }
}
