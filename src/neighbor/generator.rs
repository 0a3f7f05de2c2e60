//! Single, batch, and chained neighbor generation.

use std::collections::BTreeSet;

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use super::ring::{config_step, site_step, Direction, SiteRing, SiteRingKind};
use crate::error::{PlacementError, Result};
use crate::model::{DeviceId, SiteId};
use crate::solution::{Axis, Move, Solution};

/// Attempts a single move gets before giving up with
/// [`PlacementError::NoMoveFound`].
pub const MAX_ATTEMPTS: usize = 50;

/// Probability of drawing the moved device among those on tabu sites, once
/// the deployed tabu fraction exceeds the configured ratio.
const TABU_DEVICE_BIAS: f64 = 0.75;

/// Neighbor generator parameterized by ring strategy and long-term memory.
///
/// # Examples
///
/// ```no_run
/// use std::collections::BTreeSet;
/// use u_placement::neighbor::NeighborGenerator;
/// # fn demo(solution: &u_placement::solution::Solution<'_>) -> u_placement::Result<()> {
/// let tabu: BTreeSet<usize> = [3, 7].into_iter().collect();
/// let generator = NeighborGenerator::site_aware().with_tabu_sites(&tabu, 0.25);
/// let mut rng = u_placement::random::create_rng(1);
/// let batch = generator.batch(solution, 20, &mut rng)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NeighborGenerator<'t> {
    site_aware: bool,
    tabu: Option<(&'t BTreeSet<SiteId>, f64)>,
}

impl Default for NeighborGenerator<'_> {
    fn default() -> Self {
        Self::site_aware()
    }
}

impl<'t> NeighborGenerator<'t> {
    /// Site moves walk every feasible site.
    pub fn plain() -> Self {
        Self {
            site_aware: false,
            tabu: None,
        }
    }

    /// Site moves prefer deployed sites and open new ones with the
    /// problem's `new_site_probability`.
    pub fn site_aware() -> Self {
        Self {
            site_aware: true,
            tabu: None,
        }
    }

    /// Filters site rings against `tabu`. Tabu sites become eligible again
    /// once more than `ratio` of the deployed sites are tabu.
    pub fn with_tabu_sites(mut self, tabu: &'t BTreeSet<SiteId>, ratio: f64) -> Self {
        self.tabu = Some((tabu, ratio));
        self
    }

    /// One neighbor of `solution`, differing in a single device move
    /// (plus whatever capacity repair had to move).
    ///
    /// # Errors
    ///
    /// - [`PlacementError::NoMoveFound`] after [`MAX_ATTEMPTS`] no-op draws
    /// - [`PlacementError::CapacityExhausted`] if the moved solution cannot be repaired
    pub fn single<'p, R: Rng + ?Sized>(
        &self,
        solution: &Solution<'p>,
        rng: &mut R,
    ) -> Result<Solution<'p>> {
        let problem = solution.problem();
        let config = problem.config();
        let num_devices = problem.num_devices();
        if num_devices == 0 {
            return Err(PlacementError::NoMoveFound { attempts: 0 });
        }

        let tabu = self.tabu.filter(|(sites, _)| !sites.is_empty());
        let permit_tabu = tabu.is_some_and(|(sites, ratio)| solution.tabu_ratio(sites) > ratio);
        let tabu_devices: Vec<DeviceId> = match tabu {
            Some((sites, _)) if permit_tabu => sites
                .iter()
                .flat_map(|&s| solution.devices_at(s).iter().copied())
                .collect(),
            _ => Vec::new(),
        };

        for _ in 0..MAX_ATTEMPTS {
            let mut device = rng.random_range(0..num_devices);
            if !tabu_devices.is_empty() && rng.random_bool(TABU_DEVICE_BIAS) {
                if let Some(&d) = tabu_devices.choose(rng) {
                    device = d;
                }
            }
            let Some(current) = solution.assignment(device) else {
                continue;
            };
            let direction = Direction::random(rng);

            let (axis, next) = if rng.random::<f64>() <= config.change_site_probability {
                let kind = if !self.site_aware {
                    SiteRingKind::Plain
                } else if rng.random::<f64>() < config.new_site_probability {
                    SiteRingKind::NewSite
                } else {
                    SiteRingKind::Deployed
                };
                let ring = match tabu {
                    Some((sites, _)) => SiteRing::build_tabu_aware(
                        solution,
                        device,
                        current.site,
                        kind,
                        sites,
                        permit_tabu,
                    ),
                    None => SiteRing::build(solution, device, current.site, kind),
                };
                (Axis::Site, site_step(problem, device, current, &ring, direction))
            } else {
                (Axis::Config, config_step(problem, device, current, direction))
            };

            let Some(next) = next else {
                continue;
            };
            let moved = match axis {
                Axis::Site => next.site != current.site,
                Axis::Config => next.config != current.config,
            };
            if !moved {
                continue;
            }

            let mut neighbor = solution.clone();
            neighbor.update_association(device, next);
            neighbor.fix_capacity(rng)?;
            neighbor.set_generating_move(Move {
                device,
                axis,
                previous: current,
                next,
            });
            return Ok(neighbor);
        }

        Err(PlacementError::NoMoveFound {
            attempts: MAX_ATTEMPTS,
        })
    }

    /// `size` independent single-move neighbors.
    ///
    /// Candidates whose capacity repair fails are dropped, so the batch may
    /// be shorter than `size`.
    ///
    /// # Errors
    ///
    /// [`PlacementError::NoMoveFound`] if any draw finds no move.
    pub fn batch<'p, R: Rng + ?Sized>(
        &self,
        solution: &Solution<'p>,
        size: usize,
        rng: &mut R,
    ) -> Result<Vec<Solution<'p>>> {
        let mut neighbors = Vec::with_capacity(size);
        for _ in 0..size {
            match self.single(solution, rng) {
                Ok(neighbor) => neighbors.push(neighbor),
                Err(e @ PlacementError::CapacityExhausted { .. }) => {
                    debug!(error = %e, "dropping unrepairable neighbor");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(neighbors)
    }

    /// A neighbor `d` single moves away, `d` drawn from `min..=max`. The
    /// recorded move is the last one applied.
    pub fn chained<'p, R: Rng + ?Sized>(
        &self,
        solution: &Solution<'p>,
        min: usize,
        max: usize,
        rng: &mut R,
    ) -> Result<Solution<'p>> {
        let distance = if min >= max {
            min
        } else {
            rng.random_range(min..=max)
        };
        let mut current = solution.clone();
        for _ in 0..distance {
            current = self.single(&current, rng)?;
        }
        Ok(current)
    }
}

impl<'p> Solution<'p> {
    /// Chained plain-ring moves, used for perturbation.
    pub fn random_walk<R: Rng + ?Sized>(
        &self,
        min: usize,
        max: usize,
        rng: &mut R,
    ) -> Result<Solution<'p>> {
        NeighborGenerator::plain().chained(self, min, max, rng)
    }
}
