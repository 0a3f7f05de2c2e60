//! GRASP multi-start loop.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{info, warn};

use super::config::GraspConfig;
use super::construct::greedy_randomized_cover;
use crate::error::{PlacementError, Result};
use crate::problem::Problem;
use crate::progress::{ProgressLog, GRASP_HEADER};
use crate::random::rng_from_seed;
use crate::solution::Solution;
use crate::tabu::TabuRunner;

/// Result of a GRASP run.
#[derive(Debug, Clone)]
pub struct GraspResult<'p> {
    pub best: Solution<'p>,
    pub best_cost: f64,
    /// Cost of the constructed solution `best` was refined from.
    pub constructed_cost: f64,
    /// Restart that produced `best`.
    pub best_restart: usize,
    pub best_time: Duration,
    /// Restarts whose construction failed and were skipped.
    pub failed_restarts: usize,
    /// Best cost after each completed restart.
    pub cost_history: Vec<f64>,
    /// One row per completed restart, see [`GRASP_HEADER`].
    pub log: ProgressLog,
}

/// GRASP runner.
pub struct GraspRunner;

impl GraspRunner {
    /// Runs `config.restarts` rounds of construction followed by tabu
    /// search and keeps the cheapest refined solution.
    ///
    /// # Errors
    ///
    /// The last construction error when every restart failed.
    #[tracing::instrument(
        skip_all,
        name = "grasp",
        fields(devices = problem.num_devices(), sites = problem.num_sites())
    )]
    pub fn run<'p>(problem: &'p Problem, config: &GraspConfig) -> Result<GraspResult<'p>> {
        config.validate().map_err(PlacementError::InvalidConfig)?;
        let start = Instant::now();
        let mut rng = rng_from_seed(config.seed);

        // (solution, refined cost, constructed cost)
        let mut best: Option<(Solution<'p>, f64, f64)> = None;
        let mut best_restart = 0;
        let mut best_time = Duration::ZERO;
        let mut failed_restarts = 0;
        let mut last_error = None;
        let mut cost_history = Vec::with_capacity(config.restarts);
        let mut log = ProgressLog::new(GRASP_HEADER);

        for restart in 0..config.restarts {
            let constructed = match Self::construct(problem, config, &mut rng) {
                Ok(solution) => solution,
                Err(e) => {
                    warn!(restart, error = %e, "construction failed, skipping restart");
                    failed_restarts += 1;
                    last_error = Some(e);
                    continue;
                }
            };
            let constructed_cost = constructed.cost();

            let refined = match TabuRunner::run_from(
                &config.local_search,
                constructed.clone(),
                &mut rng,
            ) {
                Ok(result) => result.best,
                Err(e) => {
                    warn!(restart, error = %e, "local search failed, keeping construction");
                    constructed
                }
            };
            let refined_cost = refined.cost();

            if best.as_ref().is_none_or(|(_, cost, _)| refined_cost < *cost) {
                best_restart = restart;
                best_time = start.elapsed();
                info!(restart, constructed_cost, refined_cost, "new best");
                best = Some((refined, refined_cost, constructed_cost));
            }

            let best_cost = best.as_ref().map_or(refined_cost, |(_, cost, _)| *cost);
            cost_history.push(best_cost);
            log.push(format_args!(
                "{},{:.6},{:.6},{:.6},{:.6}",
                restart,
                constructed_cost,
                refined_cost,
                best_cost,
                start.elapsed().as_secs_f64()
            ));
        }

        let (best, best_cost, constructed_cost) = best.ok_or_else(|| {
            last_error.unwrap_or_else(|| PlacementError::InvalidConfig("no restart ran".into()))
        })?;
        info!(best_cost, failed_restarts, "grasp finished");

        Ok(GraspResult {
            best,
            best_cost,
            constructed_cost,
            best_restart,
            best_time,
            failed_restarts,
            cost_history,
            log,
        })
    }

    /// One greedy randomized construction: a site cover from
    /// [`greedy_randomized_cover`], assigned at `config.default_sf` and
    /// capacity-repaired.
    pub fn construct<'p, R: Rng + ?Sized>(
        problem: &'p Problem,
        config: &GraspConfig,
        rng: &mut R,
    ) -> Result<Solution<'p>> {
        let cover = greedy_randomized_cover(
            problem,
            config.rcl_alpha,
            config.capacity_alpha,
            config.default_sf,
            rng,
        )?;
        Solution::from_coverage(problem, &cover, config.default_sf, rng)
    }
}
