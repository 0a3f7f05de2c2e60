//! Tabu Search execution engine.
//!
//! # Algorithm
//!
//! 1. Start from a random (or caller-supplied) solution
//! 2. Intensify:
//!    a. Sample `batch_size` neighbors of the current solution
//!    b. Walk the candidates by ascending cost tier; take a random non-tabu
//!       candidate from the first tier that has one, or a random tabu one
//!       whose cost satisfies aspiration
//!    c. Accept it if it is not worse than the current solution; record its
//!       `(device, axis)` in the tabu list unless the move was tabu
//!    d. Track the global best and the phase elite
//! 3. Diversify once the elite stops improving, then intensify again
//! 4. Stop on the iteration cap, the time limit, or cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use super::config::TabuConfig;
use super::types::{Phase, SiteMemory, TabuList};
use crate::error::{PlacementError, Result};
use crate::neighbor::NeighborGenerator;
use crate::problem::Problem;
use crate::progress::{ProgressLog, TABU_HEADER};
use crate::random::rng_from_seed;
use crate::solution::Solution;

/// Walk length bounds of a random-walk diversification.
const RANDOM_WALK: (usize, usize) = (50, 250);

const COST_EPS: f64 = 1e-9;

/// Result of a Tabu Search run.
#[derive(Debug, Clone)]
pub struct TabuResult<'p> {
    /// Best solution found.
    pub best: Solution<'p>,
    /// Cost of the best solution.
    pub best_cost: f64,
    /// Total iterations executed.
    pub iterations: usize,
    /// Iteration at which the best solution was found.
    pub best_iteration: usize,
    /// Elapsed time when the best solution was found.
    pub best_time: Duration,
    /// Iteration at which each intensification phase started.
    pub phase_starts: Vec<usize>,
    /// Long-term site memory at the end of the run.
    pub tabu_sites: SiteMemory,
    /// Whether cancelled externally.
    pub cancelled: bool,
    /// Cost history (best cost at each iteration).
    pub cost_history: Vec<f64>,
    /// One row per iteration, see [`TABU_HEADER`].
    pub log: ProgressLog,
}

/// Tabu Search runner.
pub struct TabuRunner;

impl TabuRunner {
    /// Runs Tabu Search from a random initial solution.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use u_placement::model::{CandidatePosition, Device, GatewayProfile, Position};
    /// use u_placement::problem::{Problem, ProblemConfig};
    /// use u_placement::tabu::{TabuConfig, TabuRunner};
    ///
    /// # fn main() -> u_placement::Result<()> {
    /// let devices = vec![Device::new(0, Position::new(10.0, 0.0, 0.0), 0)];
    /// let sites = vec![CandidatePosition::new(0, Position::new(0.0, 0.0, 30.0))];
    /// let gateway = GatewayProfile::reference(1);
    /// let problem = Problem::new(ProblemConfig::default(), devices, sites, gateway)?;
    ///
    /// let result = TabuRunner::run(&problem, &TabuConfig::default().with_seed(7))?;
    /// print!("{}", result.best.deployed_sites_report());
    /// # Ok(())
    /// # }
    /// ```
    pub fn run<'p>(problem: &'p Problem, config: &TabuConfig) -> Result<TabuResult<'p>> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs Tabu Search with an optional cancellation token, checked once
    /// per iteration.
    #[tracing::instrument(
        skip_all,
        name = "tabu",
        fields(devices = problem.num_devices(), sites = problem.num_sites())
    )]
    pub fn run_with_cancel<'p>(
        problem: &'p Problem,
        config: &TabuConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<TabuResult<'p>> {
        config.validate().map_err(PlacementError::InvalidConfig)?;
        let mut rng = rng_from_seed(config.seed);
        let initial = Solution::random(problem, &mut rng)?;
        Self::search(config, initial, &mut rng, cancel.as_deref())
    }

    /// Runs Tabu Search from `initial`, drawing randomness from `rng`.
    /// `config.seed` is ignored.
    pub fn run_from<'p, R: Rng + ?Sized>(
        config: &TabuConfig,
        initial: Solution<'p>,
        rng: &mut R,
    ) -> Result<TabuResult<'p>> {
        config.validate().map_err(PlacementError::InvalidConfig)?;
        Self::search(config, initial, rng, None)
    }

    fn search<'p, R: Rng + ?Sized>(
        config: &TabuConfig,
        initial: Solution<'p>,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<TabuResult<'p>> {
        let problem = initial.problem();
        let start = Instant::now();
        let stopped = |start: &Instant| {
            cancel.is_some_and(|c| c.load(Ordering::Relaxed))
                || config.time_limit.is_some_and(|limit| start.elapsed() >= limit)
        };

        let mut current = initial;
        let mut best = current.clone();
        let mut best_cost = best.cost();
        let mut best_iteration = 0;
        let mut best_time = Duration::ZERO;

        let mut tabu_list = TabuList::new(config.tabu_list_size);
        let mut site_memory = SiteMemory::default();
        let mut log = ProgressLog::new(TABU_HEADER);
        let mut cost_history = Vec::new();
        let mut phase_starts = Vec::new();
        let mut iteration = 0usize;
        let mut phase = Phase::Intensify;

        info!(initial_cost = best_cost, "tabu search started");

        while iteration < config.max_iterations && !stopped(&start) {
            match phase {
                Phase::Intensify => {
                    phase_starts.push(iteration);
                    debug!(iteration, cost = current.cost(), "intensification");

                    let mut elite = current.clone();
                    let mut elite_cost = elite.cost();
                    let mut without_improvement = 0usize;

                    while iteration < config.max_iterations {
                        without_improvement += 1;

                        let base = if config.site_aware_neighbors {
                            NeighborGenerator::site_aware()
                        } else {
                            NeighborGenerator::plain()
                        };
                        let generator = if config.tabu_aware_neighbors {
                            base.with_tabu_sites(site_memory.sites(), config.tabu_site_ratio)
                        } else {
                            base
                        };
                        let candidates = generator.batch(&current, config.batch_size, rng)?;

                        let current_cost = current.cost();
                        let chosen =
                            select(candidates, &tabu_list, config.aspiration, best_cost, rng)
                                .filter(|(next, _)| next.cost() <= current_cost + COST_EPS);
                        let elapsed = start.elapsed();

                        match chosen {
                            Some((next, is_tabu)) => {
                                let next_cost = next.cost();
                                log.push(format_args!(
                                    "{},{:.6},{:.6},{},{:.6},{:.6}",
                                    iteration,
                                    current_cost,
                                    next_cost,
                                    is_tabu,
                                    best_cost,
                                    elapsed.as_secs_f64()
                                ));
                                if !is_tabu {
                                    if let Some(mv) = next.generating_move() {
                                        tabu_list.push(mv.key());
                                    }
                                }
                                current = next;

                                if next_cost < best_cost - COST_EPS {
                                    best = current.clone();
                                    best_cost = next_cost;
                                    best_iteration = iteration;
                                    best_time = elapsed;
                                    info!(iteration, best_cost, "new best");
                                }
                                if next_cost < elite_cost - COST_EPS {
                                    elite = current.clone();
                                    elite_cost = next_cost;
                                    without_improvement = 0;
                                }
                            }
                            None => {
                                log.push(format_args!(
                                    "{},{:.6},{:.6},{},{:.6},{:.6}",
                                    iteration,
                                    current_cost,
                                    -1.0,
                                    false,
                                    best_cost,
                                    elapsed.as_secs_f64()
                                ));
                            }
                        }

                        cost_history.push(best_cost);
                        iteration += 1;

                        if without_improvement > config.max_no_improve || stopped(&start) {
                            break;
                        }
                    }

                    site_memory.extend(elite.deployed_sites());
                    phase = Phase::Diversify;
                }
                Phase::Diversify => {
                    debug!(iteration, tabu_sites = site_memory.len(), "diversification");
                    let restart = if config.diversify_random {
                        best.random_walk(RANDOM_WALK.0, RANDOM_WALK.1, rng)
                    } else {
                        Solution::random_avoiding(
                            problem,
                            site_memory.sites(),
                            config.tabu_site_ratio,
                            rng,
                        )
                    };
                    match restart {
                        Ok(solution) => current = solution,
                        Err(e) => warn!(error = %e, "diversification discarded, keeping current"),
                    }
                    phase = Phase::Intensify;
                }
            }
        }

        let cancelled = cancel.is_some_and(|c| c.load(Ordering::Relaxed));
        info!(
            iterations = iteration,
            best_cost,
            best_iteration,
            phases = phase_starts.len(),
            "tabu search finished"
        );

        Ok(TabuResult {
            best,
            best_cost,
            iterations: iteration,
            best_iteration,
            best_time,
            phase_starts,
            tabu_sites: site_memory,
            cancelled,
            cost_history,
            log,
        })
    }
}

/// Picks the next solution from a batch, walking cost tiers in ascending
/// order. Returns the candidate and whether its move was tabu.
fn select<'p, R: Rng + ?Sized>(
    mut candidates: Vec<Solution<'p>>,
    tabu_list: &TabuList,
    aspiration: bool,
    best_cost: f64,
    rng: &mut R,
) -> Option<(Solution<'p>, bool)> {
    candidates.sort_by(|a, b| a.cost().total_cmp(&b.cost()));

    let mut tier_start = 0;
    while tier_start < candidates.len() {
        let tier_cost = candidates[tier_start].cost();
        let tier_end = candidates[tier_start..]
            .iter()
            .position(|c| c.cost() > tier_cost + COST_EPS)
            .map_or(candidates.len(), |offset| tier_start + offset);

        let (tabu, free): (Vec<usize>, Vec<usize>) = (tier_start..tier_end)
            .partition(|&i| tabu_list.forbids(candidates[i].generating_move()));

        if let Some(&i) = free.choose(rng) {
            return Some((candidates.swap_remove(i), false));
        }
        if aspiration && tier_cost <= best_cost + COST_EPS {
            if let Some(&i) = tabu.choose(rng) {
                return Some((candidates.swap_remove(i), true));
            }
        }
        tier_start = tier_end;
    }
    None
}
