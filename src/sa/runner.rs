//! SA execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use super::config::{CoolingSchedule, SaConfig};
use crate::error::{PlacementError, Result};
use crate::neighbor::NeighborGenerator;
use crate::problem::Problem;
use crate::progress::{ProgressLog, SA_HEADER};
use crate::random::rng_from_seed;
use crate::solution::Solution;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<'p> {
    /// The best solution found.
    pub best: Solution<'p>,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Total number of iterations (neighbor evaluations).
    pub iterations: usize,

    /// Iteration at which the best solution was found.
    pub best_iteration: usize,

    /// Elapsed time when the best solution was found.
    pub best_time: Duration,

    /// Final temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best cost sampled at regular intervals for history tracking.
    pub cost_history: Vec<f64>,

    /// One row per iteration, see [`SA_HEADER`].
    pub log: ProgressLog,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA from a random initial solution.
    pub fn run<'p>(problem: &'p Problem, config: &SaConfig) -> Result<SaResult<'p>> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs SA with an optional cancellation token, checked once per
    /// temperature step.
    #[tracing::instrument(
        skip_all,
        name = "sa",
        fields(devices = problem.num_devices(), sites = problem.num_sites())
    )]
    pub fn run_with_cancel<'p>(
        problem: &'p Problem,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult<'p>> {
        config.validate().map_err(PlacementError::InvalidConfig)?;
        let mut rng = rng_from_seed(config.seed);
        let initial = Solution::random(problem, &mut rng)?;
        Self::anneal(config, initial, &mut rng, cancel.as_deref())
    }

    /// Runs SA from `initial`, drawing randomness from `rng`.
    pub fn run_from<'p, R: Rng + ?Sized>(
        config: &SaConfig,
        initial: Solution<'p>,
        rng: &mut R,
    ) -> Result<SaResult<'p>> {
        config.validate().map_err(PlacementError::InvalidConfig)?;
        Self::anneal(config, initial, rng, None)
    }

    fn anneal<'p, R: Rng + ?Sized>(
        config: &SaConfig,
        initial: Solution<'p>,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<SaResult<'p>> {
        let start = Instant::now();
        let generator = if config.site_aware_neighbors {
            NeighborGenerator::site_aware()
        } else {
            NeighborGenerator::plain()
        };

        let mut current = initial;
        let mut current_cost = current.cost();
        let mut best = current.clone();
        let mut best_cost = current_cost;
        let mut best_iteration = 0;
        let mut best_time = Duration::ZERO;

        let mut temperature = config.initial_temperature;
        let mut total_iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;

        let linear_max_steps = compute_linear_steps(config);

        // Cost history: sample every N iterations
        let history_interval = 100.max(config.iterations_per_temperature);
        let mut cost_history = vec![best_cost];
        let mut log = ProgressLog::new(SA_HEADER);

        let mut step = 0usize;

        info!(initial_cost = current_cost, temperature, "annealing started");

        while temperature > config.min_temperature && total_iterations < config.max_iterations {
            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }
            if config.time_limit.is_some_and(|limit| start.elapsed() >= limit) {
                break;
            }

            let inner_iters = match config.cooling {
                CoolingSchedule::LundyMees { .. } => 1,
                _ => config.iterations_per_temperature,
            };

            for _ in 0..inner_iters {
                if total_iterations >= config.max_iterations {
                    break;
                }
                let iteration = total_iterations;
                total_iterations += 1;

                let neighbor = match generator.chained(
                    &current,
                    config.min_distance,
                    config.max_distance,
                    rng,
                ) {
                    Ok(neighbor) => neighbor,
                    Err(e @ PlacementError::CapacityExhausted { .. }) => {
                        debug!(error = %e, iteration, "neighbor discarded");
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                let neighbor_cost = neighbor.cost();
                let delta = neighbor_cost - current_cost;

                // Metropolis acceptance; -1 marks a non-worsening move.
                let d = if delta <= 0.0 {
                    -1.0
                } else {
                    (-delta / temperature).exp()
                };
                let elapsed = start.elapsed();
                log.push(format_args!(
                    "{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
                    iteration,
                    temperature,
                    d,
                    current_cost,
                    neighbor_cost,
                    best_cost,
                    elapsed.as_secs_f64()
                ));

                let accept = delta <= 0.0 || rng.random::<f64>() < d;
                if accept {
                    if delta < 0.0 {
                        improving_moves += 1;
                    }
                    accepted_moves += 1;
                    current = neighbor;
                    current_cost = neighbor_cost;

                    if current_cost < best_cost {
                        best = current.clone();
                        best_cost = current_cost;
                        best_iteration = iteration;
                        best_time = elapsed;
                        debug!(iteration, best_cost, temperature, "new best");
                    }
                }

                if total_iterations % history_interval == 0 {
                    cost_history.push(best_cost);
                }
            }

            temperature = cool(temperature, config, step, linear_max_steps);
            step += 1;
        }

        // Final history entry
        if cost_history
            .last()
            .is_none_or(|&last| (last - best_cost).abs() > 1e-15)
        {
            cost_history.push(best_cost);
        }

        info!(
            iterations = total_iterations,
            best_cost,
            final_temperature = temperature,
            accepted_moves,
            "annealing finished"
        );

        Ok(SaResult {
            best,
            best_cost,
            iterations: total_iterations,
            best_iteration,
            best_time,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            cancelled,
            cost_history,
            log,
        })
    }
}

/// Apply the cooling schedule to compute the next temperature.
fn cool(temperature: f64, config: &SaConfig, step: usize, linear_max_steps: usize) -> f64 {
    match config.cooling {
        CoolingSchedule::Geometric { alpha } => temperature * alpha,

        CoolingSchedule::Linear => {
            if linear_max_steps == 0 {
                config.min_temperature
            } else {
                let t = config.initial_temperature
                    - (step + 1) as f64 * (config.initial_temperature - config.min_temperature)
                        / linear_max_steps as f64;
                t.max(config.min_temperature)
            }
        }

        CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
    }
}

/// Number of temperature steps for linear cooling.
fn compute_linear_steps(config: &SaConfig) -> usize {
    match config.cooling {
        CoolingSchedule::Linear => config.max_iterations / config.iterations_per_temperature,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::random::create_rng;

    fn quick() -> SaConfig {
        SaConfig::default()
            .with_max_iterations(400)
            .with_cooling(CoolingSchedule::Geometric { alpha: 0.95 })
            .with_iterations_per_temperature(20)
            .with_time_limit(None)
            .with_seed(42)
    }

    #[test]
    fn test_sa_best_not_worse_than_initial() {
        let problem = fixtures::grid_problem(25, 9, 2);
        let initial = Solution::random(&problem, &mut create_rng(42)).unwrap();
        let result = SaRunner::run(&problem, &quick()).unwrap();
        assert!(result.best_cost <= initial.cost());
        assert!(result.best.is_feasible());
        assert_eq!(result.best.cost(), result.best_cost);
        fixtures::assert_consistent(&result.best);
    }

    #[test]
    fn test_sa_respects_iteration_cap() {
        let problem = fixtures::grid_problem(15, 9, 1);
        let result = SaRunner::run(&problem, &quick()).unwrap();
        assert_eq!(result.iterations, 400);
        assert_eq!(result.log.len(), 400);
        assert!(result.accepted_moves >= result.improving_moves);
    }

    #[test]
    fn test_sa_stops_at_min_temperature() {
        let problem = fixtures::grid_problem(10, 9, 1);
        let config = quick()
            .with_max_iterations(1_000_000)
            .with_initial_temperature(1.0)
            .with_min_temperature(0.5)
            .with_cooling(CoolingSchedule::Geometric { alpha: 0.5 });
        let result = SaRunner::run(&problem, &config).unwrap();
        // One temperature level above the floor.
        assert_eq!(result.iterations, 20);
        assert!(result.final_temperature <= 0.5);
    }

    #[test]
    fn test_sa_log_marks_improving_moves() {
        let problem = fixtures::grid_problem(15, 9, 1);
        let result = SaRunner::run(&problem, &quick()).unwrap();
        for row in result.log.rows() {
            let fields: Vec<f64> = row.split(',').map(|f| f.parse().unwrap()).collect();
            let (d, curr, next) = (fields[2], fields[3], fields[4]);
            if next <= curr {
                assert_eq!(d, -1.0, "row {row}");
            } else {
                assert!((0.0..=1.0).contains(&d), "row {row}");
            }
        }
    }

    #[test]
    fn test_sa_cost_history_non_increasing() {
        let problem = fixtures::grid_problem(20, 9, 1);
        let result = SaRunner::run(&problem, &quick().with_max_iterations(1_000)).unwrap();
        for w in result.cost_history.windows(2) {
            assert!(w[1] <= w[0] + 1e-10, "{} > {}", w[1], w[0]);
        }
    }

    #[test]
    fn test_sa_linear_and_lundy_mees_run() {
        let problem = fixtures::grid_problem(10, 9, 1);
        let linear =
            SaRunner::run(&problem, &quick().with_cooling(CoolingSchedule::Linear)).unwrap();
        assert!(linear.best.is_feasible());
        let lundy = SaRunner::run(
            &problem,
            &quick().with_cooling(CoolingSchedule::LundyMees { beta: 0.01 }),
        )
        .unwrap();
        assert!(lundy.best.is_feasible());
        assert_eq!(lundy.iterations, 400);
    }

    #[test]
    fn test_sa_cancellation() {
        let problem = fixtures::grid_problem(10, 9, 1);
        let cancel = Arc::new(AtomicBool::new(true));
        let result = SaRunner::run_with_cancel(&problem, &quick(), Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_sa_deterministic_with_seed() {
        let problem = fixtures::grid_problem(15, 9, 2);
        let a = SaRunner::run(&problem, &quick()).unwrap();
        let b = SaRunner::run(&problem, &quick()).unwrap();
        assert_eq!(a.best_cost, b.best_cost);
        assert_eq!(a.accepted_moves, b.accepted_moves);
    }
}
