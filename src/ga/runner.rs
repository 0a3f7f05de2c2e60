//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! random population → parallel reproduction → elite refinement → repeat.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::config::GaConfig;
use super::crossover::{crossover, Offspring};
use super::population::Population;
use crate::error::{PlacementError, Result};
use crate::problem::Problem;
use crate::progress::{ProgressLog, GA_HEADER};
use crate::random::{create_rng, rng_from_seed};
use crate::solution::Solution;
use crate::tabu::TabuRunner;

/// Statistics of one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_cost: f64,
    pub avg_cost: f64,
    /// Offspring replaced by a parent copy this generation.
    pub infeasible: usize,
    pub population: usize,
}

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<'p> {
    /// The best individual found during the entire run.
    pub best: Solution<'p>,

    /// Cost of `best`.
    pub best_cost: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Generation in which `best` first appeared (0 = initial population).
    pub best_generation: usize,

    /// Elapsed time when `best` was found.
    pub best_time: Duration,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best cost after each generation, initial population first.
    pub cost_history: Vec<f64>,

    /// Per-generation statistics, initial population first.
    pub stats: Vec<GenerationStats>,

    /// One row per generation, see [`GA_HEADER`].
    pub log: ProgressLog,
}

/// Executes the GA evolutionary loop.
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    pub fn run<'p>(problem: &'p Problem, config: &GaConfig) -> Result<GaResult<'p>> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// The flag is checked between generations; a generation in progress
    /// always completes.
    #[tracing::instrument(
        skip_all,
        name = "ga",
        fields(devices = problem.num_devices(), sites = problem.num_sites())
    )]
    pub fn run_with_cancel<'p>(
        problem: &'p Problem,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<'p>> {
        config.validate().map_err(PlacementError::InvalidConfig)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .build()
            .map_err(|e| PlacementError::WorkerPool(e.to_string()))?;

        let start = Instant::now();
        let mut rng = rng_from_seed(config.seed);

        // 1. Initialize population
        let mut population = Population::random(problem, config.population_size, &mut rng)?;

        let mut best = population
            .best()
            .cloned()
            .ok_or_else(|| PlacementError::InvalidConfig("empty population".into()))?;
        let mut best_cost = best.cost();
        let mut best_generation = 0;
        let mut best_time = Duration::ZERO;

        let mut log = ProgressLog::new(GA_HEADER);
        let mut stats = Vec::with_capacity(config.max_generations + 1);
        let mut cost_history = Vec::with_capacity(config.max_generations + 1);
        let initial = record(&mut log, &population, 0, 0, Duration::ZERO);
        stats.push(initial);
        cost_history.push(best_cost);

        info!(best_cost, population = population.len(), "evolution started");

        let mut generations = 0;
        let mut cancelled = false;

        // 2. Evolutionary loop
        for generation in 1..=config.max_generations {
            if cancel.as_deref().is_some_and(|c| c.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }
            if config.time_limit.is_some_and(|limit| start.elapsed() >= limit) {
                break;
            }

            let (mut next, infeasible) = reproduce(&pool, &population, config, &mut rng);
            refine_elite(&mut next, config, &mut rng);
            population = next;
            generations = generation;

            let elapsed = start.elapsed();
            let gen_stats = record(&mut log, &population, generation, infeasible, elapsed);
            stats.push(gen_stats);

            if gen_stats.best_cost < best_cost {
                if let Some(gen_best) = population.best() {
                    best = gen_best.clone();
                    best_cost = gen_stats.best_cost;
                    best_generation = generation;
                    best_time = elapsed;
                    info!(generation, best_cost, "new best");
                }
            }
            cost_history.push(best_cost);

            debug!(
                generation,
                best_cost = gen_stats.best_cost,
                avg_cost = gen_stats.avg_cost,
                infeasible,
                "generation done"
            );
        }

        info!(generations, best_cost, cancelled, "evolution finished");

        Ok(GaResult {
            best,
            best_cost,
            generations,
            best_generation,
            best_time,
            cancelled,
            cost_history,
            stats,
            log,
        })
    }
}

/// Number of offspring each worker produces; the last worker takes the
/// remainder.
fn shares(total: usize, workers: usize) -> Vec<usize> {
    let base = total / workers;
    let mut shares = vec![base; workers];
    if let Some(last) = shares.last_mut() {
        *last += total % workers;
    }
    shares
}

/// Produces the next generation on the worker pool.
///
/// Each worker owns an RNG seeded from the master `rng` and its own share
/// of the offspring; results are concatenated in worker order so a seeded
/// run is reproducible. Returns the offspring and how many of them are
/// parent copies.
fn reproduce<'p, R: Rng + ?Sized>(
    pool: &rayon::ThreadPool,
    population: &Population<'p>,
    config: &GaConfig,
    rng: &mut R,
) -> (Population<'p>, usize) {
    let fitness = population.fitness();
    let parents = population.individuals();
    let jobs: Vec<(u64, usize)> = shares(config.population_size, config.workers)
        .into_iter()
        .map(|share| (rng.random::<u64>(), share))
        .collect();

    let batches: Vec<Vec<Offspring<'p>>> = pool.install(|| {
        jobs.into_par_iter()
            .map(|(seed, share)| {
                let mut rng = create_rng(seed);
                let mut produced = Vec::with_capacity(share);
                while produced.len() < share {
                    let p1 = config.selection.select(&fitness, &mut rng);
                    let p2 = config.selection.select(&fitness, &mut rng);
                    let children = crossover(
                        &parents[p1],
                        &parents[p2],
                        config.crossover_rate,
                        config.mutation_rate,
                        config.construction_sf,
                        &mut rng,
                    );
                    for child in children {
                        if produced.len() < share {
                            produced.push(child);
                        }
                    }
                }
                produced
            })
            .collect()
    });

    let mut next = Population::from_individuals(Vec::with_capacity(config.population_size));
    let mut infeasible = 0;
    for child in batches.into_iter().flatten() {
        if child.fallback {
            infeasible += 1;
        }
        next.push(child.solution);
    }
    if infeasible > 0 {
        warn!(infeasible, "offspring replaced by parent copies");
    }
    (next, infeasible)
}

/// Refines the `elite_refinement` cheapest individuals with tabu search and
/// puts them back. A refinement error keeps the unrefined individual.
fn refine_elite<R: Rng + ?Sized>(population: &mut Population<'_>, config: &GaConfig, rng: &mut R) {
    for individual in population.remove_best(config.elite_refinement) {
        match TabuRunner::run_from(&config.refinement, individual.clone(), rng) {
            Ok(refined) => population.push(refined.best),
            Err(e) => {
                warn!(error = %e, "elite refinement failed, keeping individual");
                population.push(individual);
            }
        }
    }
}

fn record(
    log: &mut ProgressLog,
    population: &Population<'_>,
    generation: usize,
    infeasible: usize,
    elapsed: Duration,
) -> GenerationStats {
    let stats = GenerationStats {
        generation,
        best_cost: population.min_cost(),
        avg_cost: population.avg_cost(),
        infeasible,
        population: population.len(),
    };
    log.push(format_args!(
        "{},{:.6},{:.6},{},{},{:.6}",
        generation,
        stats.best_cost,
        stats.avg_cost,
        infeasible,
        stats.population,
        elapsed.as_secs_f64()
    ));
    stats
}

// ============================================================================
// Tests
// ============================================================================
