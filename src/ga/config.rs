//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use std::time::Duration;

use super::selection::Selection;
use crate::model::{MAX_SF, MIN_SF};
use crate::tabu::TabuConfig;

/// Configuration for the Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use u_placement::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 500);
/// assert_eq!(config.selection, Selection::Roulette);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_placement::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(40)
///     .with_selection(Selection::Tournament(3))
///     .with_workers(4)
///     .with_mutation_rate(0.02);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Probability that a parent pair exchanges gene tails (0.0–1.0).
    ///
    /// When crossover is not applied, each child decodes its own parent's
    /// gene (subject to mutation).
    pub crossover_rate: f64,

    /// Per-gene probability of flipping a deployed-site bit (0.0–1.0).
    pub mutation_rate: f64,

    /// Selection strategy for choosing parents.
    pub selection: Selection,

    /// Number of threads producing offspring.
    pub workers: usize,

    /// Number of best offspring refined with tabu search each generation.
    pub elite_refinement: usize,

    /// Tabu Search parameters used for elite refinement.
    pub refinement: TabuConfig,

    /// Spreading factor used when decoding a deployed-site gene.
    pub construction_sf: u8,

    /// Wall-clock budget, checked between generations.
    pub time_limit: Option<Duration>,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            crossover_rate: 0.9,
            mutation_rate: 0.01,
            selection: Selection::default(),
            workers: 8,
            elite_refinement: 5,
            refinement: Self::default_refinement(),
            construction_sf: 10,
            time_limit: Some(Duration::from_secs(60)),
            seed: None,
        }
    }
}

impl GaConfig {
    /// Short tabu search run applied to each refined offspring.
    pub fn default_refinement() -> TabuConfig {
        TabuConfig::default()
            .with_max_iterations(100)
            .with_max_no_improve(100)
            .with_tabu_list_size(25)
            .with_batch_size(20)
            .with_tabu_site_ratio(0.25)
            .with_time_limit(None)
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-gene mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = n;
        self
    }

    pub fn with_elite_refinement(mut self, n: usize) -> Self {
        self.elite_refinement = n;
        self
    }

    pub fn with_refinement(mut self, refinement: TabuConfig) -> Self {
        self.refinement = refinement;
        self
    }

    pub fn with_construction_sf(mut self, sf: u8) -> Self {
        self.construction_sf = sf;
        self
    }

    /// Sets the wall-clock time limit.
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if self.workers == 0 {
            return Err("workers must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(format!(
                "crossover_rate must be in [0, 1], got {}",
                self.crossover_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            ));
        }
        if self.elite_refinement > self.population_size {
            return Err(format!(
                "elite_refinement ({}) exceeds population_size ({})",
                self.elite_refinement, self.population_size
            ));
        }
        if !(MIN_SF..=MAX_SF).contains(&self.construction_sf) {
            return Err(format!(
                "construction_sf must be in {MIN_SF}..={MAX_SF}, got {}",
                self.construction_sf
            ));
        }
        if let Selection::Tournament(0) = self.selection {
            return Err("tournament size must be at least 1".into());
        }
        if self.time_limit == Some(Duration::ZERO) {
            return Err("time_limit must be positive or None".into());
        }
        self.refinement
            .validate()
            .map_err(|e| format!("refinement: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 500);
        assert_eq!(config.selection, Selection::Roulette);
        assert!((config.crossover_rate - 0.9).abs() < 1e-10);
        assert!((config.mutation_rate - 0.01).abs() < 1e-10);
        assert_eq!(config.workers, 8);
        assert_eq!(config.elite_refinement, 5);
        assert_eq!(config.construction_sf, 10);
        assert_eq!(config.refinement.max_iterations, 100);
        assert_eq!(config.refinement.tabu_list_size, 25);
        assert!(config.refinement.time_limit.is_none());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(200)
            .with_max_generations(1000)
            .with_selection(Selection::Rank)
            .with_crossover_rate(1.5)
            .with_mutation_rate(0.05)
            .with_workers(2)
            .with_seed(42);

        assert_eq!(config.population_size, 200);
        assert_eq!(config.max_generations, 1000);
        assert_eq!(config.selection, Selection::Rank);
        assert!((config.crossover_rate - 1.0).abs() < 1e-10, "rate is clamped");
        assert!((config.mutation_rate - 0.05).abs() < 1e-10);
        assert_eq!(config.workers, 2);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_ok() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        assert!(GaConfig::default().with_population_size(1).validate().is_err());
        assert!(GaConfig::default().with_max_generations(0).validate().is_err());
        assert!(GaConfig::default().with_workers(0).validate().is_err());
        assert!(GaConfig::default()
            .with_population_size(4)
            .with_elite_refinement(5)
            .validate()
            .is_err());
        assert!(GaConfig::default().with_construction_sf(6).validate().is_err());
        assert!(GaConfig::default()
            .with_selection(Selection::Tournament(0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_rejects_nan_rates() {
        let err = GaConfig::default()
            .with_crossover_rate(f64::NAN)
            .validate()
            .unwrap_err();
        assert!(err.starts_with("crossover_rate"), "got {err}");
        assert!(GaConfig::default()
            .with_mutation_rate(f64::NAN)
            .validate()
            .is_err());

        let mut config = GaConfig::default();
        config.mutation_rate = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_checks_refinement() {
        let config = GaConfig::default()
            .with_refinement(TabuConfig::default().with_batch_size(0));
        let err = config.validate().unwrap_err();
        assert!(err.starts_with("refinement:"), "got {err}");
    }
}
