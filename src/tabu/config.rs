//! Tabu Search configuration.

use std::time::Duration;

/// Configuration parameters for Tabu Search.
///
/// # Examples
///
/// ```
/// use u_placement::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_max_iterations(1000)
///     .with_batch_size(20)
///     .with_tabu_list_size(25)
///     .with_tabu_site_ratio(0.25);
/// assert_eq!(config.max_iterations, 1000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabuConfig {
    /// Maximum number of iterations, across all phases.
    pub max_iterations: usize,
    /// Neighbors sampled per iteration.
    pub batch_size: usize,
    /// Capacity of the short-term `(device, axis)` FIFO.
    pub tabu_list_size: usize,
    /// Iterations without beating the phase elite before diversifying.
    pub max_no_improve: usize,
    /// Deployed tabu-site fraction above which tabu sites become eligible
    /// again (and the opened fraction at which random restarts stop
    /// opening new tabu sites).
    pub tabu_site_ratio: f64,
    /// Admit tabu moves whose cost does not exceed the global best.
    pub aspiration: bool,
    /// Prefer deployed sites for site moves.
    pub site_aware_neighbors: bool,
    /// Filter site moves against the long-term site memory.
    pub tabu_aware_neighbors: bool,
    /// Diversify with a long random walk from the global best instead of a
    /// tabu-avoiding restart.
    pub diversify_random: bool,
    /// Wall-clock budget.
    pub time_limit: Option<Duration>,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100_000,
            batch_size: 20,
            tabu_list_size: 40,
            max_no_improve: 1_000,
            tabu_site_ratio: 0.25,
            aspiration: true,
            site_aware_neighbors: true,
            tabu_aware_neighbors: true,
            diversify_random: false,
            time_limit: Some(Duration::from_secs(60)),
            seed: None,
        }
    }
}

impl TabuConfig {
    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    pub fn with_tabu_list_size(mut self, n: usize) -> Self {
        self.tabu_list_size = n;
        self
    }

    /// Sets maximum iterations without improvement.
    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    pub fn with_tabu_site_ratio(mut self, ratio: f64) -> Self {
        self.tabu_site_ratio = ratio;
        self
    }

    /// Enables or disables aspiration criterion.
    pub fn with_aspiration(mut self, aspiration: bool) -> Self {
        self.aspiration = aspiration;
        self
    }

    pub fn with_site_aware_neighbors(mut self, enabled: bool) -> Self {
        self.site_aware_neighbors = enabled;
        self
    }

    pub fn with_tabu_aware_neighbors(mut self, enabled: bool) -> Self {
        self.tabu_aware_neighbors = enabled;
        self
    }

    pub fn with_diversify_random(mut self, enabled: bool) -> Self {
        self.diversify_random = enabled;
        self
    }

    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.tabu_site_ratio) {
            return Err(format!(
                "tabu_site_ratio must be in [0, 1], got {}",
                self.tabu_site_ratio
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabu_config_defaults() {
        let config = TabuConfig::default();
        assert_eq!(config.max_iterations, 100_000);
        assert_eq!(config.batch_size, 20);
        assert_eq!(config.tabu_list_size, 40);
        assert_eq!(config.max_no_improve, 1_000);
        assert!(config.aspiration);
        assert_eq!(config.time_limit, Some(Duration::from_secs(60)));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_tabu_config_builder() {
        let config = TabuConfig::default()
            .with_max_iterations(1000)
            .with_tabu_list_size(10)
            .with_aspiration(false)
            .with_max_no_improve(50)
            .with_seed(123);

        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.tabu_list_size, 10);
        assert!(!config.aspiration);
        assert_eq!(config.max_no_improve, 50);
        assert_eq!(config.seed, Some(123));
    }

    #[test]
    fn test_validate_rejects_empty_batch() {
        assert!(TabuConfig::default().with_batch_size(0).validate().is_err());
        assert!(TabuConfig::default()
            .with_tabu_site_ratio(1.5)
            .validate()
            .is_err());
    }
}
