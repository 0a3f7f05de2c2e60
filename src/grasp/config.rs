//! GRASP configuration.

use crate::model::{MAX_SF, MIN_SF};
use crate::tabu::TabuConfig;

/// Configuration for GRASP.
///
/// # Examples
///
/// ```
/// use u_placement::grasp::GraspConfig;
///
/// let config = GraspConfig::default().with_rcl_alpha(0.7).with_restarts(5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraspConfig {
    /// A site enters the restricted candidate list when its remaining
    /// coverage exceeds `floor(rcl_alpha * best)`. 1.0 is pure greedy.
    pub rcl_alpha: f64,
    /// Fraction of each slice's max datarate a site may be filled to during
    /// construction.
    pub capacity_alpha: f64,
    /// Spreading factor assumed for loads and configurations during
    /// construction.
    pub default_sf: u8,
    /// Independent construct-and-refine rounds.
    pub restarts: usize,
    /// Local search applied to every constructed solution.
    pub local_search: TabuConfig,
    pub seed: Option<u64>,
}

impl Default for GraspConfig {
    fn default() -> Self {
        Self {
            rcl_alpha: 0.8,
            capacity_alpha: 0.9,
            default_sf: 10,
            restarts: 1,
            local_search: TabuConfig::default()
                .with_max_iterations(50_000)
                .with_max_no_improve(50_000)
                .with_tabu_list_size(25)
                .with_batch_size(20)
                .with_tabu_site_ratio(0.25),
            seed: None,
        }
    }
}

impl GraspConfig {
    pub fn with_rcl_alpha(mut self, alpha: f64) -> Self {
        self.rcl_alpha = alpha;
        self
    }

    pub fn with_capacity_alpha(mut self, alpha: f64) -> Self {
        self.capacity_alpha = alpha;
        self
    }

    pub fn with_default_sf(mut self, sf: u8) -> Self {
        self.default_sf = sf;
        self
    }

    pub fn with_restarts(mut self, n: usize) -> Self {
        self.restarts = n;
        self
    }

    pub fn with_local_search(mut self, local_search: TabuConfig) -> Self {
        self.local_search = local_search;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.rcl_alpha) {
            return Err(format!("rcl_alpha must be in [0, 1], got {}", self.rcl_alpha));
        }
        if self.capacity_alpha <= 0.0 || self.capacity_alpha > 1.0 {
            return Err(format!(
                "capacity_alpha must be in (0, 1], got {}",
                self.capacity_alpha
            ));
        }
        if !(MIN_SF..=MAX_SF).contains(&self.default_sf) {
            return Err(format!(
                "default_sf must be in {MIN_SF}..={MAX_SF}, got {}",
                self.default_sf
            ));
        }
        if self.restarts == 0 {
            return Err("restarts must be at least 1".into());
        }
        self.local_search
            .validate()
            .map_err(|e| format!("local_search: {e}"))
    }
}
