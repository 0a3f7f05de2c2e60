//! SA configuration and cooling schedules.

use std::time::Duration;

/// Cooling schedule for temperature reduction.
///
/// # References
///
/// - Geometric: standard textbook approach
/// - Linear: fixed-duration cooling
/// - LundyMees: Lundy & Mees (1986), with convergence proof
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// Geometric (exponential) cooling: `T_{k+1} = alpha * T_k`.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// Linear cooling: `T_k = T_0 - k * (T_0 - T_min) / steps`, where
    /// `steps = max_iterations / iterations_per_temperature`.
    Linear,

    /// Lundy-Mees cooling: `T_{k+1} = T_k / (1 + beta * T_k)`, one
    /// iteration per temperature step.
    LundyMees {
        /// Cooling parameter. Typically `(T_0 - T_min) / (max_iter * T_0 * T_min)`.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.99985 }
    }
}

/// Configuration for the Simulated Annealing algorithm.
///
/// # Examples
///
/// ```
/// use u_placement::sa::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(250.0)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.999 })
///     .with_iterations_per_temperature(20)
///     .with_distance(1, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// The algorithm stops when T drops below this.
    pub min_temperature: f64,

    pub cooling: CoolingSchedule,

    /// Number of iterations at each temperature level.
    ///
    /// For `LundyMees`, this is ignored (1 iteration per temperature).
    pub iterations_per_temperature: usize,

    /// Maximum total iterations (hard budget).
    pub max_iterations: usize,

    /// Fewest chained moves per neighbor.
    pub min_distance: usize,

    /// Most chained moves per neighbor (inclusive).
    pub max_distance: usize,

    /// Prefer deployed sites for site moves.
    pub site_aware_neighbors: bool,

    /// Wall-clock budget.
    pub time_limit: Option<Duration>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 250.0,
            min_temperature: 1e-6,
            cooling: CoolingSchedule::default(),
            iterations_per_temperature: 20,
            max_iterations: 1_000_000,
            min_distance: 1,
            max_distance: 5,
            site_aware_neighbors: true,
            time_limit: Some(Duration::from_secs(60)),
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the chained-move distance range `min..=max`.
    pub fn with_distance(mut self, min: usize, max: usize) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    pub fn with_site_aware_neighbors(mut self, enabled: bool) -> Self {
        self.site_aware_neighbors = enabled;
        self
    }

    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if self.min_temperature <= 0.0 {
            return Err("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.initial_temperature {
            return Err("min_temperature must be less than initial_temperature".into());
        }
        if self.iterations_per_temperature == 0 {
            return Err("iterations_per_temperature must be at least 1".into());
        }
        if self.min_distance == 0 || self.min_distance > self.max_distance {
            return Err(format!(
                "distance range must satisfy 1 <= min <= max, got {}..={}",
                self.min_distance, self.max_distance
            ));
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if alpha <= 0.0 || alpha >= 1.0 {
                    return Err(format!("geometric alpha must be in (0, 1), got {alpha}"));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if beta <= 0.0 {
                    return Err(format!("lundy-mees beta must be positive, got {beta}"));
                }
            }
            CoolingSchedule::Linear => {}
        }
        Ok(())
    }
}
