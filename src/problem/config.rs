//! Problem weights, move probabilities, and radio link constants.

/// Path-loss and quality-of-service constants.
///
/// Defaults describe an EU868 LoRaWAN deployment with 400-bit packets.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkModel {
    /// Received power at the reference distance (dB).
    pub reference_prx: f64,
    /// Reference distance for the log-distance path-loss model (m).
    pub reference_distance: f64,
    /// Path-loss attenuation exponent.
    pub attenuation_exponent: f64,
    /// Forward error correction coding rate.
    pub coding_rate: f64,
    /// Packet size in bits.
    pub packet_size: f64,
    /// Datarate normalising the QoS datarate term.
    pub max_datarate: f64,
    /// Slowest datarate, defines the delay budget.
    pub min_datarate: f64,
    /// A configuration is acceptable when its QoS score exceeds this.
    pub qos_bound: f64,
}

impl Default for LinkModel {
    fn default() -> Self {
        Self {
            reference_prx: 10.0,
            reference_distance: 1.0,
            attenuation_exponent: 3.76,
            coding_rate: 4.0 / 5.0,
            packet_size: 400.0,
            max_datarate: 6835.94,
            min_datarate: 183.11,
            qos_bound: 0.9,
        }
    }
}

impl LinkModel {
    pub fn with_attenuation_exponent(mut self, exponent: f64) -> Self {
        self.attenuation_exponent = exponent;
        self
    }

    pub fn with_qos_bound(mut self, bound: f64) -> Self {
        self.qos_bound = bound;
        self
    }

    /// Longest acceptable transmission delay: `packet_size / min_datarate`.
    pub fn max_delay(&self) -> f64 {
        self.packet_size / self.min_datarate
    }

    /// Log-distance path loss; zero inside the reference distance.
    pub fn pathloss(&self, distance: f64) -> f64 {
        if distance <= self.reference_distance {
            0.0
        } else {
            10.0 * self.attenuation_exponent * (distance / self.reference_distance).log10()
        }
    }

    /// Link-budget check: `tp - reference_prx - pathloss >= sensitivity`.
    pub fn reaches(&self, tp: u8, sensitivity: f64, distance: f64) -> bool {
        f64::from(tp) - self.reference_prx - self.pathloss(distance) >= sensitivity
    }

    /// QoS score of spreading factor `sf` on a slice of the given bandwidth:
    /// `datarate / max_datarate + (1 - delay / max_delay)`.
    pub fn qos(&self, sf: u8, bandwidth: f64) -> f64 {
        let datarate =
            bandwidth * f64::from(sf) / 2f64.powi(i32::from(sf)) * self.coding_rate;
        let delay = self.packet_size / datarate;
        datarate / self.max_datarate + (1.0 - delay / self.max_delay())
    }

    pub fn meets_qos(&self, sf: u8, bandwidth: f64) -> bool {
        self.qos(sf, bandwidth) > self.qos_bound
    }

    /// Validates the constants.
    pub fn validate(&self) -> Result<(), String> {
        if self.reference_distance <= 0.0 {
            return Err("reference_distance must be positive".into());
        }
        if self.coding_rate <= 0.0 || self.coding_rate > 1.0 {
            return Err(format!(
                "coding_rate must be in (0, 1], got {}",
                self.coding_rate
            ));
        }
        if self.packet_size <= 0.0 {
            return Err("packet_size must be positive".into());
        }
        if self.max_datarate <= 0.0 || self.min_datarate <= 0.0 {
            return Err("max_datarate and min_datarate must be positive".into());
        }
        Ok(())
    }
}

/// Cost weights and neighbor move probabilities.
///
/// # Examples
///
/// ```
/// use u_placement::problem::ProblemConfig;
///
/// let config = ProblemConfig::default()
///     .with_alpha(100.0)
///     .with_beta(1.0)
///     .with_change_site_probability(0.75)
///     .with_new_site_probability(0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProblemConfig {
    /// Weight of the deployed-site count in the cost.
    pub alpha: f64,
    /// Weight of the worst per-SF device count in the cost.
    pub beta: f64,
    /// Probability that a move changes the site rather than the configuration.
    pub change_site_probability: f64,
    /// Probability that a site move targets an undeployed site.
    pub new_site_probability: f64,
    /// Radio link constants used by the feasibility checks.
    pub link: LinkModel,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            alpha: 100.0,
            beta: 1.0,
            change_site_probability: 0.75,
            new_site_probability: 0.05,
            link: LinkModel::default(),
        }
    }
}

impl ProblemConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_change_site_probability(mut self, p: f64) -> Self {
        self.change_site_probability = p;
        self
    }

    pub fn with_new_site_probability(mut self, p: f64) -> Self {
        self.new_site_probability = p;
        self
    }

    pub fn with_link(mut self, link: LinkModel) -> Self {
        self.link = link;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(format!("alpha must be finite and non-negative, got {}", self.alpha));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(format!("beta must be finite and non-negative, got {}", self.beta));
        }
        if !(0.0..=1.0).contains(&self.change_site_probability) {
            return Err(format!(
                "change_site_probability must be in [0, 1], got {}",
                self.change_site_probability
            ));
        }
        if !(0.0..=1.0).contains(&self.new_site_probability) {
            return Err(format!(
                "new_site_probability must be in [0, 1], got {}",
                self.new_site_probability
            ));
        }
        self.link.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pathloss_flat_inside_reference_distance() {
        let link = LinkModel::default();
        assert_eq!(link.pathloss(0.5), 0.0);
        assert_eq!(link.pathloss(1.0), 0.0);
        assert!((link.pathloss(10.0) - 37.6).abs() < 1e-9);
    }

    #[test]
    fn test_qos_reference_spreading_factors() {
        // On a 125 kHz slice SF7..=SF10 clear the 0.9 bound, SF11 and SF12 do not.
        let link = LinkModel::default();
        for sf in 7..=10 {
            assert!(link.meets_qos(sf, 125_000.0), "sf {sf} should meet QoS");
        }
        for sf in 11..=12 {
            assert!(!link.meets_qos(sf, 125_000.0), "sf {sf} should fail QoS");
        }
    }

    #[test]
    fn test_reaches_link_budget() {
        let link = LinkModel::default();
        // 14 dBm at SF7 (-130 dBm): budget 134 dB -> ~3.66 km.
        assert!(link.reaches(14, -130.0, 3_000.0));
        assert!(!link.reaches(14, -130.0, 4_000.0));
        // Lower power shortens the range.
        assert!(!link.reaches(2, -130.0, 3_000.0));
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let config = ProblemConfig::default().with_change_site_probability(1.5);
        assert!(config.validate().is_err());
        let config = ProblemConfig::default().with_new_site_probability(-0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_weight() {
        assert!(ProblemConfig::default().with_alpha(-1.0).validate().is_err());
        assert!(ProblemConfig::default().with_beta(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_default_validates() {
        assert!(ProblemConfig::default().validate().is_ok());
    }
}
