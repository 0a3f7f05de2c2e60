//! Discrete radio configuration space.
//!
//! A configuration is a (spreading factor, transmit power) pair. The space
//! is the full grid SF 7..=12 × TP 2..=14 (step 2), and every point gets a
//! stable dense id:
//!
//! ```text
//! id = (sf - 7) * 7 + (tp / 2 - 1)
//! ```
//!
//! Ids therefore sort by spreading factor first, then by transmit power.

use super::ConfigId;

/// Smallest spreading factor.
pub const MIN_SF: u8 = 7;
/// Largest spreading factor.
pub const MAX_SF: u8 = 12;
/// Smallest transmit power (dBm).
pub const MIN_TP: u8 = 2;
/// Largest transmit power (dBm).
pub const MAX_TP: u8 = 14;
/// Transmit power step (dBm).
pub const STEP_TP: u8 = 2;

/// Number of distinct spreading factors.
pub const NUM_SF: usize = (MAX_SF - MIN_SF + 1) as usize;

const TP_LEVELS: usize = (MAX_TP / STEP_TP) as usize;

/// Number of configuration ids (`config_id(MAX_SF, MAX_TP) + 1`).
pub const NUM_CONFIGS: usize = NUM_SF * TP_LEVELS;

/// Dense id of a (spreading factor, transmit power) pair.
///
/// # Examples
///
/// ```
/// use u_placement::model::config_id;
///
/// assert_eq!(config_id(7, 2), 0);
/// assert_eq!(config_id(7, 14), 6);
/// assert_eq!(config_id(8, 2), 7);
/// assert_eq!(config_id(12, 14), 41);
/// ```
pub const fn config_id(sf: u8, tp: u8) -> ConfigId {
    (sf - MIN_SF) as usize * TP_LEVELS + (tp / STEP_TP - 1) as usize
}

/// A device radio configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    /// Spreading factor, 7..=12.
    pub sf: u8,
    /// Transmit power in dBm, 2..=14 step 2.
    pub tp: u8,
}

impl Configuration {
    pub fn id(&self) -> ConfigId {
        config_id(self.sf, self.tp)
    }

    /// Index of the spreading factor in `0..NUM_SF`.
    pub fn sf_index(&self) -> usize {
        (self.sf - MIN_SF) as usize
    }
}

/// The full configuration space, indexed by [`ConfigId`].
///
/// Built once per problem and never mutated.
#[derive(Debug, Clone)]
pub struct ConfigCatalogue {
    configs: Vec<Configuration>,
}

impl Default for ConfigCatalogue {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigCatalogue {
    pub fn new() -> Self {
        let mut configs = Vec::with_capacity(NUM_CONFIGS);
        for sf in MIN_SF..=MAX_SF {
            for tp in (MIN_TP..=MAX_TP).step_by(STEP_TP as usize) {
                configs.push(Configuration { sf, tp });
            }
        }
        debug_assert!(configs.iter().enumerate().all(|(i, c)| c.id() == i));
        Self { configs }
    }

    /// Returns the configuration with the given id.
    ///
    /// # Panics
    /// Panics if `id >= NUM_CONFIGS`.
    pub fn get(&self, id: ConfigId) -> Configuration {
        self.configs[id]
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConfigId, Configuration)> + '_ {
        self.configs.iter().copied().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_covers_full_grid() {
        let catalogue = ConfigCatalogue::new();
        assert_eq!(catalogue.len(), NUM_CONFIGS);
        assert_eq!(NUM_CONFIGS, 42);
        for (id, config) in catalogue.iter() {
            assert_eq!(config.id(), id, "id mismatch for {config:?}");
            assert!((MIN_SF..=MAX_SF).contains(&config.sf));
            assert!((MIN_TP..=MAX_TP).contains(&config.tp));
            assert_eq!(config.tp % STEP_TP, 0);
        }
    }

    #[test]
    fn test_ids_sort_by_sf_then_tp() {
        let catalogue = ConfigCatalogue::new();
        for id in 1..catalogue.len() {
            let prev = catalogue.get(id - 1);
            let next = catalogue.get(id);
            assert!(
                (prev.sf, prev.tp) < (next.sf, next.tp),
                "{prev:?} should precede {next:?}"
            );
        }
    }

    #[test]
    fn test_sf_index() {
        assert_eq!(Configuration { sf: 7, tp: 2 }.sf_index(), 0);
        assert_eq!(Configuration { sf: 12, tp: 14 }.sf_index(), NUM_SF - 1);
    }
}
