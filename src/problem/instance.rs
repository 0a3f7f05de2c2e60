//! Problem instance and the feasibility pass.

use tracing::{debug, info};

use super::config::ProblemConfig;
use crate::error::{PlacementError, Result};
use crate::model::{
    CandidatePosition, ConfigCatalogue, ConfigId, Configuration, Device, DeviceId,
    GatewayProfile, SiteId, SliceId, NUM_CONFIGS,
};

/// A placement problem: devices, candidate sites, the gateway profile, and
/// the feasibility tables derived from them.
///
/// Immutable after construction. Solutions borrow it, so any number of
/// solutions (and GA worker threads) can share one instance.
///
/// # Examples
///
/// ```
/// use u_placement::model::{CandidatePosition, Device, GatewayProfile, Position};
/// use u_placement::problem::{Problem, ProblemConfig};
///
/// let devices = vec![Device::new(0, Position::new(100.0, 0.0, 0.0), 0)];
/// let sites = vec![CandidatePosition::new(0, Position::new(0.0, 0.0, 30.0))];
/// let problem = Problem::new(
///     ProblemConfig::default(),
///     devices,
///     sites,
///     GatewayProfile::reference(1),
/// )
/// .unwrap();
///
/// assert_eq!(problem.feasible_sites(0), &[0]);
/// assert!(!problem.feasible_configs(0, 0).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Problem {
    config: ProblemConfig,
    devices: Vec<Device>,
    sites: Vec<CandidatePosition>,
    gateway: GatewayProfile,
    catalogue: ConfigCatalogue,
    /// Indexed by `device * num_sites + site`, each list sorted by id.
    feasible_configs: Vec<Vec<ConfigId>>,
    feasible_sites: Vec<Vec<SiteId>>,
    coverage: Vec<Vec<DeviceId>>,
    /// Load datarate, indexed by `config * num_slices + slice`.
    datarates: Vec<f64>,
}

impl Problem {
    /// Builds the problem and runs the feasibility pass.
    ///
    /// Device and site ids must be dense and equal to their index.
    ///
    /// # Errors
    ///
    /// - [`PlacementError::InvalidConfig`] if the configuration or the ids are invalid
    /// - [`PlacementError::UnknownSlice`] if a device names an undefined slice
    /// - [`PlacementError::UnreachableDevice`] if no site reaches some device
    #[tracing::instrument(skip_all, fields(devices = devices.len(), sites = sites.len()))]
    pub fn new(
        config: ProblemConfig,
        devices: Vec<Device>,
        sites: Vec<CandidatePosition>,
        gateway: GatewayProfile,
    ) -> Result<Self> {
        config.validate().map_err(PlacementError::InvalidConfig)?;

        for (index, device) in devices.iter().enumerate() {
            if device.id != index {
                return Err(PlacementError::InvalidConfig(format!(
                    "device at index {index} has id {}",
                    device.id
                )));
            }
            if gateway.slice(device.slice).is_none() {
                return Err(PlacementError::UnknownSlice {
                    device: device.id,
                    slice: device.slice,
                    defined: gateway.num_slices(),
                });
            }
        }
        if let Some((index, site)) = sites.iter().enumerate().find(|(i, s)| s.id != *i) {
            return Err(PlacementError::InvalidConfig(format!(
                "site at index {index} has id {}",
                site.id
            )));
        }

        let catalogue = ConfigCatalogue::new();
        let num_slices = gateway.num_slices();
        let link = config.link;

        // QoS depends only on (config, slice).
        let mut qos_ok = vec![false; NUM_CONFIGS * num_slices];
        let mut datarates = vec![0.0; NUM_CONFIGS * num_slices];
        for (id, c) in catalogue.iter() {
            for slice in 0..num_slices {
                qos_ok[id * num_slices + slice] = link.meets_qos(c.sf, gateway.bandwidth(slice));
                datarates[id * num_slices + slice] = gateway.datarate(c.sf, slice);
            }
        }

        let num_sites = sites.len();
        let mut feasible_configs = vec![Vec::new(); devices.len() * num_sites];
        let mut feasible_sites = vec![Vec::new(); devices.len()];
        let mut coverage = vec![Vec::new(); num_sites];

        for device in &devices {
            for site in &sites {
                let distance = device.position.distance(&site.position);
                let configs: Vec<ConfigId> = catalogue
                    .iter()
                    .filter(|(id, c)| {
                        qos_ok[id * num_slices + device.slice]
                            && link.reaches(c.tp, gateway.sensitivity(c.sf), distance)
                    })
                    .map(|(id, _)| id)
                    .collect();
                if !configs.is_empty() {
                    feasible_sites[device.id].push(site.id);
                    coverage[site.id].push(device.id);
                }
                feasible_configs[device.id * num_sites + site.id] = configs;
            }
            if feasible_sites[device.id].is_empty() {
                return Err(PlacementError::UnreachableDevice { device: device.id });
            }
            debug!(
                device = device.id,
                sites = feasible_sites[device.id].len(),
                "device feasibility"
            );
        }

        info!(
            devices = devices.len(),
            sites = num_sites,
            slices = num_slices,
            "feasibility tables built"
        );

        Ok(Self {
            config,
            devices,
            sites,
            gateway,
            catalogue,
            feasible_configs,
            feasible_sites,
            coverage,
            datarates,
        })
    }

    pub fn config(&self) -> &ProblemConfig {
        &self.config
    }

    pub fn num_devices(&self) -> usize {
        self.devices.len()
    }

    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn num_slices(&self) -> usize {
        self.gateway.num_slices()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn sites(&self) -> &[CandidatePosition] {
        &self.sites
    }

    pub fn device(&self, device: DeviceId) -> &Device {
        &self.devices[device]
    }

    pub fn site(&self, site: SiteId) -> &CandidatePosition {
        &self.sites[site]
    }

    pub fn gateway(&self) -> &GatewayProfile {
        &self.gateway
    }

    pub fn catalogue(&self) -> &ConfigCatalogue {
        &self.catalogue
    }

    pub fn configuration(&self, config: ConfigId) -> Configuration {
        self.catalogue.get(config)
    }

    /// Slice of a device.
    pub fn slice_of(&self, device: DeviceId) -> SliceId {
        self.devices[device].slice
    }

    /// Configurations feasible for `device` at `site`, sorted by id.
    pub fn feasible_configs(&self, device: DeviceId, site: SiteId) -> &[ConfigId] {
        &self.feasible_configs[device * self.sites.len() + site]
    }

    /// Sites with at least one feasible configuration for `device`, sorted.
    pub fn feasible_sites(&self, device: DeviceId) -> &[SiteId] {
        &self.feasible_sites[device]
    }

    /// Devices reachable from `site`, sorted.
    pub fn coverage(&self, site: SiteId) -> &[DeviceId] {
        &self.coverage[site]
    }

    /// Whether `(site, config)` is a feasible pair for `device`.
    pub fn is_feasible(&self, device: DeviceId, site: SiteId, config: ConfigId) -> bool {
        self.feasible_configs(device, site).binary_search(&config).is_ok()
    }

    /// Whether `site` can serve `device` with some configuration using `sf`.
    pub fn supports_sf(&self, device: DeviceId, site: SiteId, sf: u8) -> bool {
        self.feasible_configs(device, site)
            .iter()
            .any(|&c| self.catalogue.get(c).sf == sf)
    }

    /// Load a device with configuration `config` puts on `slice`.
    pub fn datarate(&self, config: ConfigId, slice: SliceId) -> f64 {
        self.datarates[config * self.num_slices() + slice]
    }

    /// Aggregate datarate cap of `slice` at every site.
    pub fn max_datarate(&self, slice: SliceId) -> f64 {
        self.gateway.max_datarate(slice)
    }

    /// Upper bound on any solution cost: every device on its own site and
    /// every device sharing one spreading factor.
    pub fn max_cost(&self) -> f64 {
        self.devices.len() as f64 * (self.config.alpha + self.config.beta)
    }
}
