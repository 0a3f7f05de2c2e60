//! Gateway radio profile.

use super::radio::{MIN_SF, NUM_SF};
use super::SliceId;

/// Per-slice radio budget at a gateway.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliceProfile {
    /// Channel bandwidth in Hz.
    pub bandwidth: f64,
    /// Maximum aggregate datarate a gateway may carry on this slice.
    pub max_datarate: f64,
}

/// Radio parameters shared by every deployed gateway.
///
/// Slices are indexed densely by [`SliceId`]. Receiver sensitivity is given
/// per spreading factor in dBm.
///
/// # Examples
///
/// ```
/// use u_placement::model::GatewayProfile;
///
/// let gateway = GatewayProfile::new([-130.0, -132.5, -135.0, -137.5, -140.0, -142.5])
///     .with_slice(125_000.0, 15_000.0)
///     .with_slice(250_000.0, 30_000.0);
/// assert_eq!(gateway.num_slices(), 2);
/// assert_eq!(gateway.sensitivity(7), -130.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GatewayProfile {
    slices: Vec<SliceProfile>,
    sensitivity: [f64; NUM_SF],
}

impl GatewayProfile {
    /// Creates a profile with no slices. `sensitivity[i]` is the receiver
    /// sensitivity for spreading factor `7 + i`.
    pub fn new(sensitivity: [f64; NUM_SF]) -> Self {
        Self {
            slices: Vec::new(),
            sensitivity,
        }
    }

    /// Standard EU868 profile: SX1301-class sensitivity
    /// and `num_slices` identical 125 kHz slices.
    pub fn reference(num_slices: usize) -> Self {
        let mut gateway = Self::new([-130.0, -132.5, -135.0, -137.5, -140.0, -142.5]);
        for _ in 0..num_slices {
            gateway = gateway.with_slice(125_000.0, 15_197.753_906_25);
        }
        gateway
    }

    /// Appends the next slice.
    pub fn with_slice(mut self, bandwidth: f64, max_datarate: f64) -> Self {
        self.slices.push(SliceProfile {
            bandwidth,
            max_datarate,
        });
        self
    }

    pub fn num_slices(&self) -> usize {
        self.slices.len()
    }

    pub fn slice(&self, slice: SliceId) -> Option<&SliceProfile> {
        self.slices.get(slice)
    }

    /// # Panics
    /// Panics if the slice is not defined.
    pub fn bandwidth(&self, slice: SliceId) -> f64 {
        self.slices[slice].bandwidth
    }

    /// # Panics
    /// Panics if the slice is not defined.
    pub fn max_datarate(&self, slice: SliceId) -> f64 {
        self.slices[slice].max_datarate
    }

    /// Receiver sensitivity (dBm) for spreading factor `sf`.
    pub fn sensitivity(&self, sf: u8) -> f64 {
        self.sensitivity[(sf - MIN_SF) as usize]
    }

    /// Datarate a device with spreading factor `sf` consumes on `slice`:
    /// `sf * bandwidth / 2^sf`.
    pub fn datarate(&self, sf: u8, slice: SliceId) -> f64 {
        f64::from(sf) * self.bandwidth(slice) / 2f64.powi(i32::from(sf))
    }
}
