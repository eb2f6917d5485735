//! Closed-form propagation models
//!
//! Free-space and log-distance path loss, the two-ray ground reflection
//! E-field, and the E-field to received-power conversion. All inputs are SI
//! (meters, Hz) unless a dBm/dBi suffix says otherwise.

use std::f64::consts::PI;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Point3;

/// Speed of light in m/s
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Orientation of the antenna E-field; selects the ground reflection
/// coefficient formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AntennaPolarization {
    Horizontal,
    Vertical,
}

impl Default for AntennaPolarization {
    fn default() -> Self {
        Self::Horizontal
    }
}

#[derive(Error, Debug)]
#[error("unknown antenna polarization '{0}'")]
pub struct UnknownPolarization(String);

impl FromStr for AntennaPolarization {
    type Err = UnknownPolarization;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            other => Err(UnknownPolarization(other.to_string())),
        }
    }
}

/// Free-space path loss in dB given distance and frequency
pub fn free_space_loss(distance_m: f64, frequency_hz: f64) -> f64 {
    if distance_m <= 0.0 || frequency_hz <= 0.0 {
        return 0.0;
    }
    20.0 * (4.0 * PI * distance_m * frequency_hz / SPEED_OF_LIGHT).log10()
}

/// Log-distance path loss in dB with a 1 m reference distance
pub fn log_distance_loss(distance_m: f64, frequency_hz: f64, exponent: f64) -> f64 {
    free_space_loss(1.0, frequency_hz) + 10.0 * exponent * distance_m.log10()
}

/// Total E-field at the receiver for the two-ray ground reflection model.
///
/// Combines the direct ray with the ground-reflected ray; the result feeds
/// [`field_to_power_dbm`].
pub fn two_ray_ground_field(
    tx: Point3,
    rx: Point3,
    frequency_hz: f64,
    tx_power_dbm: f64,
    tx_gain_dbi: f64,
    polarization: AntennaPolarization,
    ground_permittivity: f64,
) -> f64 {
    let distance_2d = tx.xy().distance_to(&rx.xy());
    let d_los = (distance_2d * distance_2d + (tx.z - rx.z) * (tx.z - rx.z)).sqrt();
    let d_ground = (distance_2d * distance_2d + (tx.z + rx.z) * (tx.z + rx.z)).sqrt();

    // Incident angle at the reflection point
    let sin_theta = (tx.z + rx.z) / d_ground;
    let cos_theta = distance_2d / d_ground;

    let s = (ground_permittivity - cos_theta * cos_theta).sqrt();
    let reflection = match polarization {
        AntennaPolarization::Horizontal => (sin_theta - s) / (sin_theta + s),
        // The formulation used by the published GEMV^2 MATLAB code. The
        // literature variant divides s by the permittivity and drops off
        // faster at long range; the two are not interchangeable.
        AntennaPolarization::Vertical => {
            (-ground_permittivity * sin_theta + s) / (ground_permittivity * sin_theta + s)
        }
    };

    let tx_power_w = 10.0_f64.powf(tx_power_dbm / 10.0) / 1000.0;
    let tx_gain = 10.0_f64.powf(tx_gain_dbi / 10.0);

    // Power flux density and E-field at the 1 m reference distance
    let flux_reference = tx_power_w * tx_gain / (4.0 * PI);
    let e_reference = (flux_reference * 120.0 * PI).sqrt();

    e_reference / d_los
        + reflection
            * (e_reference / d_ground)
            * (2.0 * PI * frequency_hz * (d_los - d_ground) / SPEED_OF_LIGHT).cos()
}

/// Received power in dBm for a total E-field at the receiver antenna
pub fn field_to_power_dbm(e_field: f64, rx_gain_dbi: f64, frequency_hz: f64) -> f64 {
    let rx_gain = 10.0_f64.powf(rx_gain_dbi / 10.0);
    let wavelength = SPEED_OF_LIGHT / frequency_hz;
    let rx_power_w = e_field * e_field * rx_gain * wavelength * wavelength / (480.0 * PI * PI);
    10.0 * (rx_power_w * 1000.0).log10()
}
