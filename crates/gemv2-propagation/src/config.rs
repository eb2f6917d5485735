//! Engine configuration
//!
//! Every option is optional in serialized form and falls back to the model
//! defaults: 5.9 GHz carrier, horizontal polarization, the GEMV^2
//! communication ranges, the simple NLOSv model, and log-distance NLOSb.

use std::str::FromStr;

use gemv2_core::physics::AntennaPolarization;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("small-scale fading bounds inverted: min {min} > max {max}")]
    InvertedFading { min: f64, max: f64 },

    #[error("unknown NLOSv model '{0}'")]
    UnknownNlosvModel(String),

    #[error("unknown NLOSb model '{0}'")]
    UnknownNlosbModel(String),
}

/// Loss model for links obstructed by vehicles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NlosvModel {
    /// Attenuation from the number of obstructing vehicles
    Simple,
    /// Bullington knife-edge diffraction (declared, not implemented)
    Bullington,
    /// ITU-R multiple knife-edge diffraction (declared, not implemented)
    MultipleKnifeEdge,
}

impl FromStr for NlosvModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "bullington" => Ok(Self::Bullington),
            "multiple-knife-edge" => Ok(Self::MultipleKnifeEdge),
            other => Err(ConfigError::UnknownNlosvModel(other.to_string())),
        }
    }
}

/// Loss model for links obstructed by buildings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NlosbModel {
    /// Log-distance path loss
    LogDistance,
    /// Reflections and diffractions (declared, not implemented)
    ReflectionDiffraction,
}

impl FromStr for NlosbModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "log-distance" => Ok(Self::LogDistance),
            "reflection-diffraction" => Ok(Self::ReflectionDiffraction),
            other => Err(ConfigError::UnknownNlosbModel(other.to_string())),
        }
    }
}

/// A min/median/max triple of dB values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMedMax {
    pub min: f64,
    pub med: f64,
    pub max: f64,
}

impl MinMedMax {
    pub const fn new(min: f64, med: f64, max: f64) -> Self {
        Self { min, med, max }
    }
}

/// Configuration of the propagation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    /// Carrier frequency in Hz
    pub frequency_hz: f64,
    pub antenna_polarization: AntennaPolarization,
    /// Transmitter antenna gain in dBi
    pub tx_gain_dbi: f64,
    /// Receiver antenna gain in dBi
    pub rx_gain_dbi: f64,
    /// Relative permittivity of the ground for the two-ray reflection
    pub ground_permittivity: f64,
    /// Maximum LOS communication range in meters
    pub max_los_range_m: f64,
    /// Maximum NLOSv communication range in meters
    pub max_nlosv_range_m: f64,
    /// Maximum NLOSb communication range in meters; also gates NLOSf links
    pub max_nlosb_range_m: f64,
    pub nlosv_model: NlosvModel,
    pub nlosb_model: NlosbModel,
    /// Extra loss for one / two / three-or-more obstructing vehicles with
    /// the simple NLOSv model, dB
    pub nlosv_simple_loss_db: MinMedMax,
    /// Vehicle density that saturates the small-scale occupancy weight
    pub max_vehicle_density_per_km2: f64,
    /// Static-object area ratio that saturates the small-scale occupancy
    /// weight
    pub max_object_density_ratio: f64,
    /// Seconds the vehicle tree stays valid without a forced rebuild
    pub vehicle_tree_rebuild_interval_s: f64,
    /// Suppress the random small-scale term
    pub deterministic: bool,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 5.9e9,
            antenna_polarization: AntennaPolarization::Horizontal,
            tx_gain_dbi: 0.0,
            rx_gain_dbi: 0.0,
            // Value from the GEMV^2 paper; literature suggests about 15 for
            // solid ground
            ground_permittivity: 1.003,
            max_los_range_m: 1000.0,
            max_nlosv_range_m: 500.0,
            max_nlosb_range_m: 300.0,
            nlosv_model: NlosvModel::Simple,
            nlosb_model: NlosbModel::LogDistance,
            nlosv_simple_loss_db: MinMedMax::new(2.0, 6.0, 10.0),
            max_vehicle_density_per_km2: 500.0,
            max_object_density_ratio: 0.8,
            vehicle_tree_rebuild_interval_s: 1.0,
            deterministic: false,
        }
    }
}

impl PropagationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("frequency_hz", self.frequency_hz),
            ("ground_permittivity", self.ground_permittivity),
            ("max_los_range_m", self.max_los_range_m),
            ("max_nlosv_range_m", self.max_nlosv_range_m),
            ("max_nlosb_range_m", self.max_nlosb_range_m),
            (
                "max_vehicle_density_per_km2",
                self.max_vehicle_density_per_km2,
            ),
            ("max_object_density_ratio", self.max_object_density_ratio),
            (
                "vehicle_tree_rebuild_interval_s",
                self.vehicle_tree_rebuild_interval_s,
            ),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = PropagationConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.frequency_hz - 5.9e9).abs() < 1.0);
        assert_eq!(config.nlosv_model, NlosvModel::Simple);
        assert_eq!(config.nlosb_model, NlosbModel::LogDistance);
        assert!(!config.deterministic);
    }

    #[test]
    fn nonpositive_values_are_rejected() {
        let config = PropagationConfig {
            max_los_range_m: 0.0,
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::NotPositive { field, .. }) => assert_eq!(field, "max_los_range_m"),
            other => panic!("expected NotPositive, got {other:?}"),
        }
    }

    #[test]
    fn model_names_parse() {
        assert_eq!("simple".parse::<NlosvModel>().unwrap(), NlosvModel::Simple);
        assert_eq!(
            "multiple-knife-edge".parse::<NlosvModel>().unwrap(),
            NlosvModel::MultipleKnifeEdge
        );
        assert_eq!(
            "log-distance".parse::<NlosbModel>().unwrap(),
            NlosbModel::LogDistance
        );
        assert!(matches!(
            "fancy".parse::<NlosvModel>(),
            Err(ConfigError::UnknownNlosvModel(name)) if name == "fancy"
        ));
        assert!(matches!(
            "ray-tracing".parse::<NlosbModel>(),
            Err(ConfigError::UnknownNlosbModel(_))
        ));
    }
}
