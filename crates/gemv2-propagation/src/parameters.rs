//! V2V channel parameters
//!
//! Default values follow the measurements described in "Geometry-Based
//! Vehicle-to-Vehicle Channel Modeling for Large-Scale Simulation" by Boban,
//! Barros, and Tonguz.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::link::LinkType;

/// Small-scale fading bounds for one link class, dB
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FadingRange {
    pub sigma_min: f64,
    pub sigma_max: f64,
}

impl FadingRange {
    pub const fn new(sigma_min: f64, sigma_max: f64) -> Self {
        Self {
            sigma_min,
            sigma_max,
        }
    }
}

/// Tuning knobs of the V2V channel: path-loss exponents for the obstructed
/// classes and per-class small-scale fading bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationParameters {
    pub path_loss_exponent_nlosb: f64,
    pub path_loss_exponent_nlosf: f64,
    pub fading_los: FadingRange,
    pub fading_nlosv: FadingRange,
    pub fading_nlosb: FadingRange,
    pub fading_nlosf: FadingRange,
}

impl Default for PropagationParameters {
    fn default() -> Self {
        Self {
            path_loss_exponent_nlosb: 2.9,
            path_loss_exponent_nlosf: 2.7,
            fading_los: FadingRange::new(3.3, 5.2),
            fading_nlosv: FadingRange::new(3.8, 5.3),
            fading_nlosb: FadingRange::new(4.1, 6.8),
            fading_nlosf: FadingRange::new(4.1, 6.8),
        }
    }
}

impl PropagationParameters {
    /// Fading bounds for a classified link. Asking for an unclassified link
    /// is a programming error.
    pub fn small_scale_fading(&self, link: LinkType) -> FadingRange {
        match link {
            LinkType::Los => self.fading_los,
            LinkType::Nlosv => self.fading_nlosv,
            LinkType::Nlosb => self.fading_nlosb,
            LinkType::Nlosf => self.fading_nlosf,
            LinkType::Unknown => panic!("no fading parameters for unclassified links"),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for fading in [
            self.fading_los,
            self.fading_nlosv,
            self.fading_nlosb,
            self.fading_nlosf,
        ] {
            if fading.sigma_min > fading.sigma_max {
                return Err(ConfigError::InvertedFading {
                    min: fading.sigma_min,
                    max: fading.sigma_max,
                });
            }
            if fading.sigma_min < 0.0 {
                return Err(ConfigError::NotPositive {
                    field: "sigma_min",
                    value: fading.sigma_min,
                });
            }
        }
        Ok(())
    }
}
