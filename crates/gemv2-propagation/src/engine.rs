//! The propagation loss engine
//!
//! Classifies a transmitter-receiver link against the scene geometry,
//! applies the per-class large-scale loss model, and perturbs the result
//! with a small-scale Gaussian whose spread follows the occupancy of the
//! communication ellipse. Links beyond their class's communication range
//! yield [`NO_RECEPTION_DBM`] so downstream SNR math decides non-reception
//! without branching.

use std::cell::RefCell;
use std::rc::Rc;

use gemv2_core::geometry::{Point3, Segment2};
use gemv2_core::physics;
use gemv2_core::{Scene, Vehicle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing::trace;

use crate::config::{ConfigError, NlosbModel, NlosvModel, PropagationConfig};
use crate::link::LinkType;
use crate::mobility::{Clock, Mobility};
use crate::parameters::PropagationParameters;

/// Received power reported for links out of communication range.
///
/// The most negative finite double: any SNR computed from it stays finite
/// and far below every reception threshold.
pub const NO_RECEPTION_DBM: f64 = f64::MIN;

/// GEMV^2 propagation loss model over a shared scene.
pub struct PropagationLossModel {
    config: PropagationConfig,
    parameters: PropagationParameters,
    scene: Rc<RefCell<Scene>>,
    clock: Rc<dyn Clock>,
    rng: StdRng,
}

impl PropagationLossModel {
    /// Build an engine over the caller-owned scene. The configured vehicle
    /// tree rebuild interval is pushed into the scene here.
    pub fn new(
        config: PropagationConfig,
        parameters: PropagationParameters,
        scene: Rc<RefCell<Scene>>,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        parameters.validate()?;
        scene
            .borrow_mut()
            .set_vehicle_tree_rebuild_interval(config.vehicle_tree_rebuild_interval_s);
        Ok(Self {
            config,
            parameters,
            scene,
            clock,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    pub fn parameters(&self) -> &PropagationParameters {
        &self.parameters
    }

    /// Replace the scene. Call before the first power query.
    pub fn set_scene(&mut self, scene: Rc<RefCell<Scene>>) {
        self.scene = scene;
    }

    /// Pin the random sequence of the small-scale term. Returns the number
    /// of streams consumed.
    pub fn assign_streams(&mut self, stream: u64) -> u64 {
        self.rng = StdRng::seed_from_u64(stream);
        1
    }

    /// Received power in dBm for a transmission between two endpoints.
    pub fn rx_power(&mut self, tx_power_dbm: f64, a: &dyn Mobility, b: &dyn Mobility) -> f64 {
        let pos_a = a.position();
        let pos_b = b.position();
        let d_los = pos_a.distance_to(&pos_b);

        if d_los > self.config.max_los_range_m {
            return self.out_of_range_noise(tx_power_dbm, d_los, LinkType::Unknown);
        }

        let los = Segment2::new(pos_a.xy(), pos_b.xy());
        let involved: Vec<Rc<Vehicle>> =
            [a.vehicle(), b.vehicle()].into_iter().flatten().collect();
        let now_s = self.clock.now();

        // Classify the link and collect the ellipse occupancy in one scene
        // borrow; everything past this block works on plain numbers.
        let (link, obstructing_vehicles, vehicle_count, object_area_m2, range_gate) = {
            let scene = self.scene.borrow();

            let (link, range_gate, obstructing_vehicles) =
                if scene.intersects_any_buildings(&los) {
                    (LinkType::Nlosb, self.config.max_nlosb_range_m, 0)
                } else if scene.intersects_any_foliage(&los) {
                    // Foliage links reuse the NLOSb communication range
                    (LinkType::Nlosf, self.config.max_nlosb_range_m, 0)
                } else {
                    let mut vehicles = scene.intersect_vehicles(&los, now_s);
                    vehicles.retain(|v| !involved.iter().any(|i| Rc::ptr_eq(i, v)));
                    if vehicles.is_empty() {
                        (LinkType::Los, self.config.max_los_range_m, 0)
                    } else {
                        (LinkType::Nlosv, self.config.max_nlosv_range_m, vehicles.len())
                    }
                };
            trace!(?link, d_los_m = d_los, "classified link");

            if d_los > range_gate {
                return self.out_of_range_noise(tx_power_dbm, d_los, link);
            }

            // The large-scale term for foliage-obstructed links is not part
            // of the model; report them as out of range.
            if link == LinkType::Nlosf {
                return self.out_of_range_noise(tx_power_dbm, d_los, link);
            }

            let objects = scene.find_all_in_ellipse(pos_a.xy(), pos_b.xy(), range_gate, now_s);
            let vehicle_count = objects
                .vehicles
                .iter()
                .filter(|v| !involved.iter().any(|i| Rc::ptr_eq(i, v)))
                .count();
            let object_area_m2 = objects.buildings.iter().map(|b| b.area()).sum::<f64>()
                + objects.foliage.iter().map(|f| f.area()).sum::<f64>();

            (link, obstructing_vehicles, vehicle_count, object_area_m2, range_gate)
        };

        let large_scale_dbm =
            self.large_scale_power(tx_power_dbm, d_los, pos_a, pos_b, link, obstructing_vehicles);

        let small_scale_db = if self.config.deterministic {
            0.0
        } else {
            let fading = self.parameters.small_scale_fading(link);
            let weight = occupancy_weight(
                vehicle_count,
                object_area_m2,
                ellipse_area(d_los, range_gate),
                self.config.max_vehicle_density_per_km2,
                self.config.max_object_density_ratio,
            );
            let sigma = fading.sigma_min + 0.5 * weight * (fading.sigma_max - fading.sigma_min);
            Normal::new(0.0, sigma).unwrap().sample(&mut self.rng)
        };

        large_scale_dbm - small_scale_db
    }

    /// Deterministic mean received power for a classified, in-range link.
    fn large_scale_power(
        &self,
        tx_power_dbm: f64,
        d_los: f64,
        pos_a: Point3,
        pos_b: Point3,
        link: LinkType,
        obstructing_vehicles: usize,
    ) -> f64 {
        let gains_dbi = self.config.tx_gain_dbi + self.config.rx_gain_dbi;
        match link {
            LinkType::Los => {
                let field = physics::two_ray_ground_field(
                    pos_a,
                    pos_b,
                    self.config.frequency_hz,
                    tx_power_dbm,
                    self.config.tx_gain_dbi,
                    self.config.antenna_polarization,
                    self.config.ground_permittivity,
                );
                physics::field_to_power_dbm(field, self.config.rx_gain_dbi, self.config.frequency_hz)
            }
            LinkType::Nlosv => match self.config.nlosv_model {
                NlosvModel::Simple => {
                    let triple = self.config.nlosv_simple_loss_db;
                    let extra_db = match obstructing_vehicles {
                        1 => triple.min,
                        2 => triple.med,
                        _ => triple.max,
                    };
                    tx_power_dbm + gains_dbi
                        - (physics::free_space_loss(d_los, self.config.frequency_hz) + extra_db)
                }
                NlosvModel::Bullington | NlosvModel::MultipleKnifeEdge => {
                    unimplemented!("knife-edge NLOSv models are not ported")
                }
            },
            LinkType::Nlosb => match self.config.nlosb_model {
                NlosbModel::LogDistance => {
                    tx_power_dbm + gains_dbi
                        - physics::log_distance_loss(
                            d_los,
                            self.config.frequency_hz,
                            self.parameters.path_loss_exponent_nlosb,
                        )
                }
                NlosbModel::ReflectionDiffraction => {
                    unimplemented!("reflection-diffraction NLOSb model is not ported")
                }
            },
            LinkType::Nlosf | LinkType::Unknown => {
                unreachable!("handled before the large-scale term")
            }
        }
    }

    fn out_of_range_noise(&self, tx_power_dbm: f64, distance_m: f64, link: LinkType) -> f64 {
        trace!(tx_power_dbm, distance_m, ?link, "out of communication range");
        NO_RECEPTION_DBM
    }
}

/// Area of the communication ellipse with focal distance `d` and
/// accumulated-range bound `range`; the range gate guarantees `d <= range`.
fn ellipse_area(d: f64, range: f64) -> f64 {
    let semi_major = range / 2.0;
    let semi_minor = (semi_major * semi_major - d * d / 4.0).sqrt();
    std::f64::consts::PI * semi_major * semi_minor
}

/// Occupancy of the communication ellipse as the weight interpolating the
/// small-scale sigma between its per-class bounds. Each share saturates at
/// one.
fn occupancy_weight(
    vehicle_count: usize,
    object_area_m2: f64,
    ellipse_area_m2: f64,
    max_vehicle_density_per_km2: f64,
    max_object_density_ratio: f64,
) -> f64 {
    // At d_los == range the ellipse collapses to the zero-area segment
    // between the endpoints; it cannot contain anything, and dividing by
    // the area would turn both shares into NaN.
    if ellipse_area_m2 <= 0.0 {
        return 0.0;
    }
    let vehicle_share = (vehicle_count as f64
        / (max_vehicle_density_per_km2 * ellipse_area_m2 * 1e-6))
        .sqrt();
    let object_share = (object_area_m2 / (max_object_density_ratio * ellipse_area_m2)).sqrt();
    vehicle_share.min(1.0) + object_share.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ellipse_has_zero_weight() {
        let weight = occupancy_weight(0, 0.0, ellipse_area(100.0, 500.0), 500.0, 0.8);
        assert_eq!(weight, 0.0);
    }

    #[test]
    fn collapsed_ellipse_has_zero_weight() {
        // Endpoints at the full range: the area is exactly zero and nothing
        // can satisfy the ellipse predicate, so the weight must not
        // saturate through a division by zero.
        let area = ellipse_area(500.0, 500.0);
        assert_eq!(area, 0.0);
        assert_eq!(occupancy_weight(0, 0.0, area, 500.0, 0.8), 0.0);
        assert_eq!(occupancy_weight(3, 100.0, area, 500.0, 0.8), 0.0);
    }

    #[test]
    fn weight_is_monotone_in_occupancy() {
        let area = ellipse_area(100.0, 500.0);
        let base = occupancy_weight(2, 1000.0, area, 500.0, 0.8);
        assert!(occupancy_weight(3, 1000.0, area, 500.0, 0.8) >= base);
        assert!(occupancy_weight(2, 2000.0, area, 500.0, 0.8) >= base);
    }

    #[test]
    fn weight_saturates_at_two() {
        let area = ellipse_area(10.0, 20.0);
        let weight = occupancy_weight(1_000_000, 1e12, area, 500.0, 0.8);
        assert!((weight - 2.0).abs() < 1e-12);
    }

    #[test]
    fn ellipse_area_degenerates_with_distance() {
        // Foci together: a circle of radius range/2
        let circle = ellipse_area(0.0, 100.0);
        assert!((circle - std::f64::consts::PI * 50.0 * 50.0).abs() < 1e-9);
        // Foci at the full range: the ellipse collapses
        assert!(ellipse_area(100.0, 100.0).abs() < 1e-9);
        // In between it shrinks monotonically
        assert!(ellipse_area(50.0, 100.0) < circle);
    }
}
