//! Collaborator traits of the engine
//!
//! The engine does not know where positions or time come from; the host
//! simulation provides both. A [`Mobility`] is one link endpoint: a
//! position plus, optionally, the scene vehicle it is mounted on so the
//! engine can ignore that vehicle as an obstruction of its own link. A
//! [`Clock`] supplies the simulation time that drives the vehicle-tree
//! refresh.

use std::cell::Cell;
use std::rc::Rc;

use gemv2_core::geometry::Point3;
use gemv2_core::Vehicle;

/// One endpoint of a radio link.
pub trait Mobility {
    /// Current position in meters
    fn position(&self) -> Point3;

    /// Scene vehicle carrying this endpoint, if any. The caller keeps the
    /// vehicle pose in sync with the mobility position.
    fn vehicle(&self) -> Option<Rc<Vehicle>> {
        None
    }
}

/// Simulation time source in seconds.
pub trait Clock {
    fn now(&self) -> f64;
}

/// An endpoint pinned to a settable position, optionally mounted on a
/// vehicle. Covers stationary roadside units and externally driven nodes.
#[derive(Debug)]
pub struct ConstantPositionMobility {
    position: Cell<Point3>,
    vehicle: Option<Rc<Vehicle>>,
}

impl ConstantPositionMobility {
    pub fn new(position: Point3) -> Self {
        Self {
            position: Cell::new(position),
            vehicle: None,
        }
    }

    pub fn with_vehicle(position: Point3, vehicle: Rc<Vehicle>) -> Self {
        Self {
            position: Cell::new(position),
            vehicle: Some(vehicle),
        }
    }

    pub fn set_position(&self, position: Point3) {
        self.position.set(position);
    }
}

impl Mobility for ConstantPositionMobility {
    fn position(&self) -> Point3 {
        self.position.get()
    }

    fn vehicle(&self) -> Option<Rc<Vehicle>> {
        self.vehicle.clone()
    }
}

/// A clock advanced by hand; the usual time source in tests and scripted
/// runs.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_s: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_s: f64) -> Self {
        Self {
            now_s: Cell::new(start_s),
        }
    }

    pub fn advance(&self, seconds: f64) {
        self.now_s.set(self.now_s.get() + seconds);
    }

    pub fn set(&self, seconds: f64) {
        self.now_s.set(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now_s.get()
    }
}
