//! Scene container for all propagation-relevant obstacles
//!
//! The scene owns two static R-trees (buildings, foliage) populated during
//! setup, the set of registered vehicles, and a lazily rebuilt vehicle tree.
//! Vehicles move continuously, so their tree is a cache: any vehicle query
//! passes the current simulation time and the cache is rebuilt when it was
//! forced (vehicles added or removed) or when the rebuild interval has
//! elapsed. Between rebuilds, vehicle queries answer from the snapshots
//! taken at the last rebuild.

use std::cell::RefCell;
use std::rc::Rc;

use rstar::RTree;
use tracing::{debug, trace};

use crate::building::Building;
use crate::foliage::Foliage;
use crate::geometry::{Point2, Segment2};
use crate::spatial::{self, VehicleEntry};
use crate::vehicle::Vehicle;

/// Default interval between vehicle tree rebuilds in seconds
const DEFAULT_REBUILD_INTERVAL_S: f64 = 1.0;

/// Result of [`Scene::find_all_in_ellipse`]: every object class inside the
/// communication ellipse.
#[derive(Debug, Default)]
pub struct ObjectsInEllipse<'a> {
    pub buildings: Vec<&'a Building>,
    pub foliage: Vec<&'a Foliage>,
    pub vehicles: Vec<Rc<Vehicle>>,
}

#[derive(Debug)]
struct VehicleTreeCache {
    tree: RTree<VehicleEntry>,
    last_rebuild_s: f64,
    rebuild_interval_s: f64,
    force_rebuild: bool,
}

/// All obstacles of one simulation run.
#[derive(Debug)]
pub struct Scene {
    buildings: RTree<Building>,
    foliage: RTree<Foliage>,
    vehicles: Vec<Rc<Vehicle>>,
    vehicle_tree: RefCell<VehicleTreeCache>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            buildings: RTree::new(),
            foliage: RTree::new(),
            vehicles: Vec::new(),
            vehicle_tree: RefCell::new(VehicleTreeCache {
                tree: RTree::new(),
                last_rebuild_s: -1.0,
                rebuild_interval_s: DEFAULT_REBUILD_INTERVAL_S,
                force_rebuild: false,
            }),
        }
    }

    /// Number of seconds a vehicle tree stays valid without a forced rebuild
    pub fn set_vehicle_tree_rebuild_interval(&mut self, seconds: f64) {
        self.vehicle_tree.borrow_mut().rebuild_interval_s = seconds;
    }

    pub fn add_building(&mut self, building: Building) {
        self.buildings.insert(building);
    }

    pub fn add_buildings(&mut self, buildings: impl IntoIterator<Item = Building>) {
        for building in buildings {
            self.buildings.insert(building);
        }
    }

    pub fn add_foliage(&mut self, foliage: Foliage) {
        self.foliage.insert(foliage);
    }

    /// Register a vehicle. Registering the same vehicle twice is a no-op.
    pub fn add_vehicle(&mut self, vehicle: Rc<Vehicle>) {
        if self.vehicles.iter().any(|v| Rc::ptr_eq(v, &vehicle)) {
            return;
        }
        self.vehicles.push(vehicle);
        self.vehicle_tree.borrow_mut().force_rebuild = true;
    }

    /// Remove a vehicle from the scene; the handle stays valid for the
    /// caller.
    pub fn remove_vehicle(&mut self, vehicle: &Rc<Vehicle>) {
        self.vehicles.retain(|v| !Rc::ptr_eq(v, vehicle));
        self.vehicle_tree.borrow_mut().force_rebuild = true;
    }

    /// Registered vehicles in insertion order
    pub fn vehicles(&self) -> &[Rc<Vehicle>] {
        &self.vehicles
    }

    /// Rebuild the vehicle tree on the next vehicle query regardless of the
    /// rebuild interval.
    pub fn force_vehicle_tree_rebuild(&self) {
        self.vehicle_tree.borrow_mut().force_rebuild = true;
    }

    pub fn intersects_any_buildings(&self, segment: &Segment2) -> bool {
        spatial::intersects_any(&self.buildings, segment)
    }

    pub fn intersects_any_foliage(&self, segment: &Segment2) -> bool {
        spatial::intersects_any(&self.foliage, segment)
    }

    pub fn intersect_buildings(&self, segment: &Segment2) -> Vec<&Building> {
        let found = spatial::find_intersecting(&self.buildings, segment);
        trace!(count = found.len(), "building intersections");
        found
    }

    pub fn intersect_foliage(&self, segment: &Segment2) -> Vec<&Foliage> {
        let found = spatial::find_intersecting(&self.foliage, segment);
        trace!(count = found.len(), "foliage intersections");
        found
    }

    /// Vehicles whose indexed snapshot intersects the segment. Refreshes the
    /// vehicle tree first if it is due at `now_s`.
    pub fn intersect_vehicles(&self, segment: &Segment2, now_s: f64) -> Vec<Rc<Vehicle>> {
        self.check_vehicle_tree(now_s);
        let cache = self.vehicle_tree.borrow();
        let found: Vec<_> = spatial::find_intersecting(&cache.tree, segment)
            .into_iter()
            .map(|entry| Rc::clone(entry.vehicle()))
            .collect();
        trace!(count = found.len(), "vehicle intersections");
        found
    }

    pub fn find_buildings_in_ellipse(&self, f1: Point2, f2: Point2, range: f64) -> Vec<&Building> {
        spatial::find_in_ellipse(&self.buildings, f1, f2, range)
    }

    pub fn find_foliage_in_ellipse(&self, f1: Point2, f2: Point2, range: f64) -> Vec<&Foliage> {
        spatial::find_in_ellipse(&self.foliage, f1, f2, range)
    }

    pub fn find_vehicles_in_ellipse(
        &self,
        f1: Point2,
        f2: Point2,
        range: f64,
        now_s: f64,
    ) -> Vec<Rc<Vehicle>> {
        self.check_vehicle_tree(now_s);
        let cache = self.vehicle_tree.borrow();
        spatial::find_in_ellipse(&cache.tree, f1, f2, range)
            .into_iter()
            .map(|entry| Rc::clone(entry.vehicle()))
            .collect()
    }

    /// Every object class inside the communication ellipse in one pass.
    pub fn find_all_in_ellipse(
        &self,
        f1: Point2,
        f2: Point2,
        range: f64,
        now_s: f64,
    ) -> ObjectsInEllipse<'_> {
        let buildings = self.find_buildings_in_ellipse(f1, f2, range);
        let foliage = self.find_foliage_in_ellipse(f1, f2, range);
        let vehicles = self.find_vehicles_in_ellipse(f1, f2, range, now_s);
        trace!(
            buildings = buildings.len(),
            foliage = foliage.len(),
            vehicles = vehicles.len(),
            "objects in ellipse"
        );
        ObjectsInEllipse {
            buildings,
            foliage,
            vehicles,
        }
    }

    pub fn find_buildings_in_range(&self, center: Point2, range: f64) -> Vec<&Building> {
        spatial::find_in_range(&self.buildings, center, range)
    }

    pub fn find_foliage_in_range(&self, center: Point2, range: f64) -> Vec<&Foliage> {
        spatial::find_in_range(&self.foliage, center, range)
    }

    pub fn find_vehicles_in_range(
        &self,
        center: Point2,
        range: f64,
        now_s: f64,
    ) -> Vec<Rc<Vehicle>> {
        self.check_vehicle_tree(now_s);
        let cache = self.vehicle_tree.borrow();
        spatial::find_in_range(&cache.tree, center, range)
            .into_iter()
            .map(|entry| Rc::clone(entry.vehicle()))
            .collect()
    }

    /// Rebuild the vehicle tree when forced or when the interval elapsed.
    fn check_vehicle_tree(&self, now_s: f64) {
        let mut cache = self.vehicle_tree.borrow_mut();
        if cache.force_rebuild || cache.last_rebuild_s + cache.rebuild_interval_s < now_s {
            debug!(
                vehicles = self.vehicles.len(),
                now_s, "rebuilding vehicle tree"
            );
            cache.tree = RTree::bulk_load(
                self.vehicles
                    .iter()
                    .map(|v| VehicleEntry::new(Rc::clone(v)))
                    .collect(),
            );
            cache.last_rebuild_s = now_s;
            cache.force_rebuild = false;
        }
    }
}
