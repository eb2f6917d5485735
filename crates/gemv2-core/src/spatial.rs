//! Spatial-index queries over scene objects
//!
//! All queries run in two stages: an envelope filter on the R-tree followed
//! by an exact geometric predicate against the entry's shape. Entries expose
//! both through [`SpatialShape`], so one set of generic queries serves
//! buildings, foliage, and vehicle snapshots alike.

use std::rc::Rc;

use rstar::{RTree, RTreeObject, AABB};

use crate::building::Building;
use crate::foliage::Foliage;
use crate::geometry::{Point2, Polygon2, Rect2, Segment2};
use crate::vehicle::Vehicle;

/// Adapter from an index entry to its envelope and exact shape.
pub trait SpatialShape {
    fn shape(&self) -> &Polygon2;
    fn bounding_box(&self) -> Rect2;
}

impl SpatialShape for Building {
    fn shape(&self) -> &Polygon2 {
        Building::shape(self)
    }

    fn bounding_box(&self) -> Rect2 {
        Building::bounding_box(self)
    }
}

impl SpatialShape for Foliage {
    fn shape(&self) -> &Polygon2 {
        Foliage::shape(self)
    }

    fn bounding_box(&self) -> Rect2 {
        Foliage::bounding_box(self)
    }
}

/// Snapshot of a vehicle taken when the vehicle tree is rebuilt.
///
/// The outline and envelope are frozen at rebuild time so queries between
/// rebuilds stay consistent with the tree, even while the vehicle itself
/// keeps moving.
#[derive(Debug, Clone)]
pub struct VehicleEntry {
    shape: Polygon2,
    bounding_box: Rect2,
    vehicle: Rc<Vehicle>,
}

impl VehicleEntry {
    pub fn new(vehicle: Rc<Vehicle>) -> Self {
        let shape = vehicle.shape().clone();
        let bounding_box = vehicle.bounding_box();
        Self {
            shape,
            bounding_box,
            vehicle,
        }
    }

    pub fn vehicle(&self) -> &Rc<Vehicle> {
        &self.vehicle
    }
}

impl SpatialShape for VehicleEntry {
    fn shape(&self) -> &Polygon2 {
        &self.shape
    }

    fn bounding_box(&self) -> Rect2 {
        self.bounding_box
    }
}

fn aabb(rect: Rect2) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min.x, rect.min.y], [rect.max.x, rect.max.y])
}

impl RTreeObject for Building {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        aabb(self.bounding_box())
    }
}

impl RTreeObject for Foliage {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        aabb(self.bounding_box())
    }
}

impl RTreeObject for VehicleEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        aabb(self.bounding_box)
    }
}

/// True if any entry's exact shape intersects the segment.
pub fn intersects_any<T>(tree: &RTree<T>, segment: &Segment2) -> bool
where
    T: RTreeObject<Envelope = AABB<[f64; 2]>> + SpatialShape,
{
    tree.locate_in_envelope_intersecting(&aabb(segment.envelope()))
        .any(|entry| entry.shape().intersects_segment(segment))
}

/// All entries whose exact shape intersects the segment.
pub fn find_intersecting<'a, T>(tree: &'a RTree<T>, segment: &Segment2) -> Vec<&'a T>
where
    T: RTreeObject<Envelope = AABB<[f64; 2]>> + SpatialShape,
{
    tree.locate_in_envelope_intersecting(&aabb(segment.envelope()))
        .filter(|entry| entry.shape().intersects_segment(segment))
        .collect()
}

/// Conservative box around the ellipse with focal points `f1`, `f2` and
/// accumulated-distance bound `range`. Wider than the ellipse proper;
/// tightness is sacrificed for cheap construction.
pub fn ellipse_bounding_box(f1: Point2, f2: Point2, range: f64) -> Rect2 {
    let padding = (range - f1.distance_to(&f2)) / 2.0;
    Rect2::new(
        Point2::new(f1.x.min(f2.x) - padding, f1.y.min(f2.y) - padding),
        Point2::new(f1.x.max(f2.x) + padding, f1.y.max(f2.y) + padding),
    )
}

/// Box around a circle at `center` with the given radius, padded
/// symmetrically on both axes.
pub fn circle_bounding_box(center: Point2, radius: f64) -> Rect2 {
    Rect2::new(
        Point2::new(center.x - radius, center.y - radius),
        Point2::new(center.x + radius, center.y + radius),
    )
}

/// All entries whose summed distance to the two focal points is below
/// `range`.
pub fn find_in_ellipse<'a, T>(tree: &'a RTree<T>, f1: Point2, f2: Point2, range: f64) -> Vec<&'a T>
where
    T: RTreeObject<Envelope = AABB<[f64; 2]>> + SpatialShape,
{
    tree.locate_in_envelope_intersecting(&aabb(ellipse_bounding_box(f1, f2, range)))
        .filter(|entry| {
            let shape = entry.shape();
            shape.distance_to_point(&f1) + shape.distance_to_point(&f2) < range
        })
        .collect()
}

/// All entries whose exact shape lies within `range` of `center`.
pub fn find_in_range<'a, T>(tree: &'a RTree<T>, center: Point2, range: f64) -> Vec<&'a T>
where
    T: RTreeObject<Envelope = AABB<[f64; 2]>> + SpatialShape,
{
    tree.locate_in_envelope_intersecting(&aabb(circle_bounding_box(center, range)))
        .filter(|entry| entry.shape().distance_to_point(&center) < range)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(cx: f64, cy: f64, half: f64) -> Polygon2 {
        Polygon2::new(vec![
            Point2::new(cx - half, cy - half),
            Point2::new(cx + half, cy - half),
            Point2::new(cx + half, cy + half),
            Point2::new(cx - half, cy + half),
        ])
    }

    fn tree_of(centers: &[(f64, f64)]) -> RTree<Building> {
        RTree::bulk_load(
            centers
                .iter()
                .map(|&(x, y)| Building::new(square(x, y, 1.0)))
                .collect(),
        )
    }

    #[test]
    fn intersects_any_matches_exact_shapes() {
        let tree = tree_of(&[(10.0, 10.0), (30.0, 10.0)]);
        let hit = Segment2::new(Point2::new(0.0, 10.0), Point2::new(15.0, 10.0));
        let miss = Segment2::new(Point2::new(0.0, 20.0), Point2::new(40.0, 20.0));
        assert!(intersects_any(&tree, &hit));
        assert!(!intersects_any(&tree, &miss));
    }

    #[test]
    fn find_intersecting_collects_all_hits() {
        let tree = tree_of(&[(10.0, 10.0), (30.0, 10.0), (50.0, 50.0)]);
        let seg = Segment2::new(Point2::new(0.0, 10.0), Point2::new(40.0, 10.0));
        assert_eq!(find_intersecting(&tree, &seg).len(), 2);
    }

    #[test]
    fn ellipse_query_uses_accumulated_distance() {
        let tree = tree_of(&[(25.0, 0.0), (100.0, 0.0)]);
        let f1 = Point2::new(0.0, 0.0);
        let f2 = Point2::new(50.0, 0.0);
        // First square: 24 + 24 = 48 < 60; second: 99 + 49 >> 60
        let found = find_in_ellipse(&tree, f1, f2, 60.0);
        assert_eq!(found.len(), 1);
        assert!((found[0].bounding_box().min.x - 24.0).abs() < 1e-12);
    }

    #[test]
    fn ellipse_membership_is_sound() {
        let tree = tree_of(&[(10.0, 5.0), (25.0, -6.0), (40.0, 3.0), (70.0, 0.0)]);
        let f1 = Point2::new(0.0, 0.0);
        let f2 = Point2::new(50.0, 0.0);
        let range = 65.0;
        for entry in find_in_ellipse(&tree, f1, f2, range) {
            let sum = entry.shape().distance_to_point(&f1) + entry.shape().distance_to_point(&f2);
            assert!(sum < range, "entry outside ellipse: {sum}");
        }
        // Completeness against a linear scan
        let brute = tree
            .iter()
            .filter(|b| {
                b.shape().distance_to_point(&f1) + b.shape().distance_to_point(&f2) < range
            })
            .count();
        assert_eq!(find_in_ellipse(&tree, f1, f2, range).len(), brute);
    }

    #[test]
    fn range_query_pads_symmetrically() {
        let bbox = circle_bounding_box(Point2::new(5.0, -3.0), 2.0);
        assert_eq!(bbox.min, Point2::new(3.0, -5.0));
        assert_eq!(bbox.max, Point2::new(7.0, -1.0));

        let tree = tree_of(&[(0.0, 0.0), (10.0, 0.0)]);
        let found = find_in_range(&tree, Point2::new(3.0, 0.0), 3.0);
        assert_eq!(found.len(), 1);
    }
}
