//! Mobile vehicle obstacles
//!
//! A vehicle is a rectangular footprint at the origin plus a mutable pose
//! (position and compass heading). The transformed outline and its envelope
//! are derived lazily: pose mutations invalidate a cached snapshot, and the
//! next reader rebuilds it, so the transform runs at most once per mutation
//! no matter how many queries follow.

use std::cell::{Cell, Ref, RefCell};

use tracing::trace;

use crate::geometry::{Point2, Point3, Polygon2, Rect2};

/// Default relative permittivity for vehicles (mix of metal, glass, ...)
const DEFAULT_RELATIVE_PERMITTIVITY: f64 = 6.0;

#[derive(Debug, Clone)]
struct ShapeSnapshot {
    shape: Polygon2,
    bounding_box: Rect2,
}

/// A vehicle in the scene.
///
/// Vehicles are shared between the caller (which drives their pose) and the
/// scene (which indexes them); hand them around as `Rc<Vehicle>`. All
/// mutation goes through `&self` so a shared handle is enough.
#[derive(Debug)]
pub struct Vehicle {
    height: f64,
    relative_permittivity: Cell<f64>,
    position: Cell<Point3>,
    heading_deg: Cell<f64>,
    initial_shape: Polygon2,
    current: RefCell<Option<ShapeSnapshot>>,
}

impl Vehicle {
    /// Rectangular vehicle centered at the origin, length along the north
    /// axis, in meters.
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        let shape = Polygon2::new(vec![
            Point2::new(-width / 2.0, -length / 2.0),
            Point2::new(-width / 2.0, length / 2.0),
            Point2::new(width / 2.0, length / 2.0),
            Point2::new(width / 2.0, -length / 2.0),
        ]);
        Self::from_shape(shape, height)
    }

    /// Vehicle with an arbitrary footprint given at the origin.
    pub fn from_shape(shape: Polygon2, height: f64) -> Self {
        Self {
            height,
            relative_permittivity: Cell::new(DEFAULT_RELATIVE_PERMITTIVITY),
            position: Cell::new(Point3::new(0.0, 0.0, 0.0)),
            heading_deg: Cell::new(0.0),
            initial_shape: shape,
            current: RefCell::new(None),
        }
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn position(&self) -> Point3 {
        self.position.get()
    }

    pub fn set_position(&self, position: Point3) {
        self.position.set(position);
        self.current.take();
    }

    /// Heading in degrees clockwise from north
    pub fn heading(&self) -> f64 {
        self.heading_deg.get()
    }

    pub fn set_heading(&self, degrees: f64) {
        self.heading_deg.set(degrees);
        self.current.take();
    }

    pub fn relative_permittivity(&self) -> f64 {
        self.relative_permittivity.get()
    }

    pub fn set_relative_permittivity(&self, permittivity: f64) {
        self.relative_permittivity.set(permittivity);
    }

    /// Footprint at the current pose
    pub fn shape(&self) -> Ref<'_, Polygon2> {
        Ref::map(self.snapshot(), |s| &s.shape)
    }

    /// Envelope of the footprint at the current pose
    pub fn bounding_box(&self) -> Rect2 {
        self.snapshot().bounding_box
    }

    fn snapshot(&self) -> Ref<'_, ShapeSnapshot> {
        if self.current.borrow().is_none() {
            let position = self.position.get();
            let shape = self
                .initial_shape
                .rotated(self.heading_deg.get())
                .translated(position.x, position.y);
            let bounding_box = shape.envelope();
            trace!(?bounding_box, "updated vehicle shape");
            *self.current.borrow_mut() = Some(ShapeSnapshot {
                shape,
                bounding_box,
            });
        }
        Ref::map(self.current.borrow(), |c| {
            c.as_ref().expect("snapshot rebuilt above")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_at_origin_heading_north() {
        let vehicle = Vehicle::new(5.0, 2.0, 1.5);
        let bbox = vehicle.bounding_box();
        assert_eq!(bbox.min, Point2::new(-1.0, -2.5));
        assert_eq!(bbox.max, Point2::new(1.0, 2.5));
        assert!((vehicle.relative_permittivity() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn heading_rotates_footprint() {
        let vehicle = Vehicle::new(5.0, 2.0, 1.5);
        vehicle.set_heading(90.0);
        let bbox = vehicle.bounding_box();
        // Long axis now east-west
        assert!((bbox.max.x - 2.5).abs() < 1e-9);
        assert!((bbox.max.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn position_translates_footprint() {
        let vehicle = Vehicle::new(4.0, 2.0, 1.5);
        vehicle.set_position(Point3::new(50.0, 10.0, 0.0));
        let bbox = vehicle.bounding_box();
        assert_eq!(bbox.min, Point2::new(49.0, 8.0));
        assert_eq!(bbox.max, Point2::new(51.0, 12.0));
    }

    #[test]
    fn snapshot_tracks_latest_pose() {
        let vehicle = Vehicle::new(4.0, 2.0, 1.5);
        vehicle.set_position(Point3::new(10.0, 0.0, 0.0));
        let first = vehicle.bounding_box();
        vehicle.set_position(Point3::new(20.0, 0.0, 0.0));
        let second = vehicle.bounding_box();
        assert!((second.min.x - first.min.x - 10.0).abs() < 1e-12);
    }
}
