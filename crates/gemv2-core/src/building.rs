//! Static building obstacles

use tracing::debug;

use crate::geometry::{Polygon2, Rect2};

/// Default relative permittivity for buildings (concrete)
const DEFAULT_RELATIVE_PERMITTIVITY: f64 = 4.5;

/// A single building in the scene.
///
/// The outline is canonicalized at construction; envelope and area are
/// computed once and never change. Buildings are immutable after they have
/// been inserted into a scene.
#[derive(Debug, Clone)]
pub struct Building {
    shape: Polygon2,
    bounding_box: Rect2,
    area: f64,
    relative_permittivity: f64,
}

impl Building {
    pub fn new(shape: Polygon2) -> Self {
        let bounding_box = shape.envelope();
        let area = shape.area();
        debug!(area_m2 = area, "created building");
        Self {
            shape,
            bounding_box,
            area,
            relative_permittivity: DEFAULT_RELATIVE_PERMITTIVITY,
        }
    }

    pub fn shape(&self) -> &Polygon2 {
        &self.shape
    }

    pub fn bounding_box(&self) -> Rect2 {
        self.bounding_box
    }

    /// Footprint area in square meters
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Relative permittivity of the building surface
    pub fn relative_permittivity(&self) -> f64 {
        self.relative_permittivity
    }

    /// Override the surface permittivity; call before inserting the building
    /// into a scene.
    pub fn set_relative_permittivity(&mut self, permittivity: f64) {
        self.relative_permittivity = permittivity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2;

    #[test]
    fn building_caches_envelope_and_area() {
        let building = Building::new(Polygon2::new(vec![
            Point2::new(10.0, 10.0),
            Point2::new(20.0, 10.0),
            Point2::new(20.0, 20.0),
            Point2::new(10.0, 20.0),
        ]));
        assert!((building.area() - 100.0).abs() < 1e-12);
        assert_eq!(building.bounding_box().min, Point2::new(10.0, 10.0));
        assert_eq!(building.bounding_box().max, Point2::new(20.0, 20.0));
        assert!((building.relative_permittivity() - 4.5).abs() < 1e-12);
    }

    #[test]
    fn permittivity_is_settable() {
        let mut building = Building::new(Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
        ]));
        building.set_relative_permittivity(15.0);
        assert!((building.relative_permittivity() - 15.0).abs() < 1e-12);
    }
}
