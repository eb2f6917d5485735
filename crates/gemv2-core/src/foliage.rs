//! Static foliage obstacles

use tracing::debug;

use crate::geometry::{Polygon2, Rect2};

/// A foliage patch in the scene: a canonicalized outline with cached
/// envelope and area, immutable once inserted.
#[derive(Debug, Clone)]
pub struct Foliage {
    shape: Polygon2,
    bounding_box: Rect2,
    area: f64,
}

impl Foliage {
    pub fn new(shape: Polygon2) -> Self {
        let bounding_box = shape.envelope();
        let area = shape.area();
        debug!(area_m2 = area, "created foliage");
        Self {
            shape,
            bounding_box,
            area,
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2;

    #[test]
    fn foliage_caches_envelope_and_area() {
        let foliage = Foliage::new(Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(0.0, 2.0),
        ]));
        assert!((foliage.area() - 8.0).abs() < 1e-12);
        assert_eq!(foliage.bounding_box().max, Point2::new(4.0, 2.0));
    }
}
