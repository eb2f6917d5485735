//! 2D geometry primitives for the scene model
//!
//! Points, line segments, axis-aligned boxes, and simple polygons, together
//! with the predicates the propagation queries rely on: segment intersection
//! (including collinear overlap), point-in-polygon, point-to-shape distance,
//! area, envelope, rotation, and translation.

use serde::{Deserialize, Serialize};

/// A point in the horizontal plane, meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point in meters
    pub fn distance_to(&self, other: &Point2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A position in 3D space, meters; z is height above ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another position in meters
    pub fn distance_to(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Projection onto the horizontal plane
    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// An oriented 2D line segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment2 {
    pub a: Point2,
    pub b: Point2,
}

impl Segment2 {
    pub fn new(a: Point2, b: Point2) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance_to(&self.b)
    }

    /// Axis-aligned bounding box of the segment
    pub fn envelope(&self) -> Rect2 {
        Rect2::from_corners(self.a, self.b)
    }

    /// Segment-segment intersection, including endpoint touches and
    /// collinear overlap.
    pub fn intersects(&self, other: &Segment2) -> bool {
        let o1 = orientation(&self.a, &self.b, &other.a);
        let o2 = orientation(&self.a, &self.b, &other.b);
        let o3 = orientation(&other.a, &other.b, &self.a);
        let o4 = orientation(&other.a, &other.b, &self.b);

        if o1 != o2 && o3 != o4 {
            return true;
        }

        (o1 == 0 && on_collinear_segment(&self.a, &other.a, &self.b))
            || (o2 == 0 && on_collinear_segment(&self.a, &other.b, &self.b))
            || (o3 == 0 && on_collinear_segment(&other.a, &self.a, &other.b))
            || (o4 == 0 && on_collinear_segment(&other.a, &self.b, &other.b))
    }

    /// Distance from the segment to a point, clamping the projection to the
    /// segment ends.
    pub fn distance_to_point(&self, p: &Point2) -> f64 {
        let dx = self.b.x - self.a.x;
        let dy = self.b.y - self.a.y;
        let len2 = dx * dx + dy * dy;
        if len2 == 0.0 {
            return self.a.distance_to(p);
        }
        let t = ((p.x - self.a.x) * dx + (p.y - self.a.y) * dy) / len2;
        let t = t.clamp(0.0, 1.0);
        let closest = Point2::new(self.a.x + t * dx, self.a.y + t * dy);
        closest.distance_to(p)
    }
}

/// Orientation of the ordered triplet (a, b, c): 1 clockwise, -1
/// counter-clockwise, 0 collinear.
fn orientation(a: &Point2, b: &Point2, c: &Point2) -> i32 {
    let val = (b.y - a.y) * (c.x - b.x) - (b.x - a.x) * (c.y - b.y);
    if val > 0.0 {
        1
    } else if val < 0.0 {
        -1
    } else {
        0
    }
}

/// True if b lies on the segment a-c, assuming the three points collinear.
fn on_collinear_segment(a: &Point2, b: &Point2, c: &Point2) -> bool {
    b.x >= a.x.min(c.x) && b.x <= a.x.max(c.x) && b.y >= a.y.min(c.y) && b.y <= a.y.max(c.y)
}

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect2 {
    pub min: Point2,
    pub max: Point2,
}

impl Rect2 {
    /// Build from already-ordered corners; min must not exceed max per axis.
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// Build from two arbitrary corners, normalizing the ordering.
    pub fn from_corners(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn contains_point(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// A simple polygon given by its outer ring.
///
/// Construction canonicalizes the ring: it is closed (first point repeated
/// at the end) and wound counter-clockwise, so the signed area is never
/// negative. Canonicalization is idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon2 {
    points: Vec<Point2>,
}

impl Polygon2 {
    pub fn new(points: Vec<Point2>) -> Self {
        Self {
            points: canonicalize(points),
        }
    }

    /// The closed ring, counter-clockwise
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Edges of the ring in order
    pub fn edges(&self) -> impl Iterator<Item = Segment2> + '_ {
        self.points
            .windows(2)
            .map(|pair| Segment2::new(pair[0], pair[1]))
    }

    /// Enclosed area in square meters
    pub fn area(&self) -> f64 {
        signed_area(&self.points)
    }

    /// Axis-aligned bounding box
    pub fn envelope(&self) -> Rect2 {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Rect2::new(min, max)
    }

    /// Even-odd (ray casting) point-in-polygon test. Points exactly on the
    /// boundary count as inside.
    pub fn contains_point(&self, p: &Point2) -> bool {
        let mut inside = false;
        for edge in self.edges() {
            if edge.distance_to_point(p) == 0.0 {
                return true;
            }
            let (a, b) = (edge.a, edge.b);
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// True if the segment crosses the boundary or lies inside the polygon.
    pub fn intersects_segment(&self, seg: &Segment2) -> bool {
        self.edges().any(|edge| edge.intersects(seg))
            || self.contains_point(&seg.a)
            || self.contains_point(&seg.b)
    }

    /// Distance from the polygon to a point: zero for points inside or on
    /// the boundary, otherwise the distance to the nearest edge.
    pub fn distance_to_point(&self, p: &Point2) -> f64 {
        if self.contains_point(p) {
            return 0.0;
        }
        self.edges()
            .map(|edge| edge.distance_to_point(p))
            .fold(f64::INFINITY, f64::min)
    }

    /// Clockwise rotation about the origin, degrees. Matches compass
    /// headings: rotating north-pointing geometry by 90 makes it point east.
    pub fn rotated(&self, degrees: f64) -> Polygon2 {
        let rad = degrees.to_radians();
        let (sin, cos) = (rad.sin(), rad.cos());
        Polygon2 {
            points: self
                .points
                .iter()
                .map(|p| Point2::new(p.x * cos + p.y * sin, -p.x * sin + p.y * cos))
                .collect(),
        }
    }

    /// Translation by (dx, dy)
    pub fn translated(&self, dx: f64, dy: f64) -> Polygon2 {
        Polygon2 {
            points: self
                .points
                .iter()
                .map(|p| Point2::new(p.x + dx, p.y + dy))
                .collect(),
        }
    }
}

/// Close the ring and orient it counter-clockwise.
fn canonicalize(mut points: Vec<Point2>) -> Vec<Point2> {
    if points.is_empty() {
        return points;
    }
    if points.first() != points.last() {
        points.push(points[0]);
    }
    if signed_area(&points) < 0.0 {
        points.reverse();
    }
    points
}

/// Shoelace area over a closed ring; positive for counter-clockwise winding.
fn signed_area(ring: &[Point2]) -> f64 {
    0.5 * ring
        .windows(2)
        .map(|pair| pair[0].x * pair[1].y - pair[1].x * pair[0].y)
        .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn unit_square() -> Polygon2 {
        Polygon2::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)])
    }

    #[test]
    fn canonicalization_closes_and_orients_ccw() {
        // Clockwise, open ring
        let poly = Polygon2::new(vec![p(0.0, 0.0), p(0.0, 2.0), p(2.0, 2.0), p(2.0, 0.0)]);
        assert_eq!(poly.points().first(), poly.points().last());
        assert!(poly.area() > 0.0);
        assert!((poly.area() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let once = unit_square();
        let twice = Polygon2::new(once.points().to_vec());
        assert_eq!(once, twice);
    }

    #[test]
    fn segment_intersection_cases() {
        let crossing = Segment2::new(p(0.0, 0.0), p(10.0, 10.0));
        assert!(crossing.intersects(&Segment2::new(p(0.0, 10.0), p(10.0, 0.0))));

        // Collinear overlap
        let base = Segment2::new(p(0.0, 0.0), p(10.0, 0.0));
        assert!(base.intersects(&Segment2::new(p(5.0, 0.0), p(15.0, 0.0))));

        // Disjoint collinear
        assert!(!base.intersects(&Segment2::new(p(11.0, 0.0), p(15.0, 0.0))));

        // Endpoint touch
        assert!(base.intersects(&Segment2::new(p(10.0, 0.0), p(10.0, 5.0))));
    }

    #[test]
    fn segment_point_distance() {
        let seg = Segment2::new(p(0.0, 0.0), p(10.0, 0.0));
        assert!((seg.distance_to_point(&p(5.0, 3.0)) - 3.0).abs() < 1e-12);
        // Beyond the end, distance is to the endpoint
        assert!((seg.distance_to_point(&p(13.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn polygon_contains_point() {
        let poly = unit_square();
        assert!(poly.contains_point(&p(0.5, 0.5)));
        assert!(poly.contains_point(&p(0.0, 0.5)));
        assert!(!poly.contains_point(&p(1.5, 0.5)));
        assert!(!poly.contains_point(&p(-0.1, 0.5)));
    }

    #[test]
    fn polygon_segment_intersection() {
        let poly = unit_square();
        // Crossing through
        assert!(poly.intersects_segment(&Segment2::new(p(-1.0, 0.5), p(2.0, 0.5))));
        // Fully inside
        assert!(poly.intersects_segment(&Segment2::new(p(0.2, 0.2), p(0.8, 0.8))));
        // Fully outside
        assert!(!poly.intersects_segment(&Segment2::new(p(2.0, 2.0), p(3.0, 3.0))));
    }

    #[test]
    fn polygon_distance_to_point() {
        let poly = unit_square();
        assert_eq!(poly.distance_to_point(&p(0.5, 0.5)), 0.0);
        assert!((poly.distance_to_point(&p(2.0, 0.5)) - 1.0).abs() < 1e-12);
        // Diagonal from a corner
        let d = poly.distance_to_point(&p(2.0, 2.0));
        assert!((d - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn polygon_envelope() {
        let poly = Polygon2::new(vec![p(3.0, 1.0), p(5.0, 4.0), p(2.0, 6.0)]);
        let env = poly.envelope();
        assert_eq!(env.min, p(2.0, 1.0));
        assert_eq!(env.max, p(5.0, 6.0));
    }

    #[test]
    fn rotation_follows_compass_heading() {
        // A marker on the north axis rotated by a 90 degree heading points east.
        let poly = Polygon2::new(vec![p(0.0, 0.0), p(-0.1, 1.0), p(0.1, 1.0)]);
        let rotated = poly.rotated(90.0);
        let env = rotated.envelope();
        assert!((env.max.x - 1.0).abs() < 1e-12);
        assert!(env.max.y < 0.2);
    }

    #[test]
    fn translation_shifts_envelope() {
        let poly = unit_square().translated(10.0, -5.0);
        let env = poly.envelope();
        assert_eq!(env.min, p(10.0, -5.0));
        assert_eq!(env.max, p(11.0, -4.0));
    }

    #[test]
    fn rect_from_corners_normalizes() {
        let r = Rect2::from_corners(p(5.0, -1.0), p(2.0, 3.0));
        assert_eq!(r.min, p(2.0, -1.0));
        assert_eq!(r.max, p(5.0, 3.0));
        assert!(r.contains_point(&p(3.0, 0.0)));
        assert!(!r.contains_point(&p(6.0, 0.0)));
    }
}
