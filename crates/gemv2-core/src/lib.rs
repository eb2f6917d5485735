//! Scene model and closed-form physics for geometry-based V2V propagation
//!
//! This crate provides the pieces a vehicular propagation engine queries:
//! 2D geometry primitives, static building and foliage obstacles, moving
//! vehicles with lazily derived footprints, R-tree backed scene queries
//! (segment intersection, communication-ellipse and circular range
//! searches), the closed-form loss models, and a WKT reader for obstacle
//! outlines.
//!
//! The scene is single-threaded by design: vehicles are shared as
//! `Rc<Vehicle>` and the vehicle index is an internal cache refreshed from
//! the simulation time passed into each vehicle query.

pub mod building;
pub mod foliage;
pub mod geometry;
pub mod physics;
pub mod scene;
pub mod spatial;
pub mod vehicle;
pub mod wkt;

pub use building::Building;
pub use foliage::Foliage;
pub use geometry::{Point2, Point3, Polygon2, Rect2, Segment2};
pub use physics::AntennaPolarization;
pub use scene::{ObjectsInEllipse, Scene};
pub use vehicle::Vehicle;
