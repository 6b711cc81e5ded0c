// Geometry module
// Rigid transforms and world-space bounding volumes

pub mod bounds;
pub mod transform;

pub use bounds::{default_camera_position, instrument_bounds, world_bounds, BoundingBox};
pub use transform::Transform;
