//! Polygon clipping against the view volume.
//!
//! Clipping runs in homogeneous clip space (after projection, before the
//! perspective divide) using the Sutherland-Hodgman algorithm.

pub mod clip_space;

pub use clip_space::{clip_polygon, ClipPlane, ClipSpacePolygon, ClipSpaceVertex};
