//! Per-frame scene state handed to the engine by the caller.

use crate::camera::Camera;
use crate::light::DirectionalLight;
use crate::projection::Projection;

/// Camera, projection and light shared by every draw call of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scene {
    pub camera: Camera,
    pub projection: Projection,
    pub light: DirectionalLight,
}

impl Scene {
    pub fn new(camera: Camera, projection: Projection, light: DirectionalLight) -> Self {
        Self {
            camera,
            projection,
            light,
        }
    }
}
