//! Look-at camera.
//!
//! # Coordinate System
//!
//! Uses a **left-handed** coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive forward (into screen)

use serde::{Deserialize, Serialize};

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

/// Camera defined by an eye position, a target point and an up hint.
///
/// The eye position doubles as the world-space viewpoint for backface
/// culling, so view and culling never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    up: Vec3,
}

impl Default for Camera {
    /// Five units back from the origin, looking at it.
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO)
    }
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            position,
            target,
            up,
        }
    }

    /// Creates a camera at `position` looking toward `target` with +Y up.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self::new(position, target, Vec3::UP)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Points the camera at a world position.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Unit vector from the eye toward the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Orbit the eye around the target about the world Y axis, keeping its
    /// distance.
    pub fn orbit_y(&mut self, angle: f32) {
        let offset = self.position - self.target;
        self.position = self.target + Mat4::rotation_y(angle).transform_direction(offset);
    }

    /// Returns the world-to-view matrix.
    ///
    /// Falls back to looking down +Z when the target coincides with the eye
    /// or the up hint is parallel to the view direction.
    pub fn view_matrix(&self) -> Mat4 {
        let forward = self.forward();
        if forward == Vec3::ZERO || self.up.cross(forward).normalize_or_zero() == Vec3::ZERO {
            return Mat4::look_at_lh(self.position, self.position + Vec3::FORWARD, Vec3::UP);
        }
        Mat4::look_at_lh(self.position, self.target, self.up)
    }
}
