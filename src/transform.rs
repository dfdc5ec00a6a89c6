//! Model transform of a mesh instance.
//!
//! A [`Transform`] places a mesh in the world: it is scaled first, then
//! rotated about X, Y and Z (in that fixed order), then translated.

use crate::math::{mat4::Mat4, vec3::Vec3};

/// Position, Euler rotation and scale with a fluent mutating API:
///
/// ```ignore
/// transform
///     .set_position_xyz(0.0, 0.0, 5.0)
///     .rotate_y(0.1)
///     .set_scale_uniform(2.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3, // Euler angles in radians about x, y, z
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    /// Translate by a delta vector.
    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.position = self.position + delta;
        self
    }

    /// Euler angles in radians.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    /// Add a delta rotation (Euler angles in radians).
    pub fn rotate(&mut self, delta: Vec3) -> &mut Self {
        self.rotation = self.rotation + delta;
        self
    }

    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.rotation.x += angle;
        self
    }

    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.rotation.y += angle;
        self
    }

    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.rotation.z += angle;
        self
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn set_scale_uniform(&mut self, s: f32) -> &mut Self {
        self.scale = Vec3::new(s, s, s);
        self
    }

    /// Rotation and scale without translation: `Rz * Ry * Rx * S`.
    fn linear_part(&self) -> Mat4 {
        Mat4::rotation_z(self.rotation.z)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_x(self.rotation.x)
            * Mat4::scaling(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Generate the model-to-world matrix.
    ///
    /// Order: Translation * RotationZ * RotationY * RotationX * Scale
    /// (scale applied first, then X, Y and Z rotations, then translation)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::translation(self.position.x, self.position.y, self.position.z) * self.linear_part()
    }

    /// Matrix for transforming normals into world space: the inverse
    /// transpose of the rotation and scale. A degenerate (zero) scale falls
    /// back to the rotation alone.
    pub fn normal_matrix(&self) -> Mat4 {
        match self.linear_part().inverse() {
            Some(inverse) => inverse.transpose(),
            None => {
                Mat4::rotation_z(self.rotation.z)
                    * Mat4::rotation_y(self.rotation.y)
                    * Mat4::rotation_x(self.rotation.x)
            }
        }
    }
}
