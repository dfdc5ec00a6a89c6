//! Lighting types for the renderer.

use serde::{Deserialize, Serialize};

use crate::colors::{self, Rgb};
use crate::math::vec3::Vec3;

/// A directional light plus an ambient term.
///
/// Directional lights are ideal for simulating distant light sources like the sun,
/// where all rays are effectively parallel. The light is immutable while a
/// frame is rasterized; change it between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    /// The normalized direction the light is pointing (not where it comes from).
    direction: Vec3,
    /// Diffuse color/intensity applied with the Lambert term.
    pub diffuse: Rgb,
    /// Ambient color/intensity added regardless of orientation.
    pub ambient: Rgb,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::FORWARD)
    }
}

impl DirectionalLight {
    /// Create a new white directional light pointing in the given direction.
    /// The direction will be normalized automatically.
    pub fn new(direction: Vec3) -> Self {
        DirectionalLight {
            direction: direction.normalize_or_zero(),
            diffuse: (1.0, 1.0, 1.0),
            ambient: (0.1, 0.1, 0.1),
        }
    }

    pub fn with_diffuse(mut self, diffuse: Rgb) -> Self {
        self.diffuse = diffuse;
        self
    }

    pub fn with_ambient(mut self, ambient: Rgb) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction.normalize_or_zero();
    }

    /// Lambert term in `[0.0, 1.0]`: the cosine between the surface normal
    /// and the direction toward the light.
    pub fn intensity(&self, normal: Vec3) -> f32 {
        // Negate direction: light pointing at surface = positive dot product
        (-self.direction).dot(normal.normalize_or_zero()).max(0.0)
    }

    /// Light arriving at a surface with the given normal: `ambient + diffuse * lambert`.
    pub fn illuminate(&self, normal: Vec3) -> Rgb {
        let lambert = self.intensity(normal);
        (
            self.ambient.0 + self.diffuse.0 * lambert,
            self.ambient.1 + self.diffuse.1 * lambert,
            self.ambient.2 + self.diffuse.2 * lambert,
        )
    }

    /// Lit surface color for a base material color, clamped to `[0.0, 1.0]`.
    pub fn shade(&self, base_color: u32, normal: Vec3) -> Rgb {
        let (r, g, b) = colors::unpack_color(base_color);
        let (lr, lg, lb) = self.illuminate(normal);
        (
            (r * lr).min(1.0),
            (g * lg).min(1.0),
            (b * lb).min(1.0),
        )
    }
}
