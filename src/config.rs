//! Render configuration loaded from TOML.
//!
//! [`RenderConfig`] describes the render target and the scene defaults;
//! [`DrawConfig`] is the per-draw-call state (shading, texturing, strategy)
//! handed to [`Engine::draw`](crate::engine::Engine::draw). Every field has a
//! default, so a config file only needs the values it changes:
//!
//! ```toml
//! width = 320
//! height = 240
//!
//! [draw]
//! shading_mode = "Gouraud"
//! texture_mode = "Modulate"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::Camera;
use crate::colors::{self, Rgb};
use crate::engine::{RasterizerType, RenderMode, ShadingMode, TextureMode};
use crate::light::DirectionalLight;
use crate::math::vec3::Vec3;
use crate::projection::Projection;
use crate::scene::Scene;
use crate::texture::{FilterMode, WrapMode};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Per-draw-call pipeline state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub shading_mode: ShadingMode,
    pub texture_mode: TextureMode,
    /// Material color lit by the shading mode, ARGB8888.
    pub base_color: u32,
    pub filter: FilterMode,
    pub wrap: WrapMode,
    pub rasterizer: RasterizerType,
    pub render_mode: RenderMode,
    pub backface_culling: bool,
    /// Clip against the view volume instead of rejecting triangles that
    /// reach behind the camera.
    pub clipping: bool,
    /// Draw with vertex colors when a textured draw has no texture.
    pub texture_fallback: bool,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            shading_mode: ShadingMode::default(),
            texture_mode: TextureMode::default(),
            base_color: colors::FILL,
            filter: FilterMode::default(),
            wrap: WrapMode::default(),
            rasterizer: RasterizerType::default(),
            render_mode: RenderMode::default(),
            backface_culling: true,
            clipping: true,
            texture_fallback: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    /// Direction the light travels in world space.
    pub direction: Vec3,
    pub diffuse: Rgb,
    pub ambient: Rgb,
}

impl Default for LightSettings {
    fn default() -> Self {
        let light = DirectionalLight::default();
        Self {
            direction: light.direction(),
            diffuse: light.diffuse,
            ambient: light.ambient,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub clear_color: u32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub light: LightSettings,
    pub draw: DrawConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            width: 800,
            height: 600,
            clear_color: colors::BACKGROUND,
            fov_degrees: 45.0,
            z_near: 0.1,
            z_far: 100.0,
            camera_position: camera.position(),
            camera_target: camera.target(),
            light: LightSettings::default(),
            draw: DrawConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "render target must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if !(self.z_near > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "z_near must be positive, got {}",
                self.z_near
            )));
        }
        if !(self.z_far > self.z_near) {
            return Err(ConfigError::Invalid(format!(
                "z_far ({}) must be greater than z_near ({})",
                self.z_far, self.z_near
            )));
        }
        if !self.light.direction.is_finite() || self.light.direction.magnitude() == 0.0 {
            return Err(ConfigError::Invalid("light direction must be a non-zero vector".into()));
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn projection(&self) -> Projection {
        Projection::from_degrees(
            self.fov_degrees,
            self.aspect_ratio(),
            self.z_near,
            self.z_far,
        )
    }

    pub fn camera(&self) -> Camera {
        Camera::looking_at(self.camera_position, self.camera_target)
    }

    pub fn light(&self) -> DirectionalLight {
        DirectionalLight::new(self.light.direction)
            .with_diffuse(self.light.diffuse)
            .with_ambient(self.light.ambient)
    }

    pub fn scene(&self) -> Scene {
        Scene::new(self.camera(), self.projection(), self.light())
    }
}
