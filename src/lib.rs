//! A CPU software rasterization pipeline.
//!
//! Meshes are transformed, lit, clipped and projected to screen-space
//! triangles, then filled into an owned ARGB8888 color buffer with a 1/w
//! depth buffer. Windowing and asset loading stay with the caller: the
//! finished frame is a plain pixel slice ready for upload.
//!
//! # Quick Start
//!
//! ```no_run
//! use softras::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RenderConfig::default();
//! let mut engine = Engine::from_config(&config)?;
//! let cube = Mesh::cube();
//! let call = DrawCall::new(&cube, Transform::default(), config.draw.clone());
//! let stats = engine.render(&config.scene(), &[call])?;
//! println!("{} pixels", stats.pixels);
//! let frame: &[u32] = engine.frame_buffer();
//! # let _ = frame;
//! # Ok(())
//! # }
//! ```

pub mod camera;
pub mod clipper;
pub mod colors;
pub mod config;
pub mod engine;
pub mod light;
pub mod math;
pub mod mesh;
pub mod pipeline;
pub mod projection;
pub mod render;
pub mod scene;
pub mod texture;
pub mod transform;

// Re-export commonly needed types at crate root for convenience
pub use config::{ConfigError, DrawConfig, LightSettings, RenderConfig};
pub use engine::{
    DrawCall, DrawStats, Engine, FrameStats, RasterizerType, RenderError, RenderMode, ShadingMode,
    TextureMode,
};
pub use mesh::{Face, Mesh, MeshError, Vertex};
pub use projection::Projection;
pub use scene::Scene;
pub use texture::{FilterMode, Texture, TextureError, WrapMode};
pub use transform::Transform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use softras::prelude::*;
/// ```
pub mod prelude {
    // Scene
    pub use crate::camera::Camera;
    pub use crate::light::DirectionalLight;
    pub use crate::projection::Projection;
    pub use crate::scene::Scene;

    // Engine
    pub use crate::config::{DrawConfig, RenderConfig};
    pub use crate::engine::{
        DrawCall, DrawStats, Engine, FrameStats, RenderMode, ShadingMode, TextureMode,
    };

    // Geometry
    pub use crate::mesh::{Face, Mesh};
    pub use crate::transform::Transform;

    // Texturing
    pub use crate::texture::{FilterMode, Texture, WrapMode};

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Rendering
    pub use crate::render::RasterizerType;
}
