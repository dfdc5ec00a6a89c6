//! Core rendering engine.
//!
//! The [`Engine`] struct is the main entry point for the renderer. It owns the
//! render target and runs each draw call through the pipeline: the transform
//! stage turns mesh faces into screen-space triangles, the configured
//! rasterizer fills them and the wireframe/vertex overlays go on top.
//!
//! Nothing here is global: every draw call carries its own [`DrawConfig`], so
//! two draws in the same frame may use different shading, texturing or
//! rasterization strategies.

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::colors;
use crate::config::{DrawConfig, RenderConfig};
use crate::mesh::Mesh;
use crate::pipeline::assemble_triangles;
use crate::render::{Rasterizer, RasterizerDispatcher, Renderer, Surface};
use crate::scene::Scene;
use crate::texture::{Texture, TextureBinding};
use crate::transform::Transform;

pub use crate::render::RasterizerType;

/// How vertex colors are lit before rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadingMode {
    /// Unlit base color.
    None,
    /// One light evaluation per face.
    #[default]
    Flat,
    /// Light evaluated per vertex and interpolated across the face.
    Gouraud,
}

impl fmt::Display for ShadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShadingMode::None => write!(f, "None"),
            ShadingMode::Flat => write!(f, "Flat"),
            ShadingMode::Gouraud => write!(f, "Gouraud"),
        }
    }
}

/// How a bound texture contributes to the final pixel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextureMode {
    /// Vertex colors only.
    #[default]
    None,
    /// Texel color replaces the lit color.
    Replace,
    /// Texel color multiplied by the lit color.
    Modulate,
}

impl fmt::Display for TextureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureMode::None => write!(f, "None"),
            TextureMode::Replace => write!(f, "Replace"),
            TextureMode::Modulate => write!(f, "Modulate"),
        }
    }
}

/// Rendering mode presets.
///
/// Wireframe and vertex overlays are depth tested against the filled
/// geometry but never write the depth buffer, so it only ever holds the
/// nearest filled 1/w.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    /// Wireframe only
    Wireframe,
    /// Wireframe + vertices
    WireframeVertices,
    /// Filled + wireframe
    FilledWireframe,
    /// Filled + wireframe + vertices
    FilledWireframeVertices,
    /// Filled only
    #[default]
    Filled,
}

impl RenderMode {
    /// Which layers to draw: `(filled, wireframe, vertices)`.
    pub fn layers(self) -> (bool, bool, bool) {
        match self {
            RenderMode::Wireframe => (false, true, false),
            RenderMode::WireframeVertices => (false, true, true),
            RenderMode::FilledWireframe => (true, true, false),
            RenderMode::FilledWireframeVertices => (true, true, true),
            RenderMode::Filled => (true, false, false),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Wireframe => write!(f, "Wireframe"),
            RenderMode::WireframeVertices => write!(f, "WireframeVertices"),
            RenderMode::FilledWireframe => write!(f, "FilledWireframe"),
            RenderMode::FilledWireframeVertices => write!(f, "FilledWireframeVertices"),
            RenderMode::Filled => write!(f, "Filled"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid render target dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("{buffer} buffer holds {len} entries, expected {width}x{height}")]
    BufferMismatch {
        buffer: &'static str,
        len: usize,
        width: u32,
        height: u32,
    },

    #[error("texture mode {mode} requires a bound texture")]
    MissingTexture { mode: TextureMode },
}

/// Counters for a single draw call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Faces read from the mesh.
    pub faces: usize,
    /// Faces rejected by backface culling.
    pub culled: usize,
    /// Faces entirely outside the view volume, or behind the camera when
    /// clipping is disabled.
    pub clipped_away: usize,
    /// Faces that survived clipping but projected to zero area.
    pub degenerate: usize,
    /// Screen-space triangles handed to the rasterizer.
    pub triangles: usize,
    /// Pixels written by the fill pass.
    pub pixels: u64,
    /// The draw asked for a texture it did not get and used vertex colors.
    pub texture_fallback: bool,
}

/// Totals over every draw call of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draws: usize,
    pub faces: usize,
    pub culled: usize,
    pub clipped_away: usize,
    pub degenerate: usize,
    pub triangles: usize,
    pub pixels: u64,
    pub texture_fallbacks: usize,
}

impl FrameStats {
    pub fn record(&mut self, draw: &DrawStats) {
        self.draws += 1;
        self.faces += draw.faces;
        self.culled += draw.culled;
        self.clipped_away += draw.clipped_away;
        self.degenerate += draw.degenerate;
        self.triangles += draw.triangles;
        self.pixels += draw.pixels;
        self.texture_fallbacks += draw.texture_fallback as usize;
    }
}

/// One mesh instance to draw in a frame.
#[derive(Debug, Clone)]
pub struct DrawCall<'a> {
    pub mesh: &'a Mesh,
    pub transform: Transform,
    pub config: DrawConfig,
    pub texture: Option<&'a Texture>,
}

impl<'a> DrawCall<'a> {
    pub fn new(mesh: &'a Mesh, transform: Transform, config: DrawConfig) -> Self {
        Self {
            mesh,
            transform,
            config,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: &'a Texture) -> Self {
        self.texture = Some(texture);
        self
    }
}

pub struct Engine {
    renderer: Renderer,
    clear_color: u32,
}

impl Engine {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Ok(Self {
            renderer: Renderer::new(width, height)?,
            clear_color: colors::BACKGROUND,
        })
    }

    /// Render target size and clear color from a loaded configuration.
    pub fn from_config(config: &RenderConfig) -> Result<Self, RenderError> {
        let mut engine = Self::new(config.width, config.height)?;
        engine.clear_color = config.clear_color;
        engine.begin_frame();
        Ok(engine)
    }

    /// Resize the render target. Both buffers are reallocated and cleared.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.renderer.resize(width, height)?;
        self.begin_frame();
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.renderer.width()
    }

    pub fn height(&self) -> u32 {
        self.renderer.height()
    }

    pub fn set_clear_color(&mut self, color: u32) {
        self.clear_color = color;
    }

    pub fn clear_color(&self) -> u32 {
        self.clear_color
    }

    /// Clear color and depth ahead of a new frame.
    pub fn begin_frame(&mut self) {
        self.renderer.clear(self.clear_color);
        self.renderer.clear_depth();
    }

    /// Transform, rasterize and overlay one mesh into the current frame.
    ///
    /// A textured draw without a texture fails with
    /// [`RenderError::MissingTexture`] and leaves the buffers untouched,
    /// unless `config.texture_fallback` is set; then the mesh is drawn with
    /// vertex colors and the returned stats say so.
    pub fn draw(
        &mut self,
        scene: &Scene,
        mesh: &Mesh,
        transform: &Transform,
        config: &DrawConfig,
        texture: Option<&Texture>,
    ) -> Result<DrawStats, RenderError> {
        let mut stats = DrawStats::default();
        let binding = texture.map(|t| TextureBinding::new(t, config.filter, config.wrap));
        let surface = match Surface::new(config.texture_mode, binding) {
            Ok(surface) => surface,
            Err(err @ RenderError::MissingTexture { .. }) if config.texture_fallback => {
                warn!("{err}; drawing with vertex colors");
                stats.texture_fallback = true;
                Surface::VertexColor
            }
            Err(err) => return Err(err),
        };

        let mut triangles = Vec::with_capacity(mesh.faces().len());
        assemble_triangles(
            mesh,
            transform,
            scene,
            config,
            surface,
            self.renderer.width(),
            self.renderer.height(),
            &mut triangles,
            &mut stats,
        );

        let (draw_filled, draw_wireframe, draw_vertices) = config.render_mode.layers();

        if draw_filled {
            let rasterizer = RasterizerDispatcher::new(config.rasterizer);
            let mut fb = self.renderer.as_framebuffer();
            for triangle in &triangles {
                stats.pixels += u64::from(rasterizer.fill_triangle(triangle, &mut fb));
            }
        }

        let renderer = &mut self.renderer;
        for triangle in &triangles {
            if draw_wireframe {
                renderer.draw_triangle_wireframe(triangle, colors::WIREFRAME);
            }
            if draw_vertices {
                renderer.draw_triangle_vertices(triangle, colors::VERTEX);
            }
        }

        debug!(
            "{} {}: {} faces, {} culled, {} clipped, {} degenerate, {} triangles, {} pixels",
            config.rasterizer,
            config.render_mode,
            stats.faces,
            stats.culled,
            stats.clipped_away,
            stats.degenerate,
            stats.triangles,
            stats.pixels,
        );
        Ok(stats)
    }

    /// Clear the target and draw every call in order.
    pub fn render(&mut self, scene: &Scene, draws: &[DrawCall]) -> Result<FrameStats, RenderError> {
        self.begin_frame();
        let mut frame = FrameStats::default();
        for call in draws {
            let DrawCall { mesh, texture, .. } = *call;
            let stats = self.draw(scene, mesh, &call.transform, &call.config, texture)?;
            frame.record(&stats);
        }
        debug!(
            "frame: {} draws, {} triangles, {} pixels",
            frame.draws, frame.triangles, frame.pixels
        );
        Ok(frame)
    }

    /// The composited frame, ARGB8888, row-major.
    pub fn frame_buffer(&self) -> &[u32] {
        self.renderer.color_buffer()
    }

    /// Returns the rendered frame as bytes (ARGB8888 format)
    pub fn as_bytes(&self) -> &[u8] {
        self.renderer.as_bytes()
    }

    pub fn depth_buffer(&self) -> &[f32] {
        self.renderer.depth_buffer()
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }
}
