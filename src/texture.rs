//! Texture images and sampling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::colors::{pack_color, unpack_rgba};
use crate::math::vec2::Vec2;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("texture is {width}x{height} but {len} texels were supplied")]
    SizeMismatch { width: u32, height: u32, len: usize },
    #[error("failed to load texture image: {0}")]
    Image(#[from] image::ImageError),
}

/// Texel lookup policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    /// Closest texel, no blending
    #[default]
    Nearest,
    /// Weighted blend of the four surrounding texels
    Bilinear,
}

/// Policy for texture coordinates outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapMode {
    /// Tile the texture
    #[default]
    Repeat,
    /// Stretch the edge texels
    Clamp,
}

impl WrapMode {
    /// Map an integer texel coordinate into `0..size`.
    #[inline]
    fn apply(self, i: i32, size: u32) -> u32 {
        match self {
            WrapMode::Repeat => i.rem_euclid(size as i32) as u32,
            WrapMode::Clamp => i.clamp(0, size as i32 - 1) as u32,
        }
    }
}

/// Represents a 2D texture for texture mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    data: Vec<u32>, // The pixel data of the texture in ARGB format.
    width: u32,     // The width of the texture in pixels.
    height: u32,    // The height of the texture in pixels.
}

impl Texture {
    /// Build a texture from row-major ARGB8888 texels, top row first.
    pub fn from_pixels(width: u32, height: u32, data: Vec<u32>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyDimensions { width, height });
        }
        if data.len() != width as usize * height as usize {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    // Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();

        // Convert RGBA bytes to ARGB u32
        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();

        Self::from_pixels(width, height, data)
    }

    /// A `size`x`size` checkerboard of `cells`x`cells` squares alternating
    /// between `a` and `b`, starting with `a` in the top-left corner.
    pub fn checkerboard(size: u32, cells: u32, a: u32, b: u32) -> Result<Self, TextureError> {
        let cell = (size / cells.max(1)).max(1);
        let data = (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .map(|(x, y)| if (x / cell + y / cell) % 2 == 0 { a } else { b })
            .collect();
        Self::from_pixels(size, size, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel at integer coordinates, wrapped or clamped into range.
    #[inline]
    pub fn texel(&self, x: i32, y: i32, wrap: WrapMode) -> u32 {
        let x = wrap.apply(x, self.width);
        let y = wrap.apply(y, self.height);
        self.data[(y * self.width + x) as usize]
    }

    /// Sample the texture at UV coordinates.
    ///
    /// # UV Coordinate Convention
    /// - (0,0) = bottom-left in OBJ convention, but textures are stored top-left origin
    /// - We flip V to correct for this: v_corrected = 1.0 - v
    ///
    /// Coordinates outside `[0, 1]` follow `wrap`; the lookup never leaves
    /// the texel storage, whatever the input (NaN samples texel 0).
    #[inline]
    pub fn sample(&self, uv: Vec2, filter: FilterMode, wrap: WrapMode) -> u32 {
        let x = uv.x * self.width as f32;
        let y = (1.0 - uv.y) * self.height as f32;
        match filter {
            FilterMode::Nearest => self.texel(x.floor() as i32, y.floor() as i32, wrap),
            FilterMode::Bilinear => self.sample_bilinear(x - 0.5, y - 0.5, wrap),
        }
    }

    /// Blend the four texels around texel-space position (x, y), where
    /// integer coordinates are texel centers.
    fn sample_bilinear(&self, x: f32, y: f32, wrap: WrapMode) -> u32 {
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;
        let (x0, y0) = (x0 as i32, y0 as i32);

        let c00 = unpack_rgba(self.texel(x0, y0, wrap));
        let c10 = unpack_rgba(self.texel(x0.saturating_add(1), y0, wrap));
        let c01 = unpack_rgba(self.texel(x0, y0.saturating_add(1), wrap));
        let c11 = unpack_rgba(self.texel(x0.saturating_add(1), y0.saturating_add(1), wrap));

        let blend = |a: f32, b: f32, c: f32, d: f32| {
            let top = a + (b - a) * tx;
            let bottom = c + (d - c) * tx;
            top + (bottom - top) * ty
        };

        pack_color(
            blend(c00.0, c10.0, c01.0, c11.0),
            blend(c00.1, c10.1, c01.1, c11.1),
            blend(c00.2, c10.2, c01.2, c11.2),
            blend(c00.3, c10.3, c01.3, c11.3),
        )
    }
}

/// A texture bound to a draw call together with its sampling policy.
#[derive(Debug, Clone, Copy)]
pub struct TextureBinding<'a> {
    pub texture: &'a Texture,
    pub filter: FilterMode,
    pub wrap: WrapMode,
}

impl<'a> TextureBinding<'a> {
    pub fn new(texture: &'a Texture, filter: FilterMode, wrap: WrapMode) -> Self {
        Self {
            texture,
            filter,
            wrap,
        }
    }

    #[inline]
    pub fn sample(&self, uv: Vec2) -> u32 {
        self.texture.sample(uv, self.filter, self.wrap)
    }
}
