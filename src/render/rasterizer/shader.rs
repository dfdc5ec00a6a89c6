//! Pixel shaders for triangle rasterization.
//!
//! Shading is a closed set of strategies, so it is modelled as an enum that
//! is selected once per triangle and matched per pixel instead of a trait
//! object behind dynamic dispatch.
//!
//! # Architecture
//!
//! The rasterizer handles:
//! - Coverage (which pixels belong to the triangle)
//! - The depth test
//! - Perspective-correct barycentric weights
//!
//! The shader handles:
//! - Attribute interpolation (colors, UVs)
//! - Texture sampling
//! - Final color computation

use super::{Surface, Triangle};
use crate::colors::{modulate_rgb, pack_color, unpack_rgba};
use crate::math::vec2::Vec2;
use crate::texture::TextureBinding;

/// Unpacked RGBA channels in `[0.0, 1.0]`.
type Rgba = (f32, f32, f32, f32);

/// Per-pixel color function for one triangle.
///
/// Every variant receives perspective-correct weights `[b0, b1, b2]` that
/// sum to 1.0, so any per-vertex attribute is interpolated as
/// `b0*attr0 + b1*attr1 + b2*attr2`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Shader<'a> {
    /// All vertices share one color; no interpolation needed.
    Flat(u32),
    /// Interpolated vertex colors.
    Gouraud([Rgba; 3]),
    /// Texture sample at the interpolated UV, lighting ignored.
    Texture {
        binding: TextureBinding<'a>,
        uvs: [Vec2; 3],
    },
    /// Texture sample multiplied channel-wise by the interpolated lit color.
    TextureModulate {
        binding: TextureBinding<'a>,
        uvs: [Vec2; 3],
        colors: [Rgba; 3],
    },
}

impl<'a> Shader<'a> {
    /// Select the shader for a triangle.
    pub fn for_triangle(triangle: &Triangle<'a>) -> Self {
        let colors = triangle.vertex_colors;
        match triangle.surface {
            Surface::Replace(binding) => Shader::Texture {
                binding,
                uvs: triangle.texcoords,
            },
            Surface::Modulate(binding) => Shader::TextureModulate {
                binding,
                uvs: triangle.texcoords,
                colors: colors.map(unpack_rgba),
            },
            Surface::VertexColor if colors[0] == colors[1] && colors[1] == colors[2] => {
                Shader::Flat(colors[0])
            }
            Surface::VertexColor => Shader::Gouraud(colors.map(unpack_rgba)),
        }
    }

    #[inline]
    pub fn shade(&self, weights: [f32; 3]) -> u32 {
        match self {
            Shader::Flat(color) => *color,
            Shader::Gouraud(colors) => {
                let (r, g, b, a) = interpolate_rgba(colors, weights);
                pack_color(r, g, b, a)
            }
            Shader::Texture { binding, uvs } => binding.sample(interpolate_uv(uvs, weights)),
            Shader::TextureModulate {
                binding,
                uvs,
                colors,
            } => {
                let texel = binding.sample(interpolate_uv(uvs, weights));
                let (r, g, b, _) = interpolate_rgba(colors, weights);
                modulate_rgb(texel, (r, g, b))
            }
        }
    }
}

#[inline]
fn interpolate_uv(uvs: &[Vec2; 3], w: [f32; 3]) -> Vec2 {
    uvs[0] * w[0] + uvs[1] * w[1] + uvs[2] * w[2]
}

#[inline]
fn interpolate_rgba(colors: &[Rgba; 3], w: [f32; 3]) -> Rgba {
    let [c0, c1, c2] = colors;
    (
        c0.0 * w[0] + c1.0 * w[1] + c2.0 * w[2],
        c0.1 * w[0] + c1.1 * w[1] + c2.1 * w[2],
        c0.2 * w[0] + c1.2 * w[1] + c2.2 * w[2],
        c0.3 * w[0] + c1.3 * w[1] + c2.3 * w[2],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLUE, GREEN, RED, WHITE};
    use crate::engine::ShadingMode;
    use crate::math::vec3::Vec3;
    use crate::texture::{FilterMode, Texture, WrapMode};

    fn triangle(vertex_colors: [u32; 3], surface: Surface<'_>) -> Triangle<'_> {
        Triangle {
            points: [
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(4.0, 0.0, 1.0),
                Vec3::new(0.0, 4.0, 1.0),
            ],
            vertex_colors,
            texcoords: [
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 0.0),
            ],
            shading_mode: ShadingMode::Gouraud,
            surface,
        }
    }

    #[test]
    fn uniform_colors_select_flat() {
        let shader = Shader::for_triangle(&triangle([RED; 3], Surface::VertexColor));
        assert!(matches!(shader, Shader::Flat(RED)));
        assert_eq!(shader.shade([0.2, 0.3, 0.5]), RED);
    }

    #[test]
    fn gouraud_hits_vertex_colors_at_corners() {
        let shader = Shader::for_triangle(&triangle([RED, GREEN, BLUE], Surface::VertexColor));
        assert_eq!(shader.shade([1.0, 0.0, 0.0]), RED);
        assert_eq!(shader.shade([0.0, 1.0, 0.0]), GREEN);
        assert_eq!(shader.shade([0.0, 0.0, 1.0]), BLUE);
        assert_eq!(shader.shade([0.5, 0.5, 0.0]), 0xFF808000);
    }

    #[test]
    fn texture_modes_replace_or_modulate() {
        let texture = Texture::from_pixels(1, 1, vec![WHITE]).unwrap();
        let binding = TextureBinding::new(&texture, FilterMode::Nearest, WrapMode::Clamp);

        let replace = Shader::for_triangle(&triangle([RED; 3], Surface::Replace(binding)));
        assert_eq!(replace.shade([0.3, 0.3, 0.4]), WHITE);

        let modulate = Shader::for_triangle(&triangle([RED; 3], Surface::Modulate(binding)));
        assert_eq!(modulate.shade([0.3, 0.3, 0.4]), RED);
    }
}
