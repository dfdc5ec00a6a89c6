//! Per-triangle setup shared by both rasterizers.
//!
//! The rasterizers only differ in how they enumerate candidate pixels. The
//! coverage predicate, the depth test and the perspective correction all live
//! here, which keeps their output pixel-identical.
//!
//! # Fill rule
//!
//! Pixels are sampled at their centers `(x + 0.5, y + 0.5)`. After orienting
//! the triangle so its edge functions are positive inside, a center is covered
//! when every edge function is positive, or zero on a top-left edge. Two
//! triangles sharing an edge see it with opposite directions, so exactly one
//! of them claims the pixels lying on it.

use super::shader::Shader;
use super::Triangle;
use crate::math::utils::{edge_function, is_degenerate, is_top_left, triangle_area};
use crate::math::vec2::Vec2;
use crate::render::framebuffer::FrameBuffer;

pub(crate) struct TriangleSetup<'a> {
    /// Screen positions, oriented so the signed area is positive.
    pub vertices: [Vec2; 3],
    /// 1/w per vertex.
    inv_w: [f32; 3],
    inv_area: f32,
    /// Top-left flags for the edges opposite vertex 0, 1 and 2.
    top_left: [bool; 3],
    shader: Shader<'a>,
}

impl<'a> TriangleSetup<'a> {
    /// Prepare a triangle for rasterization.
    ///
    /// Returns `None` for triangles that cannot produce pixels: degenerate
    /// area, non-finite positions, or a vertex at or behind the eye.
    pub fn new(triangle: &Triangle<'a>) -> Option<Self> {
        let mut triangle = *triangle;
        if !triangle.points.iter().all(|p| p.is_finite() && p.z > 0.0) {
            return None;
        }

        let mut area = triangle_area(
            triangle.points[0].xy(),
            triangle.points[1].xy(),
            triangle.points[2].xy(),
        );
        if is_degenerate(area) {
            return None;
        }
        if area < 0.0 {
            triangle.swap_vertices(1, 2);
            area = -area;
        }

        let [v0, v1, v2] = triangle.points.map(|p| p.xy());
        Some(Self {
            vertices: [v0, v1, v2],
            inv_w: triangle.points.map(|p| p.z),
            inv_area: 1.0 / area,
            top_left: [
                is_top_left(v1, v2),
                is_top_left(v2, v0),
                is_top_left(v0, v1),
            ],
            shader: Shader::for_triangle(&triangle),
        })
    }

    /// Edge function values at `p` if `p` is covered, `None` otherwise.
    ///
    /// `w[i]` is the value for the edge opposite vertex `i`, so it doubles as
    /// that vertex's unnormalized barycentric weight.
    #[inline]
    pub fn coverage(&self, p: Vec2) -> Option<[f32; 3]> {
        let [v0, v1, v2] = self.vertices;
        let w = [
            edge_function(v1, v2, p),
            edge_function(v2, v0, p),
            edge_function(v0, v1, p),
        ];
        let inside = w
            .iter()
            .zip(self.top_left)
            .all(|(&w, top_left)| w > 0.0 || (w == 0.0 && top_left));
        inside.then_some(w)
    }

    /// Coverage of the center of pixel `(x, y)`.
    #[inline]
    pub fn coverage_at(&self, x: u32, y: u32) -> Option<[f32; 3]> {
        self.coverage(Vec2::new(x as f32 + 0.5, y as f32 + 0.5))
    }

    /// Depth-test and shade one covered pixel.
    ///
    /// Reads the stored depth, compares, shades and writes color and depth as
    /// one uninterrupted sequence. Returns true if the pixel was written.
    #[inline]
    pub fn shade(&self, x: u32, y: u32, w: [f32; 3], buffer: &mut FrameBuffer) -> bool {
        let index = buffer.index(x, y);

        let lambda = w.map(|w| w * self.inv_area);
        let inv_w =
            lambda[0] * self.inv_w[0] + lambda[1] * self.inv_w[1] + lambda[2] * self.inv_w[2];
        if !(inv_w > buffer.depth_at(index)) {
            return false;
        }

        // Perspective-correct weights: each vertex contributes attr/w, and the
        // blend is divided by the interpolated 1/w.
        let weights = [
            lambda[0] * self.inv_w[0] / inv_w,
            lambda[1] * self.inv_w[1] / inv_w,
            lambda[2] * self.inv_w[2] / inv_w,
        ];
        buffer.store(index, inv_w, self.shader.shade(weights));
        true
    }
}
