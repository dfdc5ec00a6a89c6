//! Edge function-based triangle rasterization.
//!
//! This module implements triangle rasterization using the edge function algorithm,
//! which is the foundation of modern GPU rasterization. The algorithm tests each
//! pixel against three edge equations to determine triangle coverage.
//!
//! # Algorithm Overview
//!
//! 1. Compute the bounding box of the triangle and clamp it to the buffer
//! 2. For each pixel in the box, evaluate the three edge functions at its center
//! 3. The pixel is inside if all three are positive (or zero on a top-left edge)
//!
//! # Edge Function
//!
//! For an edge from point A to point B, the edge function at point P is:
//!
//! ```text
//! E(P) = (P.x - A.x) * (B.y - A.y) - (P.y - A.y) * (B.x - A.x)
//! ```
//!
//! The three values are proportional to the barycentric coordinates:
//!
//! ```text
//! lambda_i = E_i(P) / (E_0 + E_1 + E_2)
//! ```
//!
//! where E_i is the edge function for the edge opposite to vertex i.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)
//! - Scratchapixel: <https://www.scratchapixel.com/lessons/3d-basic-rendering/rasterization-practical-implementation>

use super::setup::TriangleSetup;
use super::{Rasterizer, Triangle};
use crate::render::framebuffer::FrameBuffer;

/// Triangle rasterizer using the edge function algorithm.
///
/// Iterates over every pixel in the triangle's bounding box. Simple and
/// uniform, but wastes work on thin or diagonal triangles whose bounding box
/// is mostly empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct EdgeFunctionRasterizer;

impl EdgeFunctionRasterizer {
    pub fn new() -> Self {
        EdgeFunctionRasterizer
    }
}

impl Rasterizer for EdgeFunctionRasterizer {
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut FrameBuffer) -> u32 {
        let Some(setup) = TriangleSetup::new(triangle) else {
            return 0;
        };
        let [v0, v1, v2] = setup.vertices;

        // Bounding box, clipped to the framebuffer
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as u32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as u32;
        let (width, height) = (buffer.width() as f32, buffer.height() as f32);
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min(width - 1.0);
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min(height - 1.0);
        if max_x < 0.0 || max_y < 0.0 {
            return 0;
        }
        let (max_x, max_y) = (max_x as u32, max_y as u32);

        let mut written = 0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if let Some(w) = setup.coverage_at(x, y) {
                    written += setup.shade(x, y, w, buffer) as u32;
                }
            }
        }
        written
    }
}
