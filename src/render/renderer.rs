//! Owned render target and overlay drawing.
//!
//! Provides the [`Renderer`] struct, which owns the color and depth buffers
//! for their whole lifetime and implements the overlay primitives (lines,
//! vertex markers, wireframes) drawn on top of filled geometry.

use super::framebuffer::FrameBuffer;
use super::rasterizer::Triangle;
use crate::colors;
use crate::engine::RenderError;
use crate::math::vec3::Vec3;

/// Depth bias so wireframes render slightly in front of filled triangles.
const WIREFRAME_DEPTH_BIAS: f32 = 0.0001;

/// Side length of the square drawn for each vertex.
const VERTEX_MARKER_SIZE: i32 = 4;

#[derive(Debug, Clone)]
pub struct Renderer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let size = Self::buffer_len(width, height)?;
        Ok(Self {
            color_buffer: vec![colors::BACKGROUND; size],
            depth_buffer: vec![0.0; size], // 0.0 = infinitely far (1/w where w -> infinity)
            width,
            height,
        })
    }

    fn buffer_len(width: u32, height: u32) -> Result<usize, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        Ok(width as usize * height as usize)
    }

    /// Resize both buffers together. Contents are reset.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let size = Self::buffer_len(width, height)?;
        self.color_buffer = vec![colors::BACKGROUND; size];
        self.depth_buffer = vec![0.0; size];
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    /// Clear the depth buffer to prepare for a new frame.
    /// Sets all depths to 0.0 (infinitely far, since we store 1/w).
    #[inline]
    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(0.0);
    }

    pub fn color_buffer(&self) -> &[u32] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// The color buffer as raw bytes, ready for upload to an ARGB8888 surface.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.color_buffer)
    }

    /// Get a mutable FrameBuffer view into the color and depth buffers.
    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::from_parts(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        )
    }

    /// Fill an axis-aligned rectangle without depth testing. Pixels outside
    /// the buffer are skipped.
    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        let mut fb = self.as_framebuffer();
        for dy in 0..height {
            for dx in 0..width {
                fb.set_pixel(x.saturating_add(dx), y.saturating_add(dy), color);
            }
        }
    }

    /// Draw a square marker centered on each vertex of the triangle, on top
    /// of everything drawn so far.
    pub fn draw_triangle_vertices(&mut self, triangle: &Triangle, color: u32) {
        let offset = VERTEX_MARKER_SIZE / 2;
        for p in triangle.points {
            if p.is_finite() {
                let x = (p.x as i32).saturating_sub(offset);
                let y = (p.y as i32).saturating_sub(offset);
                self.draw_rect(x, y, VERTEX_MARKER_SIZE, VERTEX_MARKER_SIZE, color);
            }
        }
    }

    pub fn draw_triangle_wireframe(&mut self, triangle: &Triangle, color: u32) {
        let [p0, p1, p2] = triangle.points;
        self.draw_line_bresenham(p0, p1, color);
        self.draw_line_bresenham(p1, p2, color);
        self.draw_line_bresenham(p2, p0, color);
    }

    /// Draws a line between two screen points (z = 1/w) using Bresenham's line
    /// algorithm with depth testing.
    ///
    /// Bresenham's algorithm efficiently determines which pixels to illuminate
    /// by using only integer arithmetic. It tracks an "error" term that
    /// represents the distance between the ideal line and the current pixel;
    /// when the error exceeds a threshold it steps diagonally instead of
    /// straight.
    ///
    /// The segment is first clipped to the buffer (plus a one pixel margin)
    /// with 1/w interpolated at the cut points, so far off-screen endpoints
    /// keep the line's slope. Pixels are depth tested but the depth buffer is
    /// not written.
    pub fn draw_line_bresenham(&mut self, from: Vec3, to: Vec3, color: u32) {
        let Some((from, to)) = self.clip_to_buffer(from, to) else {
            return;
        };
        let (x0, y0) = (from.x as i32, from.y as i32);
        let (x1, y1) = (to.x as i32, to.y as i32);

        let inv_w0 = from.z + WIREFRAME_DEPTH_BIAS;
        let inv_w1 = to.z + WIREFRAME_DEPTH_BIAS;

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let steps = dx.max(dy);

        // Determine the step direction for each axis.
        let x_incr_direction = if x0 < x1 { 1 } else { -1 };
        let y_incr_direction = if y0 < y1 { 1 } else { -1 };

        // A positive error favors x movement, negative favors y.
        let mut err = dx - dy;

        let mut x = x0;
        let mut y = y0;
        let mut step = 0;
        let mut fb = self.as_framebuffer();

        loop {
            let t = if steps == 0 {
                0.0
            } else {
                step as f32 / steps as f32
            };
            let inv_depth = inv_w0 + t * (inv_w1 - inv_w0);
            fb.set_pixel_depth_tested(x, y, inv_depth, color);

            if x == x1 && y == y1 {
                break;
            }
            step += 1;

            // Double the error for comparison (avoids floating point).
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += x_incr_direction;
            }
            // Both conditions can be true, resulting in a diagonal step.
            if e2 < dx {
                err += dx;
                y += y_incr_direction;
            }
        }
    }

    /// Liang-Barsky clip of a screen-space segment against the buffer
    /// rectangle grown by one pixel. Returns None when nothing is visible.
    ///
    /// Runs in f64 so the cut points stay accurate for endpoints far outside
    /// the buffer.
    fn clip_to_buffer(&self, from: Vec3, to: Vec3) -> Option<(Vec3, Vec3)> {
        if !from.is_finite() || !to.is_finite() {
            return None;
        }
        let (x0, y0, z0) = (from.x as f64, from.y as f64, from.z as f64);
        let (dx, dy, dz) = (to.x as f64 - x0, to.y as f64 - y0, to.z as f64 - z0);
        let (max_x, max_y) = (self.width as f64, self.height as f64);

        let mut t_enter = 0.0f64;
        let mut t_exit = 1.0f64;
        for (p, q) in [
            (-dx, x0 + 1.0),
            (dx, max_x - x0),
            (-dy, y0 + 1.0),
            (dy, max_y - y0),
        ] {
            if p == 0.0 {
                // Parallel to this boundary and outside it.
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t_enter = t_enter.max(t);
            } else {
                t_exit = t_exit.min(t);
            }
            if t_enter > t_exit {
                return None;
            }
        }

        let at = |t: f64| {
            Vec3::new(
                (x0 + dx * t) as f32,
                (y0 + dy * t) as f32,
                (z0 + dz * t) as f32,
            )
        };
        Some((at(t_enter), at(t_exit)))
    }
}
