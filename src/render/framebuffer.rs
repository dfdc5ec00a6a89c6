//! Frame buffer abstraction for 2D pixel access.
//!
//! Provides a borrowed view into the color and depth buffers with
//! bounds-checked access. The depth buffer enables hidden surface removal via
//! the z-buffer algorithm.

use crate::engine::RenderError;

/// A view into color and depth buffers.
///
/// Wraps 1D slices with width/height metadata to enable safe 2D pixel access.
/// This is a borrowed view, not an owning type: it is created for one frame's
/// rasterization calls and never stored.
///
/// # Depth Buffer
///
/// The depth buffer stores 1/w values (reciprocal of clip-space W) for each pixel.
/// Using 1/w instead of z because it can be linearly interpolated in screen space.
/// Larger values are closer to the camera; 0.0 means nothing was drawn yet.
#[derive(Debug)]
pub struct FrameBuffer<'a> {
    color_buffer: &'a mut [u32],
    depth_buffer: &'a mut [f32],
    width: u32,
    height: u32,
}

impl<'a> FrameBuffer<'a> {
    /// Create a view over caller-owned buffers.
    ///
    /// Both slices must hold exactly `width * height` values.
    pub fn new(
        color_buffer: &'a mut [u32],
        depth_buffer: &'a mut [f32],
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        for (buffer, len) in [("color", color_buffer.len()), ("depth", depth_buffer.len())] {
            if len != expected {
                return Err(RenderError::BufferMismatch {
                    buffer,
                    len,
                    width,
                    height,
                });
            }
        }
        Ok(Self::from_parts(color_buffer, depth_buffer, width, height))
    }

    /// Constructor for buffers whose sizes are already known to match.
    pub(crate) fn from_parts(
        color_buffer: &'a mut [u32],
        depth_buffer: &'a mut [f32],
        width: u32,
        height: u32,
    ) -> Self {
        debug_assert_eq!(color_buffer.len(), width as usize * height as usize);
        debug_assert_eq!(depth_buffer.len(), color_buffer.len());
        Self {
            color_buffer,
            depth_buffer,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn checked_index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Index of an in-bounds pixel for the rasterizer's inner loops.
    ///
    /// Callers clamp their iteration ranges to the buffer; an out-of-range
    /// coordinate here is a bug and trips the assertion (or the slice bounds
    /// check in release builds).
    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} buffer",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub(crate) fn depth_at(&self, index: usize) -> f32 {
        self.depth_buffer[index]
    }

    /// Write color and depth of one pixel together.
    #[inline]
    pub(crate) fn store(&mut self, index: usize, depth: f32, color: u32) {
        self.depth_buffer[index] = depth;
        self.color_buffer[index] = color;
    }

    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    /// Reset every depth to 0.0 (infinitely far).
    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(0.0);
    }

    /// Set a pixel without depth testing. Returns false if out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) -> bool {
        match self.checked_index(x, y) {
            Some(index) => {
                self.color_buffer[index] = color;
                true
            }
            None => false,
        }
    }

    /// Set a pixel at (x, y) with depth testing.
    ///
    /// The pixel is only written if `depth` is strictly greater than the
    /// stored 1/w. Returns true if the pixel was written.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, color: u32) -> bool {
        match self.checked_index(x, y) {
            Some(index) if depth > self.depth_buffer[index] => {
                self.store(index, depth, color);
                true
            }
            _ => false,
        }
    }

    /// Set the color at (x, y) if `depth` is strictly greater than the stored
    /// 1/w, leaving the depth buffer untouched. Used for overlays.
    #[inline]
    pub fn set_pixel_depth_tested(&mut self, x: i32, y: i32, depth: f32, color: u32) -> bool {
        match self.checked_index(x, y) {
            Some(index) if depth > self.depth_buffer[index] => {
                self.color_buffer[index] = color;
                true
            }
            _ => false,
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.checked_index(x, y)
            .map(|index| self.color_buffer[index])
    }

    /// Get the stored 1/w at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_depth(&self, x: i32, y: i32) -> Option<f32> {
        self.checked_index(x, y)
            .map(|index| self.depth_buffer[index])
    }

    /// Overwrite the stored 1/w at (x, y). Returns false if out of bounds.
    #[inline]
    pub fn set_depth(&mut self, x: i32, y: i32, depth: f32) -> bool {
        match self.checked_index(x, y) {
            Some(index) => {
                self.depth_buffer[index] = depth;
                true
            }
            None => false,
        }
    }
}
