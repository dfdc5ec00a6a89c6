//! Clip-space clipping against the homogeneous clip volume.
//!
//! Clipping occurs after projection (in homogeneous clip space), before the
//! perspective divide. The clip volume is defined by:
//!
//! ```text
//! -w <= x <= w
//! -w <= y <= w
//!  0 <= z <= w   ([0, 1] depth range)
//! ```
//!
//! The planes are fixed, so the clipper never needs to be rebuilt when the
//! projection parameters change. Since `z = 0` lies on the near plane, every
//! vertex that survives has `w >= z_near > 0`.

use crate::colors::{self, Rgb};
use crate::math::vec2::Vec2;
use crate::math::vec4::Vec4;

/// A vertex in homogeneous clip space with interpolatable attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipSpaceVertex {
    /// Position in clip space (x, y, z, w) - before perspective divide
    pub position: Vec4,
    pub texcoord: Vec2,
    /// Lit vertex color
    pub color: Rgb,
}

impl ClipSpaceVertex {
    pub fn new(position: Vec4, texcoord: Vec2, color: Rgb) -> Self {
        Self {
            position,
            texcoord,
            color,
        }
    }

    /// Linearly interpolate all attributes between two vertices.
    /// Used when a polygon edge crosses a clipping plane.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            texcoord: self.texcoord.lerp(other.texcoord, t),
            color: colors::lerp_color(self.color, other.color, t),
        }
    }
}

/// The 6 planes of the clip volume.
///
/// The signed distance is positive when inside the clip volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipPlane {
    /// x >= -w
    Left,
    /// x <= w
    Right,
    /// y >= -w
    Bottom,
    /// y <= w
    Top,
    /// z >= 0
    Near,
    /// z <= w
    Far,
}

impl ClipPlane {
    pub const ALL: [ClipPlane; 6] = [
        ClipPlane::Near,
        ClipPlane::Far,
        ClipPlane::Left,
        ClipPlane::Right,
        ClipPlane::Bottom,
        ClipPlane::Top,
    ];

    /// Returns the signed distance from a vertex to this plane.
    /// Positive = inside the clip volume, Negative = outside.
    pub fn signed_distance(&self, v: &ClipSpaceVertex) -> f32 {
        let p = v.position;
        match self {
            Self::Left => p.w + p.x,
            Self::Right => p.w - p.x,
            Self::Bottom => p.w + p.y,
            Self::Top => p.w - p.y,
            Self::Near => p.z,
            Self::Far => p.w - p.z,
        }
    }
}

/// A convex polygon in clip space.
///
/// Intermediate representation during clipping; triangulated back into a
/// fan afterwards.
#[derive(Clone, Debug, Default)]
pub struct ClipSpacePolygon {
    pub vertices: Vec<ClipSpaceVertex>,
}

impl ClipSpacePolygon {
    pub fn from_triangle(vertices: [ClipSpaceVertex; 3]) -> Self {
        Self {
            vertices: vertices.to_vec(),
        }
    }

    /// Returns true if the polygon has been completely clipped away.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    /// True when every vertex is inside every plane.
    pub fn is_inside(&self) -> bool {
        ClipPlane::ALL.iter().all(|plane| {
            self.vertices
                .iter()
                .all(|v| plane.signed_distance(v) >= 0.0)
        })
    }

    /// Clip against a single plane (Sutherland-Hodgman).
    pub fn clip_against_plane(&self, plane: ClipPlane) -> Self {
        if self.is_empty() {
            return Self::default();
        }

        let mut output = Vec::with_capacity(self.vertices.len() + 1);
        for (i, current) in self.vertices.iter().enumerate() {
            let next = &self.vertices[(i + 1) % self.vertices.len()];

            let d1 = plane.signed_distance(current);
            let d2 = plane.signed_distance(next);
            let current_inside = d1 >= 0.0;
            let next_inside = d2 >= 0.0;

            if current_inside {
                output.push(*current);
            }
            // Edge crosses the plane: emit the intersection.
            if current_inside != next_inside {
                let t = d1 / (d1 - d2);
                output.push(current.lerp(next, t));
            }
        }

        Self { vertices: output }
    }

    /// Fan triangulation of this convex polygon.
    pub fn triangulate(&self) -> impl Iterator<Item = [ClipSpaceVertex; 3]> + '_ {
        (1..self.vertices.len().saturating_sub(1))
            .map(move |i| [self.vertices[0], self.vertices[i], self.vertices[i + 1]])
    }
}

/// Clip a polygon against all six planes. The result is empty if the polygon
/// was entirely outside the clip volume.
pub fn clip_polygon(polygon: ClipSpacePolygon) -> ClipSpacePolygon {
    if polygon.is_inside() {
        return polygon;
    }
    let mut result = polygon;
    for plane in ClipPlane::ALL {
        if result.is_empty() {
            break;
        }
        result = result.clip_against_plane(plane);
    }
    result
}
