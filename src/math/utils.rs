//! Screen-space helpers shared by the transform stage and both rasterizers.

use super::vec2::Vec2;

/// Twice the signed area below which a screen-space triangle counts as
/// degenerate.
pub const DEGENERATE_AREA: f32 = f32::EPSILON;

/// Computes the edge function value for point `p` relative to edge `a -> b`.
///
/// ```text
/// E(P) = (P.x - A.x) * (B.y - A.y) - (P.y - A.y) * (B.x - A.x)
/// ```
///
/// The value is the signed area of the parallelogram spanned by `b - a` and
/// `p - a`. Evaluated for the three edges of a triangle it yields unnormalized
/// barycentric weights; evaluated at the opposite vertex it yields twice the
/// triangle's signed area.
///
/// The endpoints are evaluated in a fixed order, so `edge_function(a, b, p)`
/// is exactly `-edge_function(b, a, p)` even after rounding. Triangles sharing
/// an edge therefore agree on which side of it every point lies.
#[inline]
pub fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    if (a.x, a.y) <= (b.x, b.y) {
        raw_edge_function(a, b, p)
    } else {
        -raw_edge_function(b, a, p)
    }
}

#[inline]
fn raw_edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

/// Twice the signed area of triangle `(v0, v1, v2)`.
#[inline]
pub fn triangle_area(v0: Vec2, v1: Vec2, v2: Vec2) -> f32 {
    edge_function(v0, v1, v2)
}

/// Returns true if `area` (as returned by [`triangle_area`]) is too small to
/// rasterize, or not a number at all.
#[inline]
pub fn is_degenerate(area: f32) -> bool {
    !(area.abs() > DEGENERATE_AREA)
}

/// Top-left classification of edge `a -> b` of a positively oriented triangle
/// (edge functions positive inside) in a y-down screen space.
///
/// A "top" edge is horizontal with the interior below it; a "left" edge has
/// the interior to its right. Pixel centers lying exactly on such an edge
/// belong to the triangle; centers exactly on any other edge do not.
#[inline]
pub fn is_top_left(a: Vec2, b: Vec2) -> bool {
    let d = b - a;
    d.y > 0.0 || (d.y == 0.0 && d.x < 0.0)
}
