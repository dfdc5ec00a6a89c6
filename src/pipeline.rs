//! Transform stage: mesh faces to screen-space triangles.
//!
//! Per face, the three vertices go model -> world -> view -> clip space. The
//! face is backface culled in world space, lit according to the shading
//! mode, clipped (or rejected) against the view volume and finally mapped to
//! pixel coordinates with 1/w stored in the z slot.

use log::trace;

use crate::clipper::{clip_polygon, ClipSpacePolygon, ClipSpaceVertex};
use crate::colors::{self, Rgb};
use crate::config::DrawConfig;
use crate::engine::{DrawStats, ShadingMode};
use crate::math::mat4::Mat4;
use crate::math::utils::{is_degenerate, triangle_area};
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::mesh::{Mesh, Vertex};
use crate::render::{Surface, Triangle};
use crate::scene::Scene;
use crate::transform::Transform;

/// Matrices and settings shared by every face of one draw call.
struct FaceContext<'s> {
    model: Mat4,
    normal_matrix: Mat4,
    view_projection: Mat4,
    camera_position: Vec3,
    scene: &'s Scene,
    config: &'s DrawConfig,
    width: f32,
    height: f32,
}

/// Transform every face of `mesh` and append the resulting screen-space
/// triangles to `out`. Rejected faces are only counted in `stats`.
#[allow(clippy::too_many_arguments)]
pub fn assemble_triangles<'a>(
    mesh: &Mesh,
    transform: &Transform,
    scene: &Scene,
    config: &DrawConfig,
    surface: Surface<'a>,
    width: u32,
    height: u32,
    out: &mut Vec<Triangle<'a>>,
    stats: &mut DrawStats,
) {
    let ctx = FaceContext {
        model: transform.to_matrix(),
        normal_matrix: transform.normal_matrix(),
        view_projection: scene.projection.matrix() * scene.camera.view_matrix(),
        camera_position: scene.camera.position(),
        scene,
        config,
        width: width as f32,
        height: height as f32,
    };

    for face in mesh.faces() {
        stats.faces += 1;
        let vertices = mesh.face_vertices(face);
        let world = vertices.map(|v| ctx.model * v.position);

        // Left-handed: faces wound clockwise toward the viewer point at it.
        let face_normal = (world[1] - world[0]).cross(world[2] - world[0]);
        if config.backface_culling {
            let camera_ray = ctx.camera_position - world[0];
            if face_normal.dot(camera_ray) < 0.0 {
                trace!("culled back face {:?}", face.vertices);
                stats.culled += 1;
                continue;
            }
        }

        let colors = ctx.light(&vertices, face_normal);
        let clip: [ClipSpaceVertex; 3] = std::array::from_fn(|i| {
            let position = ctx.view_projection * Vec4::from(world[i]);
            ClipSpaceVertex::new(position, vertices[i].texcoord, colors[i])
        });

        let in_front = |v: &ClipSpaceVertex| v.position.w > 0.0 && v.position.w.is_finite();
        let emitted_before = stats.triangles;
        if config.clipping {
            let polygon = clip_polygon(ClipSpacePolygon::from_triangle(clip));
            if polygon.is_empty() {
                trace!("face {:?} outside the view volume", face.vertices);
                stats.clipped_away += 1;
                continue;
            }
            for triangle in polygon.triangulate() {
                ctx.emit(triangle, surface, out, stats);
            }
        } else if clip.iter().all(in_front) {
            ctx.emit(clip, surface, out, stats);
        } else {
            trace!("face {:?} reaches behind the camera", face.vertices);
            stats.clipped_away += 1;
            continue;
        }

        if stats.triangles == emitted_before {
            stats.degenerate += 1;
        }
    }
}

impl FaceContext<'_> {
    /// Lit vertex colors for one face.
    fn light(&self, vertices: &[Vertex; 3], face_normal: Vec3) -> [Rgb; 3] {
        let base = self.config.base_color;
        let light = &self.scene.light;
        match self.config.shading_mode {
            ShadingMode::None => [colors::unpack_color(base); 3],
            ShadingMode::Flat => [light.shade(base, face_normal); 3],
            ShadingMode::Gouraud => vertices.map(|v| {
                let normal = self.normal_matrix.transform_direction(v.normal);
                light.shade(base, normal)
            }),
        }
    }

    /// Perspective divide and viewport mapping; drops triangles with no area.
    fn emit<'a>(
        &self,
        clip: [ClipSpaceVertex; 3],
        surface: Surface<'a>,
        out: &mut Vec<Triangle<'a>>,
        stats: &mut DrawStats,
    ) {
        let points = clip.map(|v| {
            let p = v.position;
            let inv_w = 1.0 / p.w;
            Vec3::new(
                (p.x * inv_w + 1.0) * 0.5 * self.width,
                (1.0 - p.y * inv_w) * 0.5 * self.height,
                inv_w,
            )
        });

        let area = triangle_area(points[0].xy(), points[1].xy(), points[2].xy());
        if is_degenerate(area) || !points.iter().all(Vec3::is_finite) {
            trace!("dropped degenerate triangle {:?}", points);
            return;
        }

        out.push(Triangle {
            points,
            vertex_colors: clip.map(|v| colors::pack_rgb(v.color)),
            texcoords: clip.map(|v| v.texcoord),
            shading_mode: self.config.shading_mode,
            surface,
        });
        stats.triangles += 1;
    }
}
