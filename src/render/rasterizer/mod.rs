//! Triangle rasterization algorithms.
//!
//! This module provides two rasterizer implementations that can be swapped at
//! runtime. They share one coverage test, depth test and perspective
//! correction (see `setup`), so they produce identical pixels and differ only
//! in how they enumerate candidates.
//!
//! Available algorithms:
//! - [`ScanlineRasterizer`]: Flat-top/flat-bottom triangle decomposition
//! - [`EdgeFunctionRasterizer`]: Bounding box iteration with edge function tests

mod edgefunction;
mod scanline;
mod setup;
mod shader;

pub use edgefunction::EdgeFunctionRasterizer;
pub use scanline::ScanlineRasterizer;

use serde::{Deserialize, Serialize};

use super::framebuffer::FrameBuffer;
use crate::engine::{RenderError, ShadingMode, TextureMode};
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::texture::TextureBinding;

/// How a triangle's pixels get their base color.
#[derive(Debug, Clone, Copy)]
pub enum Surface<'a> {
    /// Interpolated (pre-lit) vertex colors.
    VertexColor,
    /// Texture sample, lighting ignored.
    Replace(TextureBinding<'a>),
    /// Texture sample multiplied by the lit vertex color.
    Modulate(TextureBinding<'a>),
}

impl<'a> Surface<'a> {
    /// Pair a texture mode with the texture bound to the draw call.
    ///
    /// Textured modes without a texture are a configuration error.
    pub fn new(
        mode: TextureMode,
        binding: Option<TextureBinding<'a>>,
    ) -> Result<Self, RenderError> {
        match (mode, binding) {
            (TextureMode::None, _) => Ok(Surface::VertexColor),
            (TextureMode::Replace, Some(binding)) => Ok(Surface::Replace(binding)),
            (TextureMode::Modulate, Some(binding)) => Ok(Surface::Modulate(binding)),
            (mode, None) => Err(RenderError::MissingTexture { mode }),
        }
    }

    pub fn texture_mode(&self) -> TextureMode {
        match self {
            Surface::VertexColor => TextureMode::None,
            Surface::Replace(_) => TextureMode::Replace,
            Surface::Modulate(_) => TextureMode::Modulate,
        }
    }
}

/// A triangle ready for rasterization in screen space.
///
/// `points` hold pixel coordinates in x/y and 1/w in z. Produced by the
/// transform stage each frame and never mutated afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Triangle<'a> {
    pub points: [Vec3; 3],
    /// Lit vertex colors, one per vertex.
    pub vertex_colors: [u32; 3],
    /// Texture coordinates; all zero for untextured geometry.
    pub texcoords: [Vec2; 3],
    pub shading_mode: ShadingMode,
    pub surface: Surface<'a>,
}

impl<'a> Triangle<'a> {
    /// An untextured triangle with per-vertex colors.
    pub fn new(points: [Vec3; 3], vertex_colors: [u32; 3], shading_mode: ShadingMode) -> Self {
        Self {
            points,
            vertex_colors,
            texcoords: [Vec2::ZERO; 3],
            shading_mode,
            surface: Surface::VertexColor,
        }
    }

    /// An untextured triangle of a single color.
    pub fn solid(points: [Vec3; 3], color: u32) -> Self {
        Self::new(points, [color; 3], ShadingMode::Flat)
    }

    pub fn with_surface(mut self, texcoords: [Vec2; 3], surface: Surface<'a>) -> Self {
        self.texcoords = texcoords;
        self.surface = surface;
        self
    }

    pub fn texture_mode(&self) -> TextureMode {
        self.surface.texture_mode()
    }

    /// Swap two vertices together with their attributes.
    pub(crate) fn swap_vertices(&mut self, a: usize, b: usize) {
        self.points.swap(a, b);
        self.vertex_colors.swap(a, b);
        self.texcoords.swap(a, b);
    }
}

/// Trait for triangle rasterization algorithms.
///
/// Implementors write every covered pixel whose interpolated 1/w is strictly
/// greater than the stored depth, updating color and depth together. Each
/// pixel is visited at most once per call.
pub trait Rasterizer {
    /// Fill a triangle into the frame buffer, returning the number of pixels
    /// written.
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut FrameBuffer) -> u32;
}

/// Available rasterization algorithms.
///
/// Selected per draw call through the draw configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RasterizerType {
    /// Scanline rasterizer using flat-top/flat-bottom triangle decomposition.
    /// Generally faster for larger triangles due to efficient horizontal span filling.
    #[default]
    Scanline,
    /// Edge function rasterizer that tests each pixel in the bounding box.
    /// Simpler algorithm, forms the basis for GPU rasterization.
    EdgeFunction,
}

impl std::fmt::Display for RasterizerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterizerType::Scanline => write!(f, "Scanline"),
            RasterizerType::EdgeFunction => write!(f, "EdgeFunction"),
        }
    }
}

/// Holds both rasterizer implementations and forwards to the active one.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterizerDispatcher {
    scanline: ScanlineRasterizer,
    edge_function: EdgeFunctionRasterizer,
    active: RasterizerType,
}

impl RasterizerDispatcher {
    pub fn new(rasterizer_type: RasterizerType) -> Self {
        Self {
            scanline: ScanlineRasterizer::new(),
            edge_function: EdgeFunctionRasterizer::new(),
            active: rasterizer_type,
        }
    }

    pub fn set_type(&mut self, rasterizer_type: RasterizerType) {
        self.active = rasterizer_type;
    }

    pub fn active_type(&self) -> RasterizerType {
        self.active
    }
}

impl Rasterizer for RasterizerDispatcher {
    #[inline]
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut FrameBuffer) -> u32 {
        match self.active {
            RasterizerType::Scanline => self.scanline.fill_triangle(triangle, buffer),
            RasterizerType::EdgeFunction => self.edge_function.fill_triangle(triangle, buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLUE, GREEN, RED, WHITE};
    use crate::math::mat4::Mat4;
    use crate::math::utils::{edge_function, triangle_area};
    use crate::texture::{FilterMode, Texture, WrapMode};
    use approx::assert_relative_eq;

    const STRATEGIES: [RasterizerType; 2] =
        [RasterizerType::Scanline, RasterizerType::EdgeFunction];
    const CLEAR: u32 = 0;

    /// Owned color and depth buffers for tests.
    struct Target {
        color: Vec<u32>,
        depth: Vec<f32>,
        width: u32,
        height: u32,
    }

    impl Target {
        fn new(width: u32, height: u32) -> Self {
            let size = (width * height) as usize;
            Self {
                color: vec![CLEAR; size],
                depth: vec![0.0; size],
                width,
                height,
            }
        }

        fn draw(&mut self, strategy: RasterizerType, triangle: &Triangle) -> u32 {
            let mut fb = FrameBuffer::new(
                &mut self.color,
                &mut self.depth,
                self.width,
                self.height,
            )
            .unwrap();
            RasterizerDispatcher::new(strategy).fill_triangle(triangle, &mut fb)
        }

        fn pixel(&self, x: u32, y: u32) -> u32 {
            self.color[(y * self.width + x) as usize]
        }

        fn covered(&self) -> Vec<bool> {
            self.color.iter().map(|&c| c != CLEAR).collect()
        }
    }

    fn point(x: f32, y: f32, inv_w: f32) -> Vec3 {
        Vec3::new(x, y, inv_w)
    }

    #[test]
    fn degenerate_triangle_writes_nothing() {
        let degenerate = [
            [
                point(5.0, 5.0, 1.0),
                point(20.0, 20.0, 1.0),
                point(35.0, 35.0, 1.0),
            ],
            [
                point(5.0, 5.0, 1.0),
                point(5.0, 5.0, 1.0),
                point(30.0, 8.0, 1.0),
            ],
            [
                point(7.0, 7.0, 1.0),
                point(7.0, 7.0, 1.0),
                point(7.0, 7.0, 1.0),
            ],
        ];
        for strategy in STRATEGIES {
            for points in degenerate {
                let mut target = Target::new(40, 40);
                assert_eq!(target.draw(strategy, &Triangle::solid(points, RED)), 0);
                assert!(target.color.iter().all(|&c| c == CLEAR));
                assert!(target.depth.iter().all(|&d| d == 0.0));
            }
        }
    }

    #[test]
    fn flat_top_triangle_matches_fill_rule() {
        let triangle = Triangle::solid(
            [
                point(10.0, 10.0, 1.0),
                point(30.0, 10.0, 1.0),
                point(20.0, 30.0, 1.0),
            ],
            RED,
        );

        // Interior, plus centers exactly on the left edge; never the right edge.
        let inside = |x: u32, y: u32| {
            let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);
            let left = 10.0 + (cy - 10.0) / 2.0;
            let right = 30.0 - (cy - 10.0) / 2.0;
            cy > 10.0 && cy < 30.0 && cx >= left && cx < right
        };

        for strategy in STRATEGIES {
            let mut target = Target::new(64, 64);
            target.draw(strategy, &triangle);
            for y in 0..64 {
                for x in 0..64 {
                    let expected = if inside(x, y) { RED } else { CLEAR };
                    assert_eq!(target.pixel(x, y), expected, "{strategy} pixel ({x}, {y})");
                }
            }
            assert_eq!(target.pixel(10, 10), RED);
            assert_eq!(target.pixel(29, 10), RED);
            assert_eq!(target.pixel(30, 10), CLEAR);
            assert!((0..64).all(|x| target.pixel(x, 29) == CLEAR));
            assert_eq!(target.pixel(19, 28), RED);
            assert_eq!(target.pixel(20, 28), RED);
        }
    }

    #[test]
    fn shared_edges_are_drawn_exactly_once() {
        // A grid of quads split along diagonals, with every vertex on a pixel
        // center so edges run exactly through rows, columns and diagonals of
        // centers.
        const N: usize = 6;
        const STEP: f32 = 5.0;
        let origin = 2.5;
        let vertex = |i: usize, j: usize| {
            let (x, y) = (i as f32 * STEP, j as f32 * STEP);
            point(origin + x, origin + y, 1.0)
        };

        let mut triangles = Vec::new();
        for j in 0..N {
            for i in 0..N {
                let (a, b, c, d) = (
                    vertex(i, j),
                    vertex(i + 1, j),
                    vertex(i + 1, j + 1),
                    vertex(i, j + 1),
                );
                if (i + j) % 2 == 0 {
                    triangles.push([a, b, c]);
                    triangles.push([a, c, d]);
                } else {
                    triangles.push([a, b, d]);
                    triangles.push([b, d, c]);
                }
            }
        }

        let size = 40u32;
        for strategy in STRATEGIES {
            let mut counts = vec![0u32; (size * size) as usize];
            for points in &triangles {
                let mut target = Target::new(size, size);
                target.draw(strategy, &Triangle::solid(*points, RED));
                for (count, covered) in counts.iter_mut().zip(target.covered()) {
                    *count += covered as u32;
                }
            }

            let extent = origin + N as f32 * STEP;
            for y in 0..size {
                for x in 0..size {
                    let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);
                    let count = counts[(y * size + x) as usize];
                    assert!(count <= 1, "{strategy}: ({x}, {y}) drawn {count} times");
                    if cx > origin && cx < extent && cy > origin && cy < extent {
                        assert_eq!(count, 1, "{strategy}: gap at ({x}, {y})");
                    }
                    if cx < origin || cx > extent || cy < origin || cy > extent {
                        assert_eq!(count, 0, "{strategy}: ({x}, {y}) outside the grid");
                    }
                }
            }
        }
    }

    #[test]
    fn split_quad_covers_the_same_pixels_as_its_halves_union() {
        let (a, b, c, d) = (
            point(3.3, 2.7, 1.0),
            point(40.1, 5.2, 1.0),
            point(37.8, 33.9, 1.0),
            point(6.4, 30.5, 1.0),
        );
        for strategy in STRATEGIES {
            let mut first = Target::new(48, 48);
            first.draw(strategy, &Triangle::solid([a, b, c], RED));
            let mut second = Target::new(48, 48);
            second.draw(strategy, &Triangle::solid([a, c, d], RED));
            // The other diagonal splits the same quad.
            let mut third = Target::new(48, 48);
            third.draw(strategy, &Triangle::solid([a, b, d], RED));
            let mut fourth = Target::new(48, 48);
            fourth.draw(strategy, &Triangle::solid([b, c, d], RED));

            let halves: Vec<_> = first.covered().into_iter().zip(second.covered()).collect();
            assert!(
                halves.iter().all(|&(p, q)| !(p && q)),
                "{strategy}: overlap"
            );

            let union: Vec<_> = halves.iter().map(|&(p, q)| p || q).collect();
            let other_union: Vec<_> = third
                .covered()
                .into_iter()
                .zip(fourth.covered())
                .map(|(p, q)| p || q)
                .collect();
            assert_eq!(
                union, other_union,
                "{strategy}: quad coverage depends on split"
            );
        }
    }

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let a = Triangle::solid(
            [
                point(0.0, 0.0, 0.5),
                point(12.0, 0.0, 0.5),
                point(0.0, 12.0, 0.5),
            ],
            RED,
        );
        let b = Triangle::solid(
            [
                point(2.0, 2.0, 0.8),
                point(10.0, 3.0, 0.8),
                point(3.0, 10.0, 0.8),
            ],
            BLUE,
        );
        for strategy in STRATEGIES {
            for order in [[&a, &b], [&b, &a]] {
                let mut target = Target::new(16, 16);
                for triangle in order {
                    target.draw(strategy, triangle);
                }
                assert_eq!(target.pixel(5, 5), BLUE);
                assert_relative_eq!(target.depth[5 * 16 + 5], 0.8);
                assert_eq!(target.pixel(1, 1), RED);
            }
        }
    }

    #[test]
    fn depth_buffer_holds_maximum_inverse_w() {
        let triangles = [
            Triangle::solid(
                [
                    point(0.0, 0.0, 0.2),
                    point(30.0, 2.0, 0.9),
                    point(4.0, 28.0, 0.4),
                ],
                RED,
            ),
            Triangle::solid(
                [
                    point(28.0, 0.0, 0.6),
                    point(30.0, 30.0, 0.6),
                    point(0.0, 14.0, 0.6),
                ],
                GREEN,
            ),
            Triangle::solid(
                [
                    point(5.0, 30.0, 0.3),
                    point(15.0, 1.0, 0.7),
                    point(29.0, 25.0, 0.5),
                ],
                BLUE,
            ),
        ];

        for strategy in STRATEGIES {
            // Depth each triangle would leave on its own.
            let solo: Vec<Vec<f32>> = triangles
                .iter()
                .map(|t| {
                    let mut target = Target::new(32, 32);
                    target.draw(strategy, t);
                    target.depth
                })
                .collect();
            let expected: Vec<f32> = (0..32 * 32)
                .map(|i| solo.iter().map(|d| d[i]).fold(0.0, f32::max))
                .collect();

            for order in [[0, 1, 2], [2, 1, 0], [1, 2, 0]] {
                let mut target = Target::new(32, 32);
                for i in order {
                    target.draw(strategy, &triangles[i]);
                }
                assert_eq!(target.depth, expected, "{strategy} order {order:?}");
            }
        }
    }

    #[test]
    fn strategies_produce_identical_output() {
        let texture = Texture::checkerboard(8, 4, WHITE, 0xFF336699).unwrap();
        let binding = TextureBinding::new(&texture, FilterMode::Bilinear, WrapMode::Repeat);
        let uvs = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.5),
            Vec2::new(0.3, 1.7),
        ];

        let triangles = [
            Triangle::new(
                [
                    point(1.3, 2.2, 0.9),
                    point(60.7, 9.9, 0.2),
                    point(20.1, 50.6, 0.5),
                ],
                [RED, GREEN, BLUE],
                ShadingMode::Gouraud,
            ),
            Triangle::solid(
                [
                    point(-20.0, 10.0, 0.3),
                    point(30.0, -15.0, 0.3),
                    point(70.0, 70.0, 0.3),
                ],
                WHITE,
            ),
            Triangle::new(
                [
                    point(10.5, 10.5, 0.7),
                    point(50.5, 10.5, 0.4),
                    point(30.5, 40.5, 1.0),
                ],
                [WHITE, 0xFF808080, 0xFF404040],
                ShadingMode::Gouraud,
            )
            .with_surface(uvs, Surface::Modulate(binding)),
            Triangle::solid(
                [
                    point(5.0, 60.0, 0.95),
                    point(5.2, 1.0, 0.95),
                    point(6.1, 30.0, 0.95),
                ],
                GREEN,
            ),
            Triangle::solid(
                [
                    point(0.0, 40.0, 0.99),
                    point(64.0, 40.4, 0.99),
                    point(32.0, 41.1, 0.99),
                ],
                RED,
            )
            .with_surface(uvs, Surface::Replace(binding)),
        ];

        let mut scanline = Target::new(64, 64);
        let mut edge = Target::new(64, 64);
        for triangle in &triangles {
            let a = scanline.draw(RasterizerType::Scanline, triangle);
            let b = edge.draw(RasterizerType::EdgeFunction, triangle);
            assert_eq!(a, b);
        }
        assert!(scanline.covered().iter().any(|&c| c));
        assert_eq!(scanline.color, edge.color);
        assert_eq!(scanline.depth, edge.depth);
    }

    #[test]
    fn textured_corners_reproduce_texels() {
        // Top row: red, green. Bottom row: blue, white.
        let texture = Texture::from_pixels(2, 2, vec![RED, GREEN, BLUE, WHITE]).unwrap();
        let binding = TextureBinding::new(&texture, FilterMode::Nearest, WrapMode::Clamp);
        let uvs = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ];
        let triangle = Triangle::solid(
            [
                point(0.0, 64.0, 1.0),
                point(64.0, 64.0, 1.0),
                point(0.0, 0.0, 1.0),
            ],
            WHITE,
        )
        .with_surface(uvs, Surface::Replace(binding));

        for strategy in STRATEGIES {
            let mut target = Target::new(64, 64);
            target.draw(strategy, &triangle);
            assert_eq!(target.pixel(0, 63), BLUE);
            assert_eq!(target.pixel(62, 63), WHITE);
            assert_eq!(target.pixel(0, 1), RED);
        }
    }

    #[test]
    fn texture_coordinates_are_perspective_correct() {
        // Pinhole projection of a world-space triangle onto a 64x64 target.
        const F: f32 = 32.0;
        const C: f32 = 32.0;
        let project = |p: Vec3| point(F * p.x / p.z + C, C - F * p.y / p.z, 1.0 / p.z);

        let world = [
            Vec3::new(-1.0, -1.0, 2.0),
            Vec3::new(3.0, -1.0, 6.0),
            Vec3::new(-1.0, 2.0, 3.0),
        ];
        let screen = world.map(project);

        // u encodes the weight of vertex 1; the texel's red channel encodes u.
        let texels = (0..256).map(|x| 0xFF000000 | (x << 16)).collect();
        let gradient = Texture::from_pixels(256, 1, texels).unwrap();
        let binding = TextureBinding::new(&gradient, FilterMode::Nearest, WrapMode::Clamp);
        let uvs = [
            Vec2::new(0.0, 0.5),
            Vec2::new(1.0, 0.5),
            Vec2::new(0.0, 0.5),
        ];
        let triangle = Triangle::solid(screen, WHITE).with_surface(uvs, Surface::Replace(binding));

        // Intersect the eye ray through a pixel center with the world
        // triangle: t*d - b1*e1 - b2*e2 = p0.
        let e1 = world[1] - world[0];
        let e2 = world[2] - world[0];
        let analytic_u = |x: u32, y: u32| {
            let d = Vec3::new((x as f32 + 0.5 - C) / F, (C - (y as f32 + 0.5)) / F, 1.0);
            let m = Mat4::new([
                [d.x, -e1.x, -e2.x, 0.0],
                [d.y, -e1.y, -e2.y, 0.0],
                [d.z, -e1.z, -e2.z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]);
            m.inverse().unwrap().transform_direction(world[0]).y
        };
        let screen_linear_u = |x: u32, y: u32| {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let [s0, s1, s2] = screen.map(|s| s.xy());
            edge_function(s2, s0, p) / triangle_area(s0, s1, s2)
        };

        for strategy in STRATEGIES {
            let mut target = Target::new(64, 64);
            assert!(target.draw(strategy, &triangle) > 100);

            let mut max_naive_error = 0.0f32;
            for y in 0..64 {
                for x in 0..64 {
                    let color = target.pixel(x, y);
                    if color == CLEAR {
                        continue;
                    }
                    let u = analytic_u(x, y);
                    let expected = (u * 256.0).floor().clamp(0.0, 255.0) as i32;
                    let actual = ((color >> 16) & 0xFF) as i32;
                    assert!(
                        (actual - expected).abs() <= 1,
                        "({x}, {y}): {actual} vs {expected}"
                    );
                    max_naive_error = max_naive_error.max((screen_linear_u(x, y) - u).abs());
                }
            }
            // Screen-linear interpolation would be visibly wrong here.
            assert!(max_naive_error > 0.05);
        }
    }

    #[test]
    fn dispatcher_switches_active_strategy() {
        let triangle = Triangle::solid(
            [
                point(1.0, 1.0, 0.5),
                point(14.0, 2.0, 0.5),
                point(4.0, 13.0, 0.5),
            ],
            RED,
        );
        let mut dispatcher = RasterizerDispatcher::default();
        assert_eq!(dispatcher.active_type(), RasterizerType::Scanline);

        let mut frames = Vec::new();
        for strategy in [RasterizerType::EdgeFunction, RasterizerType::Scanline] {
            dispatcher.set_type(strategy);
            assert_eq!(dispatcher.active_type(), strategy);
            let mut target = Target::new(16, 16);
            let mut fb = FrameBuffer::new(&mut target.color, &mut target.depth, 16, 16).unwrap();
            let written = dispatcher.fill_triangle(&triangle, &mut fb);
            assert!(written > 0);
            frames.push((written, target.color));
        }
        assert_eq!(frames[0], frames[1]);
    }

    #[test]
    fn triangle_reports_its_texture_mode() {
        let texture = Texture::from_pixels(1, 1, vec![RED]).unwrap();
        let binding = TextureBinding::new(&texture, FilterMode::Nearest, WrapMode::Clamp);
        let uvs = [Vec2::ZERO; 3];
        let triangle = Triangle::solid(
            [
                point(0.0, 0.0, 1.0),
                point(4.0, 0.0, 1.0),
                point(0.0, 4.0, 1.0),
            ],
            WHITE,
        );
        assert_eq!(triangle.texture_mode(), TextureMode::None);

        let replaced = triangle.with_surface(uvs, Surface::Replace(binding));
        assert_eq!(replaced.texture_mode(), TextureMode::Replace);
        let modulate = Surface::new(TextureMode::Modulate, Some(binding)).unwrap();
        let modulated = triangle.with_surface(uvs, modulate);
        assert_eq!(modulated.texture_mode(), TextureMode::Modulate);

        assert!(matches!(
            Surface::new(TextureMode::None, Some(binding)),
            Ok(Surface::VertexColor)
        ));
        assert!(matches!(
            Surface::new(TextureMode::Replace, None),
            Err(RenderError::MissingTexture {
                mode: TextureMode::Replace,
            })
        ));
    }
}
