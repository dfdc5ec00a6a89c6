use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use softras::math::vec2::Vec2;
use softras::math::vec3::Vec3;
use softras::render::{
    EdgeFunctionRasterizer, FrameBuffer, Rasterizer, ScanlineRasterizer, Surface, Triangle,
};
use softras::texture::{FilterMode, Texture, TextureBinding, WrapMode};
use softras::ShadingMode;

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

struct Buffers {
    color: Vec<u32>,
    depth: Vec<f32>,
}

impl Buffers {
    fn new() -> Self {
        let size = (BUFFER_WIDTH * BUFFER_HEIGHT) as usize;
        Self {
            color: vec![0u32; size],
            depth: vec![0.0; size],
        }
    }

    /// Depth is reset so every iteration passes the depth test.
    fn frame(&mut self) -> FrameBuffer<'_> {
        self.depth.fill(0.0);
        FrameBuffer::new(
            &mut self.color,
            &mut self.depth,
            BUFFER_WIDTH,
            BUFFER_HEIGHT,
        )
        .unwrap()
    }
}

fn triangle(points: [(f32, f32); 3]) -> Triangle<'static> {
    Triangle::solid(points.map(|(x, y)| Vec3::new(x, y, 0.5)), 0xFFFF0000)
}

fn small_triangle() -> Triangle<'static> {
    triangle([(100.0, 100.0), (120.0, 100.0), (110.0, 120.0)])
}

fn medium_triangle() -> Triangle<'static> {
    triangle([(100.0, 100.0), (300.0, 100.0), (200.0, 300.0)])
}

fn large_triangle() -> Triangle<'static> {
    triangle([(50.0, 50.0), (750.0, 100.0), (400.0, 550.0)])
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");

    let scanline = ScanlineRasterizer::new();
    let edge_fn = EdgeFunctionRasterizer::new();

    for (name, triangle) in [
        ("small", small_triangle()),
        ("medium", medium_triangle()),
        ("large", large_triangle()),
    ] {
        group.bench_with_input(BenchmarkId::new("scanline", name), &triangle, |b, tri| {
            let mut buffers = Buffers::new();
            b.iter(|| {
                let mut fb = buffers.frame();
                scanline.fill_triangle(black_box(tri), &mut fb)
            });
        });

        group.bench_with_input(
            BenchmarkId::new("edge_function", name),
            &triangle,
            |b, tri| {
                let mut buffers = Buffers::new();
                b.iter(|| {
                    let mut fb = buffers.frame();
                    edge_fn.fill_triangle(black_box(tri), &mut fb)
                });
            },
        );
    }

    group.finish();
}

fn benchmark_many_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_triangles");

    let scanline = ScanlineRasterizer::new();
    let edge_fn = EdgeFunctionRasterizer::new();

    // Generate a grid of small triangles
    let triangles: Vec<Triangle> = (0..20)
        .flat_map(|row| {
            (0..20).map(move |col| {
                let x = col as f32 * 40.0;
                let y = row as f32 * 30.0;
                triangle([(x, y), (x + 35.0, y), (x + 17.5, y + 25.0)])
            })
        })
        .collect();

    group.bench_function("scanline_400_triangles", |b| {
        let mut buffers = Buffers::new();
        b.iter(|| {
            let mut fb = buffers.frame();
            for tri in &triangles {
                scanline.fill_triangle(black_box(tri), &mut fb);
            }
        });
    });

    group.bench_function("edge_function_400_triangles", |b| {
        let mut buffers = Buffers::new();
        b.iter(|| {
            let mut fb = buffers.frame();
            for tri in &triangles {
                edge_fn.fill_triangle(black_box(tri), &mut fb);
            }
        });
    });

    group.finish();
}

fn benchmark_shaders(c: &mut Criterion) {
    let mut group = c.benchmark_group("shaders");

    let scanline = ScanlineRasterizer::new();
    let texture = Texture::checkerboard(64, 8, 0xFFFFFFFF, 0xFF202020).unwrap();
    let points = medium_triangle().points;
    let uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.5, 1.0),
    ];
    let colors = [0xFFFF0000, 0xFF00FF00, 0xFF0000FF];

    let gouraud = Triangle::new(points, colors, ShadingMode::Gouraud);
    let nearest = Triangle::new(points, colors, ShadingMode::Gouraud).with_surface(
        uvs,
        Surface::Replace(TextureBinding::new(&texture, FilterMode::Nearest, WrapMode::Repeat)),
    );
    let bilinear = Triangle::new(points, colors, ShadingMode::Gouraud).with_surface(
        uvs,
        Surface::Modulate(TextureBinding::new(&texture, FilterMode::Bilinear, WrapMode::Repeat)),
    );

    for (name, triangle) in [
        ("gouraud", gouraud),
        ("texture_nearest", nearest),
        ("modulate_bilinear", bilinear),
    ] {
        group.bench_with_input(BenchmarkId::new("scanline", name), &triangle, |b, tri| {
            let mut buffers = Buffers::new();
            b.iter(|| {
                let mut fb = buffers.frame();
                scanline.fill_triangle(black_box(tri), &mut fb)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_triangle,
    benchmark_many_triangles,
    benchmark_shaders
);
criterion_main!(benches);
