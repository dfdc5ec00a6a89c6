//! Headless demo: renders a spinning textured cube and saves the last frame.
//!
//! Usage: `softras [config.toml] [output.png]`. Set `RUST_LOG=debug` for
//! per-draw statistics.

use std::error::Error;
use std::path::{Path, PathBuf};

use log::info;
use softras::colors;
use softras::prelude::*;

const FRAMES: u32 = 8;
const DEFAULT_OUTPUT: &str = "softras.png";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            info!("loading config from {path}");
            RenderConfig::load(&path)?
        }
        None => RenderConfig::default(),
    };
    let output = PathBuf::from(args.next().as_deref().unwrap_or(DEFAULT_OUTPUT));

    let mut engine = Engine::from_config(&config)?;
    let mut scene = config.scene();
    let cube = Mesh::cube();
    let texture = Texture::checkerboard(64, 8, colors::WHITE, 0xFF3050A0)?;
    let mut transform = Transform::default();

    let draw = &config.draw;
    info!(
        "rendering {}x{} with {} rasterizer, {} shading, {} texture",
        config.width, config.height, draw.rasterizer, draw.shading_mode, draw.texture_mode
    );

    for frame in 0..FRAMES {
        let t = frame as f32;
        transform.set_rotation_xyz(t * 0.1, t * 0.15, 0.0);
        scene.camera.orbit_y(0.05);

        let call = DrawCall::new(&cube, transform, config.draw.clone()).with_texture(&texture);
        let stats = engine.render(&scene, &[call])?;
        info!(
            "frame {frame}: {} triangles, {} culled, {} clipped, {} pixels",
            stats.triangles, stats.culled, stats.clipped_away, stats.pixels
        );
    }

    save_png(&engine, &output)?;
    info!("wrote {}", output.display());
    Ok(())
}

/// Write the ARGB8888 color buffer as an RGBA PNG.
fn save_png(engine: &Engine, path: &Path) -> Result<(), Box<dyn Error>> {
    let rgba: Vec<u8> = engine
        .frame_buffer()
        .iter()
        .flat_map(|&argb| {
            let [a, r, g, b] = argb.to_be_bytes();
            [r, g, b, a]
        })
        .collect();
    let image = image::RgbaImage::from_raw(engine.width(), engine.height(), rgba)
        .ok_or("frame buffer does not match its dimensions")?;
    image.save(path)?;
    Ok(())
}
