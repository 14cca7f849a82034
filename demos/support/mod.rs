//! Command line handling, logging setup and asset loading shared by the lessons.

#![allow(dead_code)]

use clap::Parser;
use lectures::{FlyCamera, Input, Key, Movement, Settings};
use std::path::PathBuf;
#[cfg(feature = "image")]
use {
    log::{info, warn},
    std::path::Path,
};

#[derive(Debug, Parser)]
pub struct Args {
    /// Initial window width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: usize,
    /// Initial window height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: usize,
    /// Frame rate cap, 0 to render as fast as possible
    #[arg(long, default_value_t = 60)]
    pub fps: usize,
    /// Wavefront OBJ model to display
    #[arg(long)]
    pub model: Option<PathBuf>,
    /// Diffuse texture
    #[arg(long)]
    pub texture: Option<PathBuf>,
    /// Tangent-space normal map
    #[arg(long)]
    pub normal_map: Option<PathBuf>,
}

impl Args {
    pub fn settings(&self, title: &str) -> Settings {
        Settings::default()
            .title(title)
            .size(self.width, self.height)
            .target_fps(Some(self.fps).filter(|&fps| fps > 0))
    }
}

/// Set up logging (`RUST_LOG` overrides the default `info` filter) and parse the command line.
pub fn init() -> Args {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    Args::parse()
}

/// WASD and Space/LeftShift move, dragging with the left mouse button looks around, scrolling zooms.
pub fn steer(camera: &mut FlyCamera, input: &Input, dt: f32) {
    const BINDINGS: [(Key, Movement); 6] = [
        (Key::W, Movement::Forward),
        (Key::S, Movement::Backward),
        (Key::A, Movement::Left),
        (Key::D, Movement::Right),
        (Key::Space, Movement::Up),
        (Key::LeftShift, Movement::Down),
    ];
    for (key, movement) in BINDINGS {
        if input.is_down(key) {
            camera.translate(movement, dt);
        }
    }
    if input.left_button {
        camera.rotate(input.mouse_delta.x, input.mouse_delta.y);
    }
    if input.scroll.y != 0.0 {
        camera.zoom(input.scroll.y);
    }
}

/// Load an 8-bit RGB image for use with [`lectures::rgb_texture`].
///
/// Falls back to `fallback` when no path is given or the image cannot be read, so a lesson still runs without its
/// assets.
#[cfg(feature = "image")]
pub fn load_texture(path: Option<&Path>, fallback: impl FnOnce() -> image::RgbImage) -> image::RgbImage {
    match path.map(|path| (path, image::open(path))) {
        Some((path, Ok(img))) => {
            info!("loaded texture {} ({}x{})", path.display(), img.width(), img.height());
            img.to_rgb8()
        }
        Some((path, Err(err))) => {
            warn!("failed to load texture {}: {}, using a generated one", path.display(), err);
            fallback()
        }
        None => fallback(),
    }
}
