//! The tutorial programs. Each scene owns its pipelines and GPU data; the
//! app drives it with `resize`, `update` and `layers`.

pub mod text;
pub mod triangle;

use std::time::Duration;

use anyhow::{Context, Result};
use tutor_render::shader::{TEXT_WGSL, TRIANGLE_WGSL};
use tutor_render::{Draw, GpuContext, ShaderSource};
use tutor_text::FontFace;

use crate::config::{Config, Demo};
use text::TextScene;
use triangle::TriangleScene;

/// A running demo.
pub trait Scene {
    /// The drawable area changed size. Also called once before the first
    /// frame.
    fn resize(&mut self, _gpu: &GpuContext, _width: u32, _height: u32) {}

    /// Advance to `elapsed` time since startup.
    fn update(&mut self, _gpu: &GpuContext, _elapsed: Duration) {}

    /// Layers to draw this frame, back to front.
    fn layers(&self) -> Vec<&dyn Draw>;
}

/// Load resources and create the scene selected by `config`.
pub fn build(config: &Config, gpu: &GpuContext) -> Result<Box<dyn Scene>> {
    let shader_dir = config.shader_dir.as_deref();

    let scene: Box<dyn Scene> = match config.demo {
        Demo::Intro | Demo::Triangle => {
            let shader = ShaderSource::load(shader_dir, "triangle", TRIANGLE_WGSL)?;
            let scene = if config.demo == Demo::Intro {
                TriangleScene::intro(gpu, &shader)
            } else {
                TriangleScene::transformed(gpu, &shader)
            };
            Box::new(scene.context("Failed to create triangle pipeline")?)
        }
        Demo::Text => {
            let shader = ShaderSource::load(shader_dir, "text", TEXT_WGSL)?;
            let mut font = FontFace::open(&config.font_path)?;
            let scene = TextScene::new(gpu, &shader, &mut font)
                .context("Failed to create text pipeline")?;
            Box::new(scene)
        }
    };
    Ok(scene)
}
