//! Application state: GPU context, renderer and the running scene.

use std::time::Instant;

use anyhow::Result;
use tutor_render::{FrameStats, GpuContext, RenderError, Renderer};

use crate::config::Config;
use crate::demos::{self, Scene};

/// Owns everything the window draws with.
pub struct AppState {
    pub gpu: GpuContext,
    renderer: Renderer,
    scene: Box<dyn Scene>,
    started: Instant,
}

impl AppState {
    /// Build the scene for `config` on an already created GPU context.
    pub fn new(gpu: GpuContext, config: &Config) -> Result<Self> {
        let mut scene = demos::build(config, &gpu)?;
        let (width, height) = gpu.surface_size();
        scene.resize(&gpu, width, height);

        Ok(Self {
            gpu,
            renderer: Renderer::new(),
            scene,
            started: Instant::now(),
        })
    }

    /// Resize the surface and let the scene follow. Zero sizes
    /// (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.gpu.resize(width, height);
        self.scene.resize(&self.gpu, width, height);
    }

    /// Reconfigure the surface after it was lost or went out of date.
    pub fn reconfigure(&self) {
        self.gpu.reconfigure();
    }

    /// Advance the scene to the current time and draw it.
    pub fn render_frame(&mut self) -> Result<FrameStats, RenderError> {
        self.scene.update(&self.gpu, self.started.elapsed());
        self.renderer.render_to_surface(&self.gpu, &self.scene.layers())
    }
}
