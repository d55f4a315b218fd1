//! Frame orchestration: clear, let each pipeline record its draws into a
//! single render pass, submit, present.

use thiserror::Error;
use wgpu::{
    Color, CommandEncoderDescriptor, LoadOp, Operations, RenderPass, RenderPassColorAttachment,
    RenderPassDescriptor, StoreOp, TextureView, TextureViewDescriptor,
};

use crate::context::GpuContext;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("No surface configured (headless mode)")]
    NoSurface,
}

/// Something that records draw commands into a render pass.
pub trait Draw {
    fn draw(&self, pass: &mut RenderPass<'_>);

    /// Draw calls `draw` will issue.
    fn draw_calls(&self) -> u32;

    /// Triangles `draw` will submit.
    fn primitive_count(&self) -> u32;
}

/// Frame statistics returned after each render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub triangles: u32,
}

impl FrameStats {
    fn collect(layers: &[&dyn Draw]) -> Self {
        layers.iter().fold(Self::default(), |stats, layer| Self {
            draw_calls: stats.draw_calls + layer.draw_calls(),
            triangles: stats.triangles + layer.primitive_count(),
        })
    }
}

/// Clears the target and draws the given layers in order.
///
/// # Usage
///
/// ```ignore
/// let renderer = Renderer::new();
/// triangle.set_transform(&gpu.queue, transform);
/// let stats = renderer.render_to_surface(&gpu, &[&triangle])?;
/// ```
pub struct Renderer {
    clear_color: Color,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Renderer clearing to white.
    pub fn new() -> Self {
        Self {
            clear_color: Color::WHITE,
        }
    }

    /// Render to the window surface and present.
    pub fn render_to_surface(
        &self,
        gpu: &GpuContext,
        layers: &[&dyn Draw],
    ) -> Result<FrameStats, RenderError> {
        let surface = gpu.surface.as_ref().ok_or(RenderError::NoSurface)?;
        let output = surface.get_current_texture()?;
        let view = output.texture.create_view(&TextureViewDescriptor::default());

        let stats = self.render_to_texture(gpu, &view, layers);
        output.present();

        Ok(stats)
    }

    /// Render into `target_view` without presenting (headless mode).
    pub fn render_to_texture(
        &self,
        gpu: &GpuContext,
        target_view: &TextureView,
        layers: &[&dyn Draw],
    ) -> FrameStats {
        let mut encoder = gpu.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("tutor_frame_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("tutor_render_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: target_view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for layer in layers {
                layer.draw(&mut pass);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));

        FrameStats::collect(layers)
    }
}

// ===================================================================
// Tests
// ===================================================================
