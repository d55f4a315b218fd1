//! Triangle demos: the static blue "first triangle" and the colored
//! triangle that slides left and right while it spins.

use std::f32::consts::TAU;
use std::time::Duration;

use glam::{Mat4, Vec3};
use tutor_render::{Draw, GpuContext, ShaderError, ShaderSource, TrianglePipeline, TriangleVertex};

use super::Scene;

const BLUE: [f32; 3] = [0.0, 0.0, 1.0];

pub const INTRO_VERTICES: [TriangleVertex; 3] = [
    TriangleVertex::new([0.0, 0.8, 0.0], BLUE),
    TriangleVertex::new([-0.8, -0.8, 0.0], BLUE),
    TriangleVertex::new([0.8, -0.8, 0.0], BLUE),
];

pub const TRANSFORMED_VERTICES: [TriangleVertex; 3] = [
    TriangleVertex::new([0.0, 0.8, 0.0], [1.0, 1.0, 0.0]),
    TriangleVertex::new([-0.8, -0.8, 0.0], [0.0, 0.0, 1.0]),
    TriangleVertex::new([0.8, -0.8, 0.0], [1.0, 0.0, 0.0]),
];

/// Seconds for one full left-right-left slide.
const SLIDE_PERIOD: f32 = 5.0;
/// Spin speed in degrees per second.
const SPIN_DEGREES_PER_SEC: f32 = 45.0;

/// Model transform `elapsed` after startup: the triangle slides between
/// x = -1 and x = +1 while rotating about its own origin.
pub fn transform_at(elapsed: Duration) -> Mat4 {
    let t = elapsed.as_secs_f32();
    let offset = (t * TAU / SLIDE_PERIOD).sin();
    let angle = (SPIN_DEGREES_PER_SEC * t).to_radians();
    Mat4::from_translation(Vec3::new(offset, 0.0, 0.0)) * Mat4::from_rotation_z(angle)
}

pub struct TriangleScene {
    pipeline: TrianglePipeline,
    animated: bool,
}

impl TriangleScene {
    pub fn new(
        gpu: &GpuContext,
        shader: &ShaderSource,
        vertices: &[TriangleVertex],
        animated: bool,
    ) -> Result<Self, ShaderError> {
        let pipeline = TrianglePipeline::new(&gpu.device, gpu.surface_format, shader, vertices)?;
        Ok(Self { pipeline, animated })
    }

    /// Solid blue triangle, identity transform.
    pub fn intro(gpu: &GpuContext, shader: &ShaderSource) -> Result<Self, ShaderError> {
        Self::new(gpu, shader, &INTRO_VERTICES, false)
    }

    /// Yellow/blue/red triangle driven by [`transform_at`].
    pub fn transformed(gpu: &GpuContext, shader: &ShaderSource) -> Result<Self, ShaderError> {
        Self::new(gpu, shader, &TRANSFORMED_VERTICES, true)
    }
}

impl Scene for TriangleScene {
    fn update(&mut self, gpu: &GpuContext, elapsed: Duration) {
        if self.animated {
            self.pipeline.set_transform(&gpu.queue, transform_at(elapsed));
        }
    }

    fn layers(&self) -> Vec<&dyn Draw> {
        vec![&self.pipeline]
    }
}

// ===================================================================
// Tests
// ===================================================================
