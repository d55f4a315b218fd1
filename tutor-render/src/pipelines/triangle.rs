//! Triangle pipeline: a fixed vertex buffer with per-vertex colors,
//! positioned by a model-transform uniform.

use glam::Mat4;
use wgpu::util::{BufferInitDescriptor, DeviceExt};
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingType, Buffer, BufferBindingType, BufferUsages, Device,
    FragmentState, MultisampleState, PipelineCompilationOptions, PipelineLayoutDescriptor, Queue,
    RenderPass, RenderPipeline, RenderPipelineDescriptor, ShaderStages, TextureFormat,
    VertexState,
};

use super::{blended_target, triangle_list};
use crate::renderer::Draw;
use crate::shader::{validated, ShaderError, ShaderSource};
use crate::vertex::{TransformUniform, TriangleVertex};

/// Owns the pipeline, the static vertex buffer and the transform uniform.
pub struct TrianglePipeline {
    pipeline: RenderPipeline,
    vertex_buffer: Buffer,
    vertex_count: u32,
    transform_buffer: Buffer,
    transform_bind_group: BindGroup,
}

impl TrianglePipeline {
    /// Compile `shader`, upload `vertices` once and start with the
    /// identity transform.
    pub fn new(
        device: &Device,
        surface_format: TextureFormat,
        shader: &ShaderSource,
        vertices: &[TriangleVertex],
    ) -> Result<Self, ShaderError> {
        let module = shader.compile(device)?;

        // ── Transform bind group layout (group 0) ───────────────
        let transform_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("triangle_transform_bgl"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("triangle_pipeline_layout"),
            bind_group_layouts: &[&transform_bgl],
            push_constant_ranges: &[],
        });

        let pipeline = validated(
            device,
            || {
                device.create_render_pipeline(&RenderPipelineDescriptor {
                    label: Some("triangle_pipeline"),
                    layout: Some(&pipeline_layout),
                    vertex: VertexState {
                        module: &module,
                        entry_point: Some("vs_main"),
                        compilation_options: PipelineCompilationOptions::default(),
                        buffers: &[TriangleVertex::layout()],
                    },
                    fragment: Some(FragmentState {
                        module: &module,
                        entry_point: Some("fs_main"),
                        compilation_options: PipelineCompilationOptions::default(),
                        targets: &[Some(blended_target(surface_format))],
                    }),
                    primitive: triangle_list(),
                    depth_stencil: None,
                    multisample: MultisampleState::default(),
                    multiview: None,
                    cache: None,
                })
            },
            |message| ShaderError::Link {
                label: "triangle_pipeline".into(),
                message,
            },
        )?;

        let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("triangle_vb"),
            contents: bytemuck::cast_slice(vertices),
            usage: BufferUsages::VERTEX,
        });

        let transform_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("triangle_transform_ub"),
            contents: bytemuck::bytes_of(&TransformUniform::identity()),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });

        let transform_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("triangle_transform_bg"),
            layout: &transform_bgl,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            pipeline,
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            transform_buffer,
            transform_bind_group,
        })
    }

    /// Upload the model transform for the next frame.
    pub fn set_transform(&self, queue: &Queue, transform: Mat4) {
        queue.write_buffer(
            &self.transform_buffer,
            0,
            bytemuck::bytes_of(&TransformUniform::from(transform)),
        );
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

impl Draw for TrianglePipeline {
    fn draw(&self, pass: &mut RenderPass<'_>) {
        if self.vertex_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.transform_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }

    fn draw_calls(&self) -> u32 {
        u32::from(self.vertex_count > 0)
    }

    fn primitive_count(&self) -> u32 {
        self.vertex_count / 3
    }
}

// ===================================================================
// Tests
// ===================================================================
