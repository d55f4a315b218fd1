//! Text render pipeline: instanced rendering of textured glyph quads.
//!
//! Uses a shared unit quad with per-instance glyph data (position, size,
//! UV range in the atlas, color). Each registered [`Atlas`] gets its own
//! single-channel texture and bind group; a frame is a list of batches,
//! one draw call per non-empty batch.

use std::ops::Range;

use log::{debug, warn};
use tutor_text::Atlas;
use wgpu::util::{BufferInitDescriptor, DeviceExt};
use wgpu::{
    AddressMode, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource, BindingType, Buffer,
    BufferBindingType, BufferDescriptor, BufferUsages, Device, Extent3d, FilterMode,
    FragmentState, IndexFormat, MultisampleState, PipelineCompilationOptions,
    PipelineLayoutDescriptor, Queue, RenderPass, RenderPipeline, RenderPipelineDescriptor,
    Sampler, SamplerBindingType, SamplerDescriptor, ShaderStages, Texture, TextureDescriptor,
    TextureDimension, TextureFormat, TextureSampleType, TextureUsages, TextureViewDimension,
    VertexState,
};

use super::{blended_target, triangle_list};
use crate::renderer::Draw;
use crate::shader::{validated, ShaderError, ShaderSource};
use crate::vertex::{QuadVertex, ScreenUniform, TextInstance};

/// Maximum glyph instances per frame (16K × 48B = 768 KB).
const MAX_TEXT_INSTANCES: usize = 16_384;

/// Handle to an atlas registered with [`TextPipeline::add_atlas`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AtlasId(pub(crate) usize);

/// Glyph instances that sample the same atlas.
#[derive(Clone, Debug)]
pub struct TextBatch {
    pub atlas: AtlasId,
    pub instances: Vec<TextInstance>,
}

/// GPU copy of one [`Atlas`]. Dropping it frees the texture.
struct AtlasTexture {
    #[allow(dead_code)]
    texture: Texture,
    bind_group: BindGroup,
    size: (u32, u32),
}

impl AtlasTexture {
    fn new(
        device: &Device,
        queue: &Queue,
        layout: &BindGroupLayout,
        sampler: &Sampler,
        atlas: &Atlas,
    ) -> Self {
        // wgpu rejects zero-sized textures; an atlas with no glyphs gets 1×1.
        let width = atlas.width().max(1);
        let height = atlas.height().max(1);
        let extent = Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&TextureDescriptor {
            label: Some("glyph_atlas"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::R8Unorm,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        if !atlas.is_empty() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                atlas.pixels(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(width), // one byte per pixel
                    rows_per_image: Some(height),
                },
                extent,
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("text_atlas_bg"),
            layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(&view),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            texture,
            bind_group,
            size: (width, height),
        }
    }
}

/// Owns the wgpu pipeline, buffers, atlas textures and bind groups for text.
pub struct TextPipeline {
    pipeline: RenderPipeline,

    // Geometry (shared unit quad).
    vertex_buffer: Buffer,
    index_buffer: Buffer,

    // Instancing.
    instance_buffer: Buffer,
    batches: Vec<(AtlasId, Range<u32>)>,

    // Screen projection.
    screen_buffer: Buffer,
    screen_bind_group: BindGroup,

    // Atlases.
    atlas_bgl: BindGroupLayout,
    sampler: Sampler,
    atlases: Vec<AtlasTexture>,
}

impl TextPipeline {
    /// Create the text pipeline and allocate GPU buffers.
    pub fn new(
        device: &Device,
        surface_format: TextureFormat,
        shader: &ShaderSource,
    ) -> Result<Self, ShaderError> {
        let module = shader.compile(device)?;

        // ── Screen bind group layout (group 0) ──────────────────
        let screen_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("text_screen_bgl"),
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

        // ── Atlas bind group layout (group 1) ───────────────────
        let atlas_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("text_atlas_bgl"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("text_pipeline_layout"),
            bind_group_layouts: &[&screen_bgl, &atlas_bgl],
            push_constant_ranges: &[],
        });

        let pipeline = validated(
            device,
            || {
                device.create_render_pipeline(&RenderPipelineDescriptor {
                    label: Some("text_pipeline"),
                    layout: Some(&pipeline_layout),
                    vertex: VertexState {
                        module: &module,
                        entry_point: Some("vs_main"),
                        compilation_options: PipelineCompilationOptions::default(),
                        buffers: &[QuadVertex::layout(), TextInstance::layout()],
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
                label: "text_pipeline".into(),
                message,
            },
        )?;

        // ── Unit quad ───────────────────────────────────────────
        let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("text_quad_vb"),
            contents: bytemuck::cast_slice(&QuadVertex::VERTICES),
            usage: BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("text_quad_ib"),
            contents: bytemuck::cast_slice(&QuadVertex::INDICES),
            usage: BufferUsages::INDEX,
        });

        // ── Instance buffer ─────────────────────────────────────
        let instance_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("text_instances"),
            size: (MAX_TEXT_INSTANCES * std::mem::size_of::<TextInstance>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // ── Screen uniform ──────────────────────────────────────
        let screen_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("text_screen_ub"),
            size: std::mem::size_of::<ScreenUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let screen_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("text_screen_bg"),
            layout: &screen_bgl,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: screen_buffer.as_entire_binding(),
            }],
        });

        // Clamping to edges prevents bleeding from neighbouring glyphs
        // when scaled; linear filtering suits text.
        let sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("glyph_atlas_sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            batches: Vec::new(),
            screen_buffer,
            screen_bind_group,
            atlas_bgl,
            sampler,
            atlases: Vec::new(),
        })
    }

    // ───────────────────── Upload ─────────────────────────────────

    /// Copy `atlas` into a new GPU texture and return its handle.
    pub fn add_atlas(&mut self, device: &Device, queue: &Queue, atlas: &Atlas) -> AtlasId {
        let texture = AtlasTexture::new(device, queue, &self.atlas_bgl, &self.sampler, atlas);
        debug!(
            "Uploaded {}px atlas as {}x{} texture",
            atlas.pixel_height(),
            texture.size.0,
            texture.size.1
        );
        self.atlases.push(texture);
        AtlasId(self.atlases.len() - 1)
    }

    /// Upload the screen projection (call on resize).
    pub fn set_screen(&self, queue: &Queue, screen: &ScreenUniform) {
        queue.write_buffer(&self.screen_buffer, 0, bytemuck::bytes_of(screen));
    }

    /// Upload this frame's batches. Returns the number of instances kept.
    ///
    /// Batches referring to unknown atlases are dropped; instances past
    /// the buffer capacity are truncated with a warning.
    pub fn upload(&mut self, queue: &Queue, batches: &[TextBatch]) -> u32 {
        self.batches.clear();

        let mut instances: Vec<TextInstance> = Vec::new();
        for batch in batches {
            if batch.atlas.0 >= self.atlases.len() {
                warn!("Dropping text batch for unknown atlas {:?}", batch.atlas);
                continue;
            }
            let room = MAX_TEXT_INSTANCES - instances.len();
            if batch.instances.len() > room {
                warn!(
                    "Text instance buffer full: dropping {} glyph(s)",
                    batch.instances.len() - room
                );
            }
            let take = batch.instances.len().min(room);
            if take == 0 {
                continue;
            }
            let start = instances.len() as u32;
            instances.extend_from_slice(&batch.instances[..take]);
            self.batches.push((batch.atlas, start..instances.len() as u32));
        }

        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        instances.len() as u32
    }
}

// ───────────────────── Draw ───────────────────────────────────

impl Draw for TextPipeline {
    fn draw(&self, pass: &mut RenderPass<'_>) {
        if self.batches.is_empty() {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.screen_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), IndexFormat::Uint16);

        for (atlas, range) in &self.batches {
            pass.set_bind_group(1, &self.atlases[atlas.0].bind_group, &[]);
            pass.draw_indexed(0..QuadVertex::INDICES.len() as u32, 0, range.clone());
        }
    }

    fn draw_calls(&self) -> u32 {
        self.batches.len() as u32
    }

    fn primitive_count(&self) -> u32 {
        self.batches.iter().map(|(_, r)| r.len() as u32 * 2).sum()
    }
}

// ===================================================================
// Tests
// ===================================================================
