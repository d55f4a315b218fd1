//! # tutor-render
//!
//! GPU rendering backend for the tutorial programs, built on `wgpu`.
//!
//! ## Architecture
//!
//! ```text
//!  tutor_text::Atlas ──► TextPipeline::add_atlas()   ◀── one texture per atlas
//!  layout_text()     ──► bridge::push_text()         ◀── quads → TextBatch
//!       │
//!       ▼
//!  TextPipeline::upload(batches) / TrianglePipeline::set_transform(m)
//!       │
//!       ▼
//!  Renderer::render_to_surface(&[&dyn Draw])          ◀── one pass, present
//! ```
//!
//! ## Crate modules
//!
//! - [`context`]: GPU device/queue/surface initialisation
//! - [`shader`]: WGSL sources (built-in or from disk) and checked compilation
//! - [`vertex`]: vertex, instance, and uniform data types
//! - [`pipelines`]: triangle and text render pipelines
//! - [`renderer`]: frame orchestration
//! - [`bridge`]: glyph quads → GPU instances

pub mod bridge;
pub mod context;
pub mod pipelines;
pub mod renderer;
pub mod shader;
pub mod vertex;

// Re-exports for convenience
pub use bridge::{collect_instances, push_text};
pub use context::{GpuContext, GpuError};
pub use pipelines::text::{AtlasId, TextBatch, TextPipeline};
pub use pipelines::triangle::TrianglePipeline;
pub use renderer::{Draw, FrameStats, RenderError, Renderer};
pub use shader::{ShaderError, ShaderSource};
pub use vertex::{ScreenUniform, TextInstance, TransformUniform, TriangleVertex};
