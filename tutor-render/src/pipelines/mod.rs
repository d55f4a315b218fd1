//! wgpu render pipelines, one per tutorial primitive.

pub mod text;
pub mod triangle;

use wgpu::{BlendState, ColorTargetState, ColorWrites, FrontFace, PolygonMode, PrimitiveState, PrimitiveTopology, TextureFormat};

/// Alpha-blended color target, as every tutorial enables
/// `SRC_ALPHA, ONE_MINUS_SRC_ALPHA` blending.
fn blended_target(format: TextureFormat) -> ColorTargetState {
    ColorTargetState {
        format,
        blend: Some(BlendState::ALPHA_BLENDING),
        write_mask: ColorWrites::ALL,
    }
}

/// Plain triangle list without culling.
fn triangle_list() -> PrimitiveState {
    PrimitiveState {
        topology: PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: FrontFace::Ccw,
        cull_mode: None,
        polygon_mode: PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}
