//! GPU vertex, instance, and uniform data types.
//!
//! All types derive `bytemuck::Pod` + `Zeroable` for zero-copy upload
//! to GPU buffers.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use tutor_text::GlyphQuad;
use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

// ───────────────────────────────────────────────────────────────────
// Triangle vertex
// ───────────────────────────────────────────────────────────────────

/// Position plus RGB color, interleaved.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TriangleVertex {
    /// Clip-space position before the model transform.
    pub coord3d: [f32; 3],
    /// RGB color, each channel in [0.0, 1.0].
    pub v_color: [f32; 3],
}

impl TriangleVertex {
    pub const fn new(coord3d: [f32; 3], v_color: [f32; 3]) -> Self {
        Self { coord3d, v_color }
    }

    pub fn layout() -> VertexBufferLayout<'static> {
        static ATTRS: &[VertexAttribute] = &[
            // location(0) = coord3d
            VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: VertexFormat::Float32x3,
            },
            // location(1) = v_color
            VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: VertexFormat::Float32x3,
            },
        ];
        VertexBufferLayout {
            array_stride: std::mem::size_of::<TriangleVertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: ATTRS,
        }
    }
}

/// Model transform uniform for the triangle pipeline.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TransformUniform {
    /// Column-major 4×4 matrix.
    pub m_transform: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn identity() -> Self {
        Self::from(Mat4::IDENTITY)
    }
}

impl From<Mat4> for TransformUniform {
    fn from(m: Mat4) -> Self {
        Self {
            m_transform: m.to_cols_array_2d(),
        }
    }
}

// ───────────────────────────────────────────────────────────────────
// Unit quad
// ───────────────────────────────────────────────────────────────────

/// A single corner of the unit quad (0,0)→(1,1).
///
/// Shared by every glyph instance; the instance supplies position,
/// size and UV range.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct QuadVertex {
    /// Corner in [0, 1] space.
    pub corner: [f32; 2],
}

impl QuadVertex {
    pub const VERTICES: [QuadVertex; 4] = [
        QuadVertex { corner: [0.0, 0.0] }, // top-left
        QuadVertex { corner: [1.0, 0.0] }, // top-right
        QuadVertex { corner: [0.0, 1.0] }, // bottom-left
        QuadVertex { corner: [1.0, 1.0] }, // bottom-right
    ];

    /// Two triangles covering the quad.
    pub const INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

    pub fn layout() -> VertexBufferLayout<'static> {
        static ATTRS: &[VertexAttribute] = &[VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: VertexFormat::Float32x2,
        }];
        VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: ATTRS,
        }
    }
}

// ───────────────────────────────────────────────────────────────────
// Glyph instance
// ───────────────────────────────────────────────────────────────────

/// Per-instance data for one glyph quad.
///
/// 48 bytes per instance.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TextInstance {
    /// Top-left of the glyph quad in pixels.
    pub position: [f32; 2],
    /// Width and height of the quad in pixels.
    pub size: [f32; 2],
    /// Atlas UV top-left.
    pub uv_min: [f32; 2],
    /// Atlas UV bottom-right.
    pub uv_max: [f32; 2],
    /// RGBA text color, each channel in [0.0, 1.0].
    pub color: [f32; 4],
}

impl TextInstance {
    pub fn from_quad(quad: &GlyphQuad, color: [f32; 4]) -> Self {
        Self {
            position: quad.position,
            size: quad.size,
            uv_min: quad.uv_min,
            uv_max: quad.uv_max,
            color,
        }
    }

    pub fn layout() -> VertexBufferLayout<'static> {
        static ATTRS: &[VertexAttribute] = &[
            // location(1) = position
            VertexAttribute {
                offset: 0,
                shader_location: 1,
                format: VertexFormat::Float32x2,
            },
            // location(2) = size
            VertexAttribute {
                offset: 8,
                shader_location: 2,
                format: VertexFormat::Float32x2,
            },
            // location(3) = uv_min
            VertexAttribute {
                offset: 16,
                shader_location: 3,
                format: VertexFormat::Float32x2,
            },
            // location(4) = uv_max
            VertexAttribute {
                offset: 24,
                shader_location: 4,
                format: VertexFormat::Float32x2,
            },
            // location(5) = color
            VertexAttribute {
                offset: 32,
                shader_location: 5,
                format: VertexFormat::Float32x4,
            },
        ];
        VertexBufferLayout {
            array_stride: std::mem::size_of::<TextInstance>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: ATTRS,
        }
    }
}

// ───────────────────────────────────────────────────────────────────
// Screen uniform
// ───────────────────────────────────────────────────────────────────

/// Pixel-space projection sent to the text shader.
///
/// Maps (0,0) to the top-left corner and (width, height) to the
/// bottom-right, y growing downward.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ScreenUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl ScreenUniform {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            view_proj: Self::matrix(width, height).to_cols_array_2d(),
        }
    }

    fn matrix(width: f32, height: f32) -> Mat4 {
        Mat4::orthographic_rh(0.0, width, height, 0.0, -1.0, 1.0)
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    fn project(uniform: &ScreenUniform, x: f32, y: f32) -> Vec3 {
        Mat4::from_cols_array_2d(&uniform.view_proj).transform_point3(Vec3::new(x, y, 0.0))
    }

    #[test]
    fn test_triangle_vertex_size() {
        assert_eq!(std::mem::size_of::<TriangleVertex>(), 24);
    }

    #[test]
    fn test_text_instance_size() {
        assert_eq!(std::mem::size_of::<TextInstance>(), 48);
    }

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<TransformUniform>(), 64);
        assert_eq!(std::mem::size_of::<ScreenUniform>(), 64);
    }

    #[test]
    fn test_triangle_layout_locations() {
        let layout = TriangleVertex::layout();
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[1].shader_location, 1);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.step_mode, VertexStepMode::Vertex);
    }

    #[test]
    fn test_text_instance_layout_locations() {
        let layout = TextInstance::layout();
        assert_eq!(layout.attributes.len(), 5);
        assert_eq!(layout.attributes[0].shader_location, 1); // position
        assert_eq!(layout.attributes[4].shader_location, 5); // color
        assert_eq!(layout.attributes[4].offset, 32);
        assert_eq!(layout.step_mode, VertexStepMode::Instance);
    }

    #[test]
    fn test_quad_layout() {
        let layout = QuadVertex::layout();
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(QuadVertex::INDICES.iter().max(), Some(&3));
    }

    #[test]
    fn test_transform_from_mat4_is_column_major() {
        let m = Mat4::from_translation(Vec3::new(0.5, 0.0, 0.0));
        let uniform = TransformUniform::from(m);
        assert_eq!(uniform.m_transform[3], [0.5, 0.0, 0.0, 1.0]);
        assert_eq!(TransformUniform::identity().m_transform[0], [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_text_instance_from_quad() {
        let quad = GlyphQuad {
            position: [10.0, 20.0],
            size: [8.0, 12.0],
            uv_min: [0.25, 0.0],
            uv_max: [0.3, 1.0],
        };
        let inst = TextInstance::from_quad(&quad, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(inst.position, [10.0, 20.0]);
        assert_eq!(inst.size, [8.0, 12.0]);
        assert_eq!(inst.uv_min, [0.25, 0.0]);
        assert_eq!(inst.uv_max, [0.3, 1.0]);
        assert_eq!(inst.color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_screen_top_left() {
        let p = project(&ScreenUniform::new(640.0, 480.0), 0.0, 0.0);
        assert!((p.x + 1.0).abs() < 1e-5, "x = {}", p.x);
        assert!((p.y - 1.0).abs() < 1e-5, "y = {}", p.y);
    }

    #[test]
    fn test_screen_bottom_right() {
        let p = project(&ScreenUniform::new(640.0, 480.0), 640.0, 480.0);
        assert!((p.x - 1.0).abs() < 1e-5, "x = {}", p.x);
        assert!((p.y + 1.0).abs() < 1e-5, "y = {}", p.y);
    }

    #[test]
    fn test_screen_depth_inside_clip_range() {
        let m = Mat4::from_cols_array_2d(&ScreenUniform::new(640.0, 480.0).view_proj);
        let clip = m * Vec4::new(320.0, 240.0, 0.0, 1.0);
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth), "depth = {depth}");
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
    }

    #[test]
    fn test_text_instance_bytes() {
        let inst = TextInstance {
            position: [1.0, 2.0],
            size: [3.0, 4.0],
            uv_min: [0.1, 0.2],
            uv_max: [0.9, 0.8],
            color: [0.0, 1.0, 0.0, 0.5],
        };
        let bytes = bytemuck::bytes_of(&inst);
        assert_eq!(bytes.len(), 48);
        let floats: &[f32] = bytemuck::cast_slice(bytes);
        assert_eq!(floats[8..], [0.0, 1.0, 0.0, 0.5]);
    }
}
