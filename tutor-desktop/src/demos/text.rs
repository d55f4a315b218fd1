//! Texture atlas text: sample lines drawn from 48, 24 and 12 pixel atlases
//! of one font, comparing sub-pixel origins, texture scaling against
//! native font sizes, and colored and translucent text.

use log::{info, warn};
use tutor_render::{
    push_text, AtlasId, Draw, GpuContext, ScreenUniform, ShaderError, ShaderSource, TextBatch,
    TextPipeline,
};
use tutor_text::{Atlas, GlyphRasterizer};

use super::Scene;

/// Pixel heights of the atlases built at startup.
pub const ATLAS_SIZES: [u32; 3] = [48, 24, 12];

const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const TRANSPARENT_GREEN: [f32; 4] = [0.0, 1.0, 0.0, 0.5];

/// One line of sample text.
#[derive(Clone, Copy, Debug)]
pub struct TextLine {
    pub text: &'static str,
    /// Which atlas to draw from.
    pub pixel_height: u32,
    /// Pen position on the baseline, in pixels from the top-left corner.
    pub origin: [f32; 2],
    pub scale: f32,
    pub color: [f32; 4],
}

const fn line(
    text: &'static str,
    pixel_height: u32,
    origin: [f32; 2],
    scale: f32,
    color: [f32; 4],
) -> TextLine {
    TextLine {
        text,
        pixel_height,
        origin,
        scale,
        color,
    }
}

/// Lines in draw order. The red and green lines near the bottom overlap
/// the black one on purpose.
pub const LINES: [TextLine; 11] = [
    line("The Quick Brown Fox Jumps Over The Lazy Dog", 48, [8.0, 50.0], 1.0, BLACK),
    line("The Misaligned Fox Jumps Over The Lazy Dog", 48, [8.5, 100.5], 1.0, BLACK),
    line("The Small Texture Scaled Fox Jumps Over The Lazy Dog", 48, [8.0, 175.0], 0.5, BLACK),
    line("The Small Font Sized Fox Jumps Over The Lazy Dog", 24, [8.0, 200.0], 1.0, BLACK),
    line("The Tiny Texture Scaled Fox Jumps Over The Lazy Dog", 48, [8.0, 235.0], 0.25, BLACK),
    line("The Tiny Font Sized Fox Jumps Over The Lazy Dog", 12, [8.0, 250.0], 1.0, BLACK),
    line("The Solid Black Fox Jumps Over The Lazy Dog", 48, [8.0, 430.0], 1.0, BLACK),
    line("The Solid Red Fox Jumps Over The Lazy Dog", 48, [8.0, 330.0], 1.0, RED),
    line("The Solid Red Fox Jumps Over The Lazy Dog", 48, [28.0, 450.0], 1.0, RED),
    line("The Transparent Green Fox Jumps Over The Lazy Dog", 48, [8.0, 380.0], 1.0, TRANSPARENT_GREEN),
    line("The Transparent Green Fox Jumps Over The Lazy Dog", 48, [18.0, 440.0], 1.0, TRANSPARENT_GREEN),
];

/// An atlas kept on the CPU for layout, plus its GPU handle.
struct LoadedAtlas {
    id: AtlasId,
    atlas: Atlas,
}

pub struct TextScene {
    pipeline: TextPipeline,
    atlases: Vec<LoadedAtlas>,
}

impl TextScene {
    /// Build one atlas per entry of [`ATLAS_SIZES`] from `font`, upload
    /// them, and lay out [`LINES`].
    pub fn new<R: GlyphRasterizer + ?Sized>(
        gpu: &GpuContext,
        shader: &ShaderSource,
        font: &mut R,
    ) -> Result<Self, ShaderError> {
        let mut pipeline = TextPipeline::new(&gpu.device, gpu.surface_format, shader)?;

        let atlases: Vec<LoadedAtlas> = ATLAS_SIZES
            .iter()
            .map(|&px| {
                let atlas = Atlas::build(&mut *font, px);
                let id = pipeline.add_atlas(&gpu.device, &gpu.queue, &atlas);
                LoadedAtlas { id, atlas }
            })
            .collect();

        let batches = batch_lines(&atlases, &LINES);
        let glyph_count = pipeline.upload(&gpu.queue, &batches);
        info!(
            "Laid out {} line(s): {} glyph(s) in {} batch(es)",
            LINES.len(),
            glyph_count,
            batches.len()
        );

        Ok(Self { pipeline, atlases })
    }
}

impl Scene for TextScene {
    fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32) {
        // Keep one unit per pixel so glyphs stay sharp at any window size.
        self.pipeline
            .set_screen(&gpu.queue, &ScreenUniform::new(width as f32, height as f32));
    }

    fn layers(&self) -> Vec<&dyn Draw> {
        vec![&self.pipeline]
    }
}

fn find_atlas(atlases: &[LoadedAtlas], pixel_height: u32) -> Option<&LoadedAtlas> {
    atlases
        .iter()
        .find(|loaded| loaded.atlas.pixel_height() == pixel_height)
}

fn batch_lines(atlases: &[LoadedAtlas], lines: &[TextLine]) -> Vec<TextBatch> {
    let mut batches = Vec::new();
    for line in lines {
        let Some(loaded) = find_atlas(atlases, line.pixel_height) else {
            warn!("No {}px atlas for line {:?}", line.pixel_height, line.text);
            continue;
        };
        push_text(
            &mut batches,
            loaded.id,
            &loaded.atlas,
            line.text,
            line.origin,
            [line.scale, line.scale],
            line.color,
        );
    }
    batches
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_render::shader::TEXT_WGSL;
    use tutor_render::Renderer;
    use tutor_text::{measure_text, GlyphBitmap, GlyphError};

    /// Every printable glyph is a solid block 60% of the pixel height wide.
    struct Blocks;

    impl GlyphRasterizer for Blocks {
        fn rasterize(&mut self, ch: char, px: u32) -> Result<GlyphBitmap, GlyphError> {
            if ch == ' ' {
                return Ok(GlyphBitmap::blank(px as f32 / 4.0));
            }
            let width = px * 3 / 5;
            Ok(GlyphBitmap {
                width,
                rows: px,
                left: 0,
                top: px as i32 * 3 / 4,
                advance: [(width + 2) as f32, 0.0],
                pixels: vec![200; (width * px) as usize],
            })
        }
    }

    fn visible_glyphs(text: &str) -> usize {
        text.chars().filter(|c| *c != ' ').count()
    }

    #[test]
    fn test_lines_use_built_atlases() {
        for line in &LINES {
            assert!(ATLAS_SIZES.contains(&line.pixel_height), "{}", line.text);
            assert!(line.scale > 0.0);
        }
    }

    #[test]
    fn test_lines_fit_default_window() {
        for line in &LINES {
            assert!(line.origin[1] < crate::config::WINDOW_HEIGHT as f32);
            assert!(line.origin[0] < crate::config::WINDOW_WIDTH as f32);
        }
    }

    #[test]
    fn test_texture_scaled_matches_font_sized_width() {
        // A 48px atlas at 0.25 scale is about as wide as a native 12px one.
        let big = Atlas::build(&mut Blocks, 48);
        let tiny = Atlas::build(&mut Blocks, 12);
        let text = "The Tiny Fox";
        let scaled = measure_text(text, &big, 0.25);
        let native = measure_text(text, &tiny, 1.0);
        assert!((scaled - native).abs() < native * 0.2, "{scaled} vs {native}");
    }

    #[test]
    fn test_scene_uploads_every_visible_glyph() {
        // May fail in CI without GPU, skip gracefully.
        let Ok(gpu) = pollster::block_on(GpuContext::new_headless()) else {
            return;
        };
        let shader = ShaderSource::builtin("text", TEXT_WGSL);
        let scene = TextScene::new(&gpu, &shader, &mut Blocks).unwrap();

        let expected: usize = LINES.iter().map(|l| visible_glyphs(l.text)).sum();
        let batches = batch_lines(&scene.atlases, &LINES);
        let uploaded: usize = batches.iter().map(|b| b.instances.len()).sum();
        assert_eq!(uploaded, expected);
        for px in ATLAS_SIZES {
            assert!(find_atlas(&scene.atlases, px).is_some());
        }
        assert!(find_atlas(&scene.atlases, 36).is_none());
    }

    #[test]
    fn test_batches_follow_atlas_changes() {
        let Ok(gpu) = pollster::block_on(GpuContext::new_headless()) else {
            return;
        };
        let shader = ShaderSource::builtin("text", TEXT_WGSL);
        let scene = TextScene::new(&gpu, &shader, &mut Blocks).unwrap();

        // 48, 48, 48 | 24 | 48 | 12 | 48 ... : five runs of one atlas.
        let batches = batch_lines(&scene.atlases, &LINES);
        assert_eq!(batches.len(), 5);

        let missing = [line("No Such Atlas", 36, [0.0, 0.0], 1.0, BLACK)];
        assert!(batch_lines(&scene.atlases, &missing).is_empty());
    }

    #[test]
    fn test_scene_renders_offscreen() {
        let Ok(gpu) = pollster::block_on(GpuContext::new_headless()) else {
            return;
        };
        let target = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("text_scene_target"),
            size: wgpu::Extent3d {
                width: 640,
                height: 480,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: gpu.surface_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let shader = ShaderSource::builtin("text", TEXT_WGSL);
        let mut scene = TextScene::new(&gpu, &shader, &mut Blocks).unwrap();
        scene.resize(&gpu, 640, 480);

        let glyphs: usize = LINES.iter().map(|l| visible_glyphs(l.text)).sum();
        let stats = Renderer::new().render_to_texture(&gpu, &view, &scene.layers());
        assert_eq!(stats.draw_calls, 5);
        assert_eq!(stats.triangles as usize, glyphs * 2);
    }
}
