//! Pen-advance text layout against a strip [`Atlas`].
//!
//! Coordinates are pixels with y growing downward; the origin passed in
//! is the pen position on the baseline of the first character. `scale`
//! multiplies every atlas metric, which is how a 48px atlas is drawn at
//! half or quarter size.

use crate::atlas::Atlas;

/// One textured quad for a visible glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphQuad {
    /// Top-left corner in pixels.
    pub position: [f32; 2],
    /// Width and height in pixels.
    pub size: [f32; 2],
    /// Atlas UV top-left.
    pub uv_min: [f32; 2],
    /// Atlas UV bottom-right.
    pub uv_max: [f32; 2],
}

/// Lay out `text` starting at `origin`, returning a quad per visible glyph.
///
/// Characters outside the atlas range are skipped without moving the pen.
pub fn layout_text(text: &str, atlas: &Atlas, origin: [f32; 2], scale: [f32; 2]) -> Vec<GlyphQuad> {
    let [sx, sy] = scale;
    let [mut x, mut y] = origin;
    let atlas_w = atlas.width() as f32;
    let atlas_h = atlas.height() as f32;

    let mut quads = Vec::with_capacity(text.len());
    for glyph in text.chars().filter_map(|ch| atlas.glyph(ch)) {
        let left = x + glyph.bearing[0] * sx;
        let top = y - glyph.bearing[1] * sy;
        let w = glyph.size[0] * sx;
        let h = glyph.size[1] * sy;

        // advance[1] points up, the pen's y grows down.
        x += glyph.advance[0] * sx;
        y -= glyph.advance[1] * sy;

        // Nothing to draw for glyphs without pixels.
        if w == 0.0 || h == 0.0 {
            continue;
        }

        quads.push(GlyphQuad {
            position: [left, top],
            size: [w, h],
            uv_min: [glyph.tex_x, 0.0],
            uv_max: [glyph.tex_x + glyph.size[0] / atlas_w, glyph.size[1] / atlas_h],
        });
    }
    quads
}

/// Horizontal pen advance of `text` at `scale_x`.
pub fn measure_text(text: &str, atlas: &Atlas, scale_x: f32) -> f32 {
    text.chars()
        .filter_map(|ch| atlas.glyph(ch))
        .map(|glyph| glyph.advance[0] * scale_x)
        .sum()
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{GlyphBitmap, GlyphError, GlyphRasterizer};

    /// Every glyph 4x8 with advance 6, bearing (1, 7); space is blank.
    struct BoxFont;

    impl GlyphRasterizer for BoxFont {
        fn rasterize(&mut self, ch: char, _px: u32) -> Result<GlyphBitmap, GlyphError> {
            if ch == ' ' {
                return Ok(GlyphBitmap::blank(6.0));
            }
            if ch == '~' {
                return Err(GlyphError::Missing(ch));
            }
            Ok(GlyphBitmap {
                width: 4,
                rows: 8,
                left: 1,
                top: 7,
                advance: [6.0, 0.0],
                pixels: vec![255; 32],
            })
        }
    }

    fn atlas() -> Atlas {
        Atlas::build(&mut BoxFont, 8)
    }

    #[test]
    fn test_empty_string() {
        assert!(layout_text("", &atlas(), [0.0, 0.0], [1.0, 1.0]).is_empty());
    }

    #[test]
    fn test_single_glyph_placement() {
        let atlas = atlas();
        let quads = layout_text("A", &atlas, [10.0, 50.0], [1.0, 1.0]);
        assert_eq!(quads.len(), 1);
        let q = quads[0];
        assert_eq!(q.position, [11.0, 43.0]);
        assert_eq!(q.size, [4.0, 8.0]);
        assert_eq!(q.uv_min[1], 0.0);
        assert!((q.uv_max[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pen_advances_between_glyphs() {
        let atlas = atlas();
        let quads = layout_text("AB", &atlas, [0.0, 20.0], [1.0, 1.0]);
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[1].position[0] - quads[0].position[0], 6.0);
        assert_eq!(quads[0].position[1], quads[1].position[1]);
    }

    #[test]
    fn test_space_skipped_but_advances() {
        let atlas = atlas();
        let quads = layout_text("A B", &atlas, [0.0, 20.0], [1.0, 1.0]);
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[1].position[0] - quads[0].position[0], 12.0);
    }

    #[test]
    fn test_failed_glyph_neither_draws_nor_advances() {
        let atlas = atlas();
        let quads = layout_text("A~B", &atlas, [0.0, 20.0], [1.0, 1.0]);
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[1].position[0] - quads[0].position[0], 6.0);
    }

    #[test]
    fn test_non_ascii_skipped() {
        let atlas = atlas();
        let quads = layout_text("AéB", &atlas, [0.0, 20.0], [1.0, 1.0]);
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[1].position[0] - quads[0].position[0], 6.0);
    }

    #[test]
    fn test_scale_multiplies_metrics() {
        let atlas = atlas();
        let quads = layout_text("AB", &atlas, [0.0, 40.0], [0.5, 0.25]);
        assert_eq!(quads[0].size, [2.0, 2.0]);
        assert_eq!(quads[0].position, [0.5, 40.0 - 7.0 * 0.25]);
        assert_eq!(quads[1].position[0] - quads[0].position[0], 3.0);
        // UVs do not depend on scale.
        let unscaled = layout_text("A", &atlas, [0.0, 40.0], [1.0, 1.0]);
        assert_eq!(quads[0].uv_min, unscaled[0].uv_min);
        assert_eq!(quads[0].uv_max, unscaled[0].uv_max);
    }

    #[test]
    fn test_uv_spans_glyph_in_strip() {
        let atlas = atlas();
        let quads = layout_text("B", &atlas, [0.0, 0.0], [1.0, 1.0]);
        let glyph = atlas.glyph('B').unwrap();
        let q = quads[0];
        assert_eq!(q.uv_min[0], glyph.tex_x);
        let expected = glyph.tex_x + 4.0 / atlas.width() as f32;
        assert!((q.uv_max[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_measure_text() {
        let atlas = atlas();
        assert_eq!(measure_text("A B", &atlas, 1.0), 18.0);
        assert_eq!(measure_text("A B", &atlas, 0.5), 9.0);
        assert_eq!(measure_text("", &atlas, 1.0), 0.0);
    }
}
