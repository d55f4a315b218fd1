//! Strip atlas: every visible US-ASCII glyph of one font size packed
//! side by side in a single row.
//!
//! Construction is two passes over the rasterized glyphs: the first sums
//! widths (plus 1px of padding per glyph) and takes the tallest bitmap as
//! the texture height, the second copies each bitmap in at its running
//! offset. Glyphs that fail to rasterize are logged and keep an all-zero
//! record. After construction the rasterizer is no longer needed.

use log::{info, warn};

use crate::font::{GlyphBitmap, GlyphRasterizer};

/// First codepoint stored in the atlas (space).
pub const FIRST_CHAR: u32 = 32;
/// One past the last codepoint stored in the atlas.
pub const LAST_CHAR: u32 = 128;
/// Number of glyph records.
pub const GLYPH_COUNT: usize = (LAST_CHAR - FIRST_CHAR) as usize;

/// Horizontal padding after each glyph, in pixels.
const PADDING: u32 = 1;

/// Everything needed to place one glyph and sample it from the atlas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphMetrics {
    /// Pen advance in pixels.
    pub advance: [f32; 2],
    /// Bitmap width and rows in pixels.
    pub size: [f32; 2],
    /// Bitmap left / top bearing in pixels.
    pub bearing: [f32; 2],
    /// Left edge of the glyph in the atlas, normalized by atlas width.
    pub tex_x: f32,
}

/// CPU-side glyph atlas for one font at one pixel height.
pub struct Atlas {
    width: u32,
    height: u32,
    pixel_height: u32,
    /// Coverage, `width * height` bytes, row 0 at the top.
    pixels: Vec<u8>,
    glyphs: [GlyphMetrics; GLYPH_COUNT],
    loaded: usize,
}

impl Atlas {
    /// Rasterize codepoints 32..128 at `pixel_height` and pack them.
    pub fn build<R: GlyphRasterizer + ?Sized>(rasterizer: &mut R, pixel_height: u32) -> Self {
        let bitmaps: Vec<Option<GlyphBitmap>> = (FIRST_CHAR..LAST_CHAR)
            .filter_map(char::from_u32)
            .map(|ch| match rasterizer.rasterize(ch, pixel_height) {
                Ok(bitmap) => Some(bitmap),
                Err(err) => {
                    warn!("{err}");
                    None
                }
            })
            .collect();

        // Minimum size holding every loaded glyph.
        let (width, height) = bitmaps
            .iter()
            .flatten()
            .fold((0u32, 0u32), |(w, h), b| (w + b.width + PADDING, h.max(b.rows)));

        let mut atlas = Self {
            width,
            height,
            pixel_height,
            pixels: vec![0u8; width as usize * height as usize],
            glyphs: [GlyphMetrics::default(); GLYPH_COUNT],
            loaded: 0,
        };

        let mut offset = 0u32;
        for (index, bitmap) in bitmaps.iter().enumerate() {
            let Some(bitmap) = bitmap else {
                continue;
            };
            atlas.blit(offset, bitmap);
            atlas.glyphs[index] = GlyphMetrics {
                advance: bitmap.advance,
                size: [bitmap.width as f32, bitmap.rows as f32],
                bearing: [bitmap.left as f32, bitmap.top as f32],
                tex_x: offset as f32 / width as f32,
            };
            atlas.loaded += 1;
            offset += bitmap.width + PADDING;
        }

        info!(
            "Generated a {} x {} ({} kb) texture atlas",
            width,
            height,
            width * height / 1024
        );

        atlas
    }

    /// Metrics for `ch`, or `None` outside 32..128.
    pub fn glyph(&self, ch: char) -> Option<&GlyphMetrics> {
        let code = ch as u32;
        if (FIRST_CHAR..LAST_CHAR).contains(&code) {
            self.glyphs.get((code - FIRST_CHAR) as usize)
        } else {
            None
        }
    }

    /// Texture width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel height the font was rendered at.
    pub fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    /// Coverage bytes in row-major order.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of glyphs that rasterized successfully.
    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    /// Whether no glyph was loaded (texture would be empty).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn blit(&mut self, offset: u32, bitmap: &GlyphBitmap) {
        if bitmap.is_empty() {
            return;
        }
        let stride = self.width as usize;
        let width = bitmap.width as usize;
        let rows = bitmap.pixels.chunks_exact(width).take(bitmap.rows as usize);
        for (row, src) in rows.enumerate() {
            let start = row * stride + offset as usize;
            self.pixels[start..start + width].copy_from_slice(src);
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
