//! Font loading and per-character rasterization.
//!
//! A [`FontFace`] owns a private `cosmic-text` [`FontSystem`] whose
//! database holds exactly the faces of one font file, so no system font
//! ever substitutes for a missing character. Each character is shaped on
//! its own and rendered through [`SwashCache`] into an 8-bit coverage
//! bitmap.

use std::io;
use std::path::{Path, PathBuf};

use cosmic_text::{
    fontdb, Attrs, Buffer, Family, FontSystem, LayoutGlyph, Metrics, Shaping, Stretch, Style,
    SwashCache, SwashContent, Weight,
};
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("Could not open font {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No usable font face in {0}")]
    NoFaces(String),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphError {
    #[error("Loading character {0:?} failed: shaping produced no glyph")]
    Missing(char),
    #[error("Loading character {0:?} failed: pixel height must be non-zero")]
    ZeroHeight(char),
}

/// One rasterized character: coverage bitmap plus placement metrics.
///
/// `left`/`top` are the bearings from the pen position; `top` counts
/// upward from the baseline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub rows: u32,
    pub left: i32,
    pub top: i32,
    /// Pen displacement in whole pixels.
    pub advance: [f32; 2],
    /// Row-major coverage, `width * rows` bytes.
    pub pixels: Vec<u8>,
}

impl GlyphBitmap {
    /// An invisible glyph (e.g. space) that only moves the pen.
    pub fn blank(advance_x: f32) -> Self {
        Self {
            advance: [advance_x, 0.0],
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.rows == 0
    }
}

/// Anything that can turn a character into a coverage bitmap.
///
/// [`FontFace`] is the real implementation; the atlas only depends on
/// this trait.
pub trait GlyphRasterizer {
    fn rasterize(&mut self, ch: char, pixel_height: u32) -> Result<GlyphBitmap, GlyphError>;
}

/// A single font file loaded for rasterization.
pub struct FontFace {
    font_system: FontSystem,
    swash_cache: SwashCache,
    family: String,
    // Attributes of the loaded face. Font matching needs all of them to
    // find anything but an upright, normal-width face.
    style: Style,
    weight: Weight,
    stretch: Stretch,
}

impl FontFace {
    /// Load the font file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| FontError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data, &path.display().to_string())
    }

    /// Load a font from in-memory file contents. `origin` only names the
    /// font in errors and logs.
    pub fn from_bytes(data: Vec<u8>, origin: &str) -> Result<Self, FontError> {
        let mut db = fontdb::Database::new();
        db.load_font_data(data);

        let (family, style, weight, stretch) = db
            .faces()
            .find_map(|face| {
                let (name, _) = face.families.first()?;
                Some((name.clone(), face.style, face.weight, face.stretch))
            })
            .ok_or_else(|| FontError::NoFaces(origin.to_string()))?;

        debug!(
            "Loaded font family {family:?} ({style:?}, {}, {stretch:?}) from {origin} ({} face(s))",
            weight.0,
            db.len()
        );

        Ok(Self {
            font_system: FontSystem::new_with_locale_and_db(String::from("en-US"), db),
            swash_cache: SwashCache::new(),
            family,
            style,
            weight,
            stretch,
        })
    }

    /// Family name of the loaded face.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Shape `ch` alone and return its single layout glyph.
    fn shape_char(&mut self, ch: char, pixel_height: f32) -> Option<LayoutGlyph> {
        let metrics = Metrics::new(pixel_height, pixel_height);
        let attrs = Attrs::new()
            .family(Family::Name(&self.family))
            .style(self.style)
            .weight(self.weight)
            .stretch(self.stretch);

        let mut utf8 = [0u8; 4];
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(
            &mut self.font_system,
            ch.encode_utf8(&mut utf8),
            attrs,
            Shaping::Basic,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        let glyph = buffer
            .layout_runs()
            .flat_map(|run| run.glyphs.iter())
            .next()
            .cloned();
        glyph
    }
}

impl GlyphRasterizer for FontFace {
    fn rasterize(&mut self, ch: char, pixel_height: u32) -> Result<GlyphBitmap, GlyphError> {
        if pixel_height == 0 {
            return Err(GlyphError::ZeroHeight(ch));
        }

        // Unmapped characters shape to glyph 0 (.notdef) and are drawn as such.
        let glyph = self
            .shape_char(ch, pixel_height as f32)
            .ok_or(GlyphError::Missing(ch))?;

        let advance_x = glyph.w.floor();
        let physical = glyph.physical((0.0, 0.0), 1.0);

        let image = match self
            .swash_cache
            .get_image(&mut self.font_system, physical.cache_key)
        {
            Some(image) => image,
            None => return Ok(GlyphBitmap::blank(advance_x)),
        };

        let width = image.placement.width;
        let rows = image.placement.height;
        if width == 0 || rows == 0 {
            return Ok(GlyphBitmap::blank(advance_x));
        }

        Ok(GlyphBitmap {
            width,
            rows,
            left: physical.x + image.placement.left,
            top: image.placement.top,
            advance: [advance_x, 0.0],
            pixels: coverage(image.content, &image.data, (width * rows) as usize),
        })
    }
}

/// Reduce a swash image to one coverage byte per pixel.
fn coverage(content: SwashContent, data: &[u8], pixel_count: usize) -> Vec<u8> {
    match content {
        SwashContent::Mask => data.iter().copied().take(pixel_count).collect(),
        SwashContent::SubpixelMask => data
            .chunks_exact(4)
            .take(pixel_count)
            .map(|px| px[0].max(px[1]).max(px[2]))
            .collect(),
        SwashContent::Color => data
            .chunks_exact(4)
            .take(pixel_count)
            .map(|px| px[3])
            .collect(),
    }
}

// ===================================================================
// Tests
// ===================================================================
