//! # tutor-text
//!
//! CPU side of the atlas text demo. Loads a font file, rasterizes the
//! visible US-ASCII characters with `cosmic-text`, packs them into a
//! single-row strip atlas, and lays out strings as glyph quads.
//!
//! ## Architecture
//!
//! ```text
//! FontFace (cosmic-text FontSystem + SwashCache)
//!     │  GlyphRasterizer::rasterize(ch, px)
//!     ▼
//! Atlas::build ──► strip pixels + [GlyphMetrics; 96]
//!     │
//!     ▼
//! layout_text(str, atlas, origin, scale) ──► Vec<GlyphQuad>
//! ```
//!
//! - **`font`**: font loading and per-character rasterization.
//! - **`atlas`**: the strip atlas and its glyph table.
//! - **`layout`**: pen-advance layout against an atlas.

pub mod atlas;
pub mod font;
pub mod layout;

// Re-exports for ergonomic use.
pub use atlas::{Atlas, GlyphMetrics, FIRST_CHAR, GLYPH_COUNT, LAST_CHAR};
pub use font::{FontError, FontFace, GlyphBitmap, GlyphError, GlyphRasterizer};
pub use layout::{layout_text, measure_text, GlyphQuad};
