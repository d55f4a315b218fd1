//! Layout → GPU bridge: turns `tutor_text` glyph quads into
//! `TextInstance`s grouped by atlas.

use tutor_text::{layout_text, Atlas, GlyphQuad};

use crate::pipelines::text::{AtlasId, TextBatch};
use crate::vertex::TextInstance;

/// Convert laid-out quads into instances of one color.
pub fn collect_instances(quads: &[GlyphQuad], color: [f32; 4]) -> Vec<TextInstance> {
    quads
        .iter()
        .map(|quad| TextInstance::from_quad(quad, color))
        .collect()
}

/// Lay out `text` and append it to the batch for `atlas_id`, creating the
/// batch if needed. Returns the number of glyph instances added.
///
/// `origin` is the pen position on the baseline, in pixels.
pub fn push_text(
    batches: &mut Vec<TextBatch>,
    atlas_id: AtlasId,
    atlas: &Atlas,
    text: &str,
    origin: [f32; 2],
    scale: [f32; 2],
    color: [f32; 4],
) -> usize {
    let quads = layout_text(text, atlas, origin, scale);
    let instances = collect_instances(&quads, color);
    let added = instances.len();

    // Consecutive text in the same atlas shares one draw call.
    match batches.last_mut() {
        Some(batch) if batch.atlas == atlas_id => batch.instances.extend(instances),
        _ => batches.push(TextBatch {
            atlas: atlas_id,
            instances,
        }),
    }
    added
}

// ===================================================================
// Tests
// ===================================================================
