//! Serializable snapshot of what a front end needs to draw.

use crate::sequence::CharSequence;
use crate::viewport::CaretRect;
use serde::Serialize;

/// Placed glyph box in window coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GlyphBox {
    pub ch: char,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    /// Every character in document order, newlines included.
    pub glyphs: Vec<GlyphBox>,
    pub caret: CaretRect,
    pub content_extent: i32,
    pub scroll_offset: i32,
    pub line_count: usize,
}

impl RenderFrame {
    /// Glyph boxes as assigned by the most recent layout pass.
    pub fn glyphs_of(seq: &CharSequence) -> Vec<GlyphBox> {
        seq.iter()
            .map(|(_, node)| GlyphBox {
                ch: node.content(),
                x: node.x(),
                y: node.y(),
                width: node.width(),
                height: node.height(),
            })
            .collect()
    }
}
