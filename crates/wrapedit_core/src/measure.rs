//! Glyph measurement collaborator.
//!
//! The layout engine never inspects fonts itself; it asks a [`Measure`]
//! implementation for the pixel box of each character.

use crate::constants::LINE_HEIGHT_SAMPLE;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

/// Font selection passed through to the measurement collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct FontSpec {
    pub family: String,
    pub size: u32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

/// Pixel box of one glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GlyphMetrics {
    pub width: i32,
    pub height: i32,
}

/// Per-character measurement.
///
/// Must be deterministic for a fixed `(ch, font)` within a layout pass.
pub trait Measure {
    fn measure(&self, ch: char, font: &FontSpec) -> GlyphMetrics;

    /// Row height for `font`, taken from a sample glyph.
    fn line_height(&self, font: &FontSpec) -> i32 {
        self.measure(LINE_HEIGHT_SAMPLE, font).height.max(1)
    }
}

/// Constant cell size regardless of character or font.
///
/// Newlines still measure zero wide so a caret placed after one sits on the
/// left margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedMeasure {
    pub width: i32,
    pub height: i32,
}

impl FixedMeasure {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Measure for FixedMeasure {
    fn measure(&self, ch: char, _font: &FontSpec) -> GlyphMetrics {
        GlyphMetrics {
            width: if ch == '\n' { 0 } else { self.width },
            height: self.height,
        }
    }
}

/// Terminal-style cell metrics scaled by font size.
///
/// One column is `round(size * 0.6)` pixels; wide characters take two
/// columns and control characters take none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellMeasure;

impl CellMeasure {
    fn cell_width(font: &FontSpec) -> i32 {
        (font.size as f32 * 0.6).round() as i32
    }

    fn cell_height(font: &FontSpec) -> i32 {
        (font.size as f32 * 1.2).round() as i32
    }
}

impl Measure for CellMeasure {
    fn measure(&self, ch: char, font: &FontSpec) -> GlyphMetrics {
        let columns = if ch.is_control() {
            0
        } else {
            UnicodeWidthChar::width(ch).unwrap_or(0) as i32
        };
        GlyphMetrics {
            width: columns * Self::cell_width(font),
            height: Self::cell_height(font),
        }
    }
}
