//! Shared constants used across wrapedit crates.

/// Horizontal inset, in pixels, between the window's left edge and text.
pub const DEFAULT_MARGIN: i32 = 5;

/// Default window width in pixels.
pub const DEFAULT_WINDOW_WIDTH: i32 = 500;
/// Default window height in pixels.
pub const DEFAULT_WINDOW_HEIGHT: i32 = 500;

/// Width reserved on the right for an external scrollbar.
pub const DEFAULT_SIDEBAR_WIDTH: i32 = 10;

/// Default font family handed to the measurement collaborator.
pub const DEFAULT_FONT_FAMILY: &str = "Verdana";
/// Default font size in points.
pub const DEFAULT_FONT_SIZE: u32 = 20;
/// Step applied by the `font+` / `font-` shortcuts.
pub const FONT_SIZE_STEP: i32 = 4;
/// Smallest font size `SetFontSize` will shrink to.
pub const MIN_FONT_SIZE: u32 = 4;
/// Largest font size `SetFontSize` will grow to.
pub const MAX_FONT_SIZE: u32 = 512;

/// Largest scroll offset magnitude, in pixels. Keeps row arithmetic inside
/// `i32` for any window the layout accepts.
pub const MAX_SCROLL_OFFSET: i32 = 1 << 28;

/// Maximum number of entries kept on the undo stack.
pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// Caret rectangle width in pixels.
pub const CARET_WIDTH: i32 = 1;

/// Glyph sampled to derive the line height for a font.
pub const LINE_HEIGHT_SAMPLE: char = 'x';
