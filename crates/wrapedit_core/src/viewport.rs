//! Window geometry and vertical scroll mapping.

use crate::config::EditorConfig;
use crate::constants::MAX_SCROLL_OFFSET;
use tracing::trace;

/// Caret rectangle in window coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CaretRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Visible window over the laid-out document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// 0 shows the top of the document; positive values scroll content up.
    scroll_offset: i32,
    window_width: i32,
    window_height: i32,
    sidebar_width: i32,
}

impl Viewport {
    pub fn new(window_width: i32, window_height: i32, sidebar_width: i32) -> Self {
        Self {
            scroll_offset: 0,
            window_width,
            window_height,
            sidebar_width,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(
            config.window_width,
            config.window_height,
            config.sidebar_width,
        )
    }

    pub fn scroll_offset(&self) -> i32 {
        self.scroll_offset
    }

    pub fn sidebar_width(&self) -> i32 {
        self.sidebar_width
    }

    /// Width available to text.
    pub fn max_content_width(&self) -> i32 {
        self.window_width - self.sidebar_width
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.window_width = width;
        self.window_height = height;
    }

    /// Set the scroll offset directly, clamped to
    /// `[-MAX_SCROLL_OFFSET, MAX_SCROLL_OFFSET]`.
    ///
    /// # Returns
    /// The previous offset.
    pub fn set_scroll(&mut self, offset: i32) -> i32 {
        std::mem::replace(
            &mut self.scroll_offset,
            offset.clamp(-MAX_SCROLL_OFFSET, MAX_SCROLL_OFFSET),
        )
    }

    /// Scroll just far enough for `caret` to sit inside `[0, window_height)`.
    ///
    /// Returns `true` when the offset changed; callers must lay out again and
    /// re-derive the caret.
    pub fn ensure_caret_visible(&mut self, caret: CaretRect) -> bool {
        let bottom = caret.y.saturating_add(caret.height);
        let shift = if caret.y < 0 {
            caret.y
        } else if bottom > self.window_height {
            bottom - self.window_height
        } else {
            return false;
        };
        let previous = self.set_scroll(self.scroll_offset.saturating_add(shift));
        if previous == self.scroll_offset {
            return false;
        }
        trace!(shift, scroll_offset = self.scroll_offset, "caret snap");
        true
    }

    /// Scrollable extent for an external scrollbar.
    pub fn content_extent(&self, line_count: usize, line_height: i32) -> i32 {
        let document = i32::try_from(line_count)
            .unwrap_or(i32::MAX)
            .saturating_mul(line_height);
        self.scroll_offset
            .saturating_add(self.window_height)
            .max(document)
    }
}
