//! Editor configuration loading from environment variables.

use crate::constants::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_MARGIN, DEFAULT_SIDEBAR_WIDTH,
    DEFAULT_UNDO_LIMIT, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MAX_FONT_SIZE, MIN_FONT_SIZE,
};
use crate::error::EditorError;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Runtime configuration for an editor session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EditorConfig {
    pub window_width: i32,
    pub window_height: i32,
    /// Pixels reserved on the right edge (scrollbar); not available to text.
    pub sidebar_width: i32,
    pub margin: i32,
    pub font_family: String,
    pub font_size: u32,
    pub undo_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            sidebar_width: DEFAULT_SIDEBAR_WIDTH,
            margin: DEFAULT_MARGIN,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            undo_limit: DEFAULT_UNDO_LIMIT,
        }
    }
}

/// Parse a numeric environment value, ignoring surrounding whitespace.
///
/// # Returns
/// `Some(value)` when the variable is set and parses, otherwise `None`.
pub fn env_number<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|raw| raw.trim().parse().ok())
}

impl EditorConfig {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`EditorConfig`] with defaults applied when env vars are
    /// missing or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            window_width: env_number("WRAPEDIT_WINDOW_WIDTH").unwrap_or(defaults.window_width),
            window_height: env_number("WRAPEDIT_WINDOW_HEIGHT").unwrap_or(defaults.window_height),
            sidebar_width: env_number("WRAPEDIT_SIDEBAR_WIDTH").unwrap_or(defaults.sidebar_width),
            margin: env_number("WRAPEDIT_MARGIN").unwrap_or(defaults.margin),
            font_family: env::var("WRAPEDIT_FONT_FAMILY")
                .ok()
                .map(|family| family.trim().to_string())
                .filter(|family| !family.is_empty())
                .unwrap_or(defaults.font_family),
            font_size: env_number("WRAPEDIT_FONT_SIZE").unwrap_or(defaults.font_size),
            undo_limit: env_number("WRAPEDIT_UNDO_LIMIT").unwrap_or(defaults.undo_limit),
        }
    }

    /// Width available to text: the window minus the sidebar reservation.
    pub fn max_content_width(&self) -> i32 {
        self.window_width - self.sidebar_width
    }

    /// Reject values the layout engine cannot work with.
    ///
    /// # Errors
    /// Returns [`EditorError::InvalidConfig`] describing the first bad field.
    pub fn validate(&self) -> Result<(), EditorError> {
        if self.window_width <= 0 || self.window_height <= 0 {
            return Err(EditorError::InvalidConfig(format!(
                "window must be positive, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        if self.sidebar_width < 0 || self.sidebar_width >= self.window_width {
            return Err(EditorError::InvalidConfig(format!(
                "sidebar width {} does not fit window width {}",
                self.sidebar_width, self.window_width
            )));
        }
        if self.margin < 0 {
            return Err(EditorError::InvalidConfig(format!(
                "margin must not be negative, got {}",
                self.margin
            )));
        }
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.font_size) {
            return Err(EditorError::InvalidConfig(format!(
                "font size {} is outside {}..={}",
                self.font_size, MIN_FONT_SIZE, MAX_FONT_SIZE
            )));
        }
        if self.undo_limit == 0 {
            return Err(EditorError::InvalidConfig(
                "undo limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
