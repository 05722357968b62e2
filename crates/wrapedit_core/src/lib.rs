//! Word-wrapping text editing engine.
//!
//! The document is a doubly linked chain of characters. Each command edits
//! the chain or moves the cursor, then a layout pass assigns every character
//! a pixel box, wraps whole words at the right edge, and the viewport keeps
//! the caret on screen.

/// Configuration loading and defaults.
pub mod config;
/// Shared numeric defaults.
pub mod constants;
/// Cursor position, caret derivation and navigation.
pub mod cursor;
/// Editing session and command routing.
pub mod editor;
/// Error types.
pub mod error;
/// Bounded undo/redo log.
pub mod history;
/// Command vocabulary and script parsing.
pub mod input;
/// Word-wrapping layout and the line index.
pub mod layout;
/// Glyph measurement collaborator.
pub mod measure;
/// Load/save pass-through.
pub mod persist;
/// Render snapshots.
pub mod render;
/// The character chain.
pub mod sequence;
/// Scroll mapping.
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::EditorConfig;
pub use editor::{CommandOutcome, Editor};
pub use error::EditorError;
pub use input::{commands_from_script, commands_from_text, EditCommand};
pub use measure::{CellMeasure, FixedMeasure, FontSpec, Measure};
pub use render::RenderFrame;
