//! Error types for the editing engine.
use thiserror::Error;

/// Top-level editor error type.
///
/// Precondition violations (deleting at the document start, moving past
/// either end, undo on an empty stack) are not errors; they surface as
/// [`crate::CommandOutcome::Ignored`].
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Layout inconsistency: no start recorded for visual line {line}")]
    LayoutInconsistency { line: usize },

    #[error("Invalid command on line {line}: {message}")]
    InvalidCommand { line: usize, message: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
