//! Shared test-only helpers for wrapedit_core.

use crate::config::EditorConfig;
use crate::measure::FixedMeasure;
use crate::Editor;
use std::sync::{Mutex, OnceLock};

/// Process-wide lock serializing environment mutation across test threads.
pub(crate) fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

#[allow(unused_unsafe)]
fn write_var(key: &str, value: Option<&str>) {
    // SAFETY: callers hold `env_lock` while the guard is alive.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

/// Restores an environment variable value on drop.
pub(crate) struct EnvGuard {
    key: String,
    previous: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        write_var(key, Some(value));
        Self {
            key: key.to_string(),
            previous,
        }
    }

    pub(crate) fn remove(key: &str) -> Self {
        let previous = std::env::var(key).ok();
        write_var(key, None);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        write_var(&self.key, self.previous.as_deref());
    }
}

/// Editor over 10x20 fixed cells, margin 5 and no sidebar, so
/// `max_content_width == window_width`.
///
/// # Panics
/// Panics if the configuration is rejected.
pub(crate) fn fixed_editor(text: &str, window_width: i32, window_height: i32) -> Editor {
    let config = EditorConfig {
        window_width,
        window_height,
        sidebar_width: 0,
        margin: 5,
        font_family: "test".to_string(),
        font_size: 12,
        undo_limit: 100,
    };
    Editor::with_text(&config, Box::new(FixedMeasure::new(10, 20)), text).expect("editor")
}
