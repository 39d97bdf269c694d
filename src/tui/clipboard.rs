//! System clipboard access through `arboard`
//!
//! A fresh clipboard handle per copy; nothing is held between copies.

use anyhow::{Context, Result};
use arboard::Clipboard;

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    clipboard
        .set_text(text)
        .context("Failed to set clipboard text")?;
    Ok(())
}

/// Copy `text` and describe the outcome as a toast line
pub fn copy_with_feedback(text: &str, what: &str) -> String {
    match copy_to_clipboard(text) {
        Ok(()) => format!("✓ Copied {}", what),
        Err(e) => {
            tracing::warn!("Clipboard copy failed: {:#}", e);
            "✗ Clipboard unavailable".to_string()
        }
    }
}
