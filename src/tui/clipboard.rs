//! System clipboard access for the copy-word action.
//!
//! The handle is kept for the whole session: on X11 and Wayland the copied
//! text is served by the process that owns the clipboard, so dropping it
//! right after `set_text` can lose the content.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(#[from] arboard::Error),

    #[error("Nothing to copy")]
    Empty,
}

/// Lazily opened, long-lived system clipboard.
#[derive(Default)]
pub struct Clipboard {
    inner: Option<arboard::Clipboard>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the system clipboard has been opened.
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// Put `text` on the system clipboard, opening it on first use.
    pub fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        if text.is_empty() {
            return Err(ClipboardError::Empty);
        }
        let mut clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        let result = clipboard.set_text(text.to_owned());
        self.inner = Some(clipboard);
        result?;
        log::debug!("Copied '{}' to clipboard", text);
        Ok(())
    }
}
