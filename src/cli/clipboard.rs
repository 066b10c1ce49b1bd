//! System clipboard access for copying codes.

use arboard::Clipboard;

use crate::errors::{Result, TfatError};

/// Keeps one clipboard handle open for the lifetime of a command.
///
/// On X11 the copied text only stays available while the handle that
/// set it is alive, so the live display holds on to one.
pub struct CodeClipboard {
    inner: Clipboard,
}

impl CodeClipboard {
    /// Connect to the system clipboard.
    pub fn new() -> Result<Self> {
        let inner = Clipboard::new().map_err(|e| TfatError::ClipboardError(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Replace the clipboard contents with `text`.
    pub fn copy(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text.to_owned())
            .map_err(|e| TfatError::ClipboardError(e.to_string()))
    }
}
