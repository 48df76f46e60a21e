//! The two clipboard capabilities: the terminal's OSC 52 escape sequence
//! (works over SSH, no feedback) and the native system clipboard via `arboard`.

use std::io::Write;

use base64::Engine;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("System clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("System clipboard write failed: {0}")]
    Write(String),
}

/// Where copied text goes.
pub trait ClipboardSink: Send + Sync {
    /// Ask the terminal to set the clipboard. Fire and forget.
    fn set_system_clipboard(&self, text: &str);

    /// Write the native clipboard; may block, so call it off the event loop.
    fn write_native_clipboard(&self, text: &str) -> Result<(), ClipboardError>;
}

/// OSC 52 format: ESC ] 52 ; c ; <base64-data> ESC \
pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text);
    format!("\x1b]52;c;{}\x1b\\", encoded)
}

/// Default sink: OSC 52 on stdout plus `arboard`
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalClipboard;

impl ClipboardSink for TerminalClipboard {
    fn set_system_clipboard(&self, text: &str) {
        let mut stdout = std::io::stdout();
        let result = stdout
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|_| stdout.flush());
        if let Err(e) = result {
            tracing::debug!(error = %e, "OSC 52 write failed");
        }
    }

    fn write_native_clipboard(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}
