//! Rich clipboard copy
//!
//! Sets the sanitized HTML fragment together with a plain-text fallback so
//! word processors and mail clients paste formatted text while plain editors
//! get the visible characters only.

use super::html::generate_html_fragment;
use crate::document::parse;
use crate::error::Result;
use arboard::Clipboard;
use log::debug;

/// HTML and plain-text clipboard payloads for `buffer`.
pub fn clipboard_payload(buffer: &str) -> (String, String) {
    let html = generate_html_fragment(buffer);
    let plain = parse(buffer).plain_text();
    (html, plain)
}

/// Copy the formatted buffer to the system clipboard.
pub fn copy_html_to_clipboard(buffer: &str) -> Result<()> {
    let (html, plain) = clipboard_payload(buffer);
    let mut clipboard = Clipboard::new()?;
    clipboard.set_html(html, Some(plain))?;
    debug!("Copied {} chars of HTML to clipboard", buffer.len());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
