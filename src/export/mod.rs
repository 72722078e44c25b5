//! Export of the formatted buffer
//!
//! - `html.rs` - Standalone HTML documents and fragments
//! - `clipboard.rs` - Rich clipboard copy

pub mod clipboard;
pub mod html;

pub use clipboard::copy_html_to_clipboard;
pub use html::export_to_html_file;
