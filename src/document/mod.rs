//! Structured view of a markup buffer
//!
//! The buffer is parsed into a small tree of typed spans (marks and style
//! pairs over text). The preview renders from this tree rather than handing
//! the raw buffer to a markup renderer, export writes only recognized tags,
//! and the structured edits resolve partial overlaps exactly.
//!
//! # Architecture
//!
//! - `node.rs` - Tree, glyph and run types
//! - `parser.rs` - Tolerant markup parser
//! - `serialize.rs` - Canonical markup / escaped HTML writer
//! - `edit.rs` - Per-character mark and style edits

mod edit;
mod node;
mod parser;
mod serialize;

pub use edit::{apply_style_structured, toggle_mark_structured};
pub use node::{Document, MarkSet};
pub use parser::parse;

use serialize::{serialize, Escape};

impl Document {
    /// Canonical markup for this document.
    pub fn to_markup(&self) -> String {
        serialize(&self.glyphs(), Escape::Source).markup
    }

    /// Escaped HTML carrying only recognized formatting tags.
    pub fn to_safe_html(&self) -> String {
        serialize(&self.glyphs(), Escape::Html).markup
    }
}
