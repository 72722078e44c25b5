//! Inline markup formatting on a plain-text buffer
//!
//! The buffer carries HTML-like tags directly in its text. This module toggles
//! marks (`<strong>`, `<em>`, `<u>`) and rewrites the size/color style wrapper
//! around a selection, and binds those operations to a host text widget.
//!
//! # Example
//! ```ignore
//! use crate::markup::toggle::{apply_style, toggle_mark};
//! use crate::markup::{Mark, Rgb, StylePair};
//!
//! let bold = toggle_mark("Hello world", (0, 5), Mark::Bold);
//! assert_eq!(bold.text, "<strong>Hello</strong> world");
//!
//! let red = apply_style("Hello world", (6, 11), StylePair::new(16, Rgb::new(255, 0, 0)));
//! assert_eq!(
//!     red.text,
//!     "Hello <span style=\"font-size:16px;color:#ff0000\">world</span>"
//! );
//! ```

mod host;
mod mark;
mod toggle;

pub use host::{Formatter, SelectionHost};
pub use mark::{Mark, Rgb, StylePair, StyleProperty};
pub use toggle::{detect_formatting_state, FormatOutcome, FormatResult, FormattingState};
