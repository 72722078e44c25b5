//! Selection-scoped markup toggling on the raw buffer
//!
//! The buffer is plain text carrying inline HTML-like tags. A toggle only ever
//! looks at the selected substring: if an opening token of the mark's tag is
//! found there, every token of that tag inside the selection is stripped;
//! otherwise the selection is wrapped once. Nothing outside the selection is
//! read or touched.
//!
//! The presence check is a pattern search, not a parse. A selection whose
//! boundary falls inside an existing tag pair strips or wraps only the part it
//! can see. See [`crate::document`] for the structured alternative.
//!
//! # Usage
//! ```ignore
//! use crate::markup::Mark;
//!
//! let result = toggle_mark("Hello world", (0, 5), Mark::Bold);
//! assert_eq!(result.text, "<strong>Hello</strong> world");
//! assert_eq!(result.selection, Some((0, 22)));
//! ```

use super::mark::{Mark, StylePair};
use crate::string_utils::{char_count, char_range_to_byte_range, normalize_char_range};
use regex::Regex;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Format Result
// ─────────────────────────────────────────────────────────────────────────────

/// What a formatting operation did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOutcome {
    /// The mark was wrapped around the selection.
    Added,
    /// Every token of the mark was stripped from the selection.
    Removed,
    /// A style wrapper now encodes the requested pair.
    Styled,
    /// The requested pair is the default, so the selection carries no wrapper.
    Unstyled,
    /// The selection was empty; the buffer is unchanged.
    NoSelection,
}

/// Result of applying a formatting operation.
#[derive(Debug, Clone)]
pub struct FormatResult {
    /// The full buffer after formatting
    pub text: String,
    /// Character range covering the transformed substring, for reselection
    pub selection: Option<(usize, usize)>,
    pub outcome: FormatOutcome,
}

impl FormatResult {
    /// The buffer unchanged, reporting that there was nothing selected.
    pub fn no_selection(text: &str) -> Self {
        Self {
            text: text.to_string(),
            selection: None,
            outcome: FormatOutcome::NoSelection,
        }
    }

    /// Whether the buffer was transformed. `false` only for an empty selection.
    pub fn is_success(&self) -> bool {
        self.outcome != FormatOutcome::NoSelection
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tag Patterns
// ─────────────────────────────────────────────────────────────────────────────

/// Compiled token patterns for one tag name.
struct TagPatterns {
    /// `<tag>` or `<tag attr...>`, any case
    opening: Regex,
    /// `</tag>`
    closing: Regex,
    /// Either of the above
    any: Regex,
}

impl TagPatterns {
    fn new(tag: &str) -> Self {
        // `(?:\s[^>]*)?` keeps `<u` from matching `<ul>`
        let compile = |pattern: String| {
            Regex::new(&pattern).expect("tag patterns are built from fixed tag names")
        };
        Self {
            opening: compile(format!(r"(?i)<{tag}(?:\s[^>]*)?>")),
            closing: compile(format!(r"(?i)</{tag}\s*>")),
            any: compile(format!(r"(?i)</?{tag}(?:\s[^>]*)?>")),
        }
    }
}

fn mark_patterns(mark: Mark) -> &'static TagPatterns {
    static BOLD: OnceLock<TagPatterns> = OnceLock::new();
    static ITALIC: OnceLock<TagPatterns> = OnceLock::new();
    static UNDERLINE: OnceLock<TagPatterns> = OnceLock::new();

    let cell = match mark {
        Mark::Bold => &BOLD,
        Mark::Italic => &ITALIC,
        Mark::Underline => &UNDERLINE,
    };
    cell.get_or_init(|| TagPatterns::new(mark.tag()))
}

/// Opening `<span style="...">` with the attribute value captured.
fn style_opening() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)<span\s+style\s*=\s*"([^"]*)"\s*>"#)
            .expect("style wrapper pattern is valid")
    })
}

fn style_closing() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)</span\s*>").expect("span closer pattern is valid"))
}

/// Any `<span ...>` opener or `</span>` closer.
fn span_token() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)<span(?:\s[^>]*)?>|</span\s*>").expect("span token pattern is valid")
    })
}

/// Remove style wrapper openers and the closers that pair with them.
///
/// Other spans keep both of their tokens. A closer with no opener inside
/// `selected` ends a wrapper that starts before the selection and is removed
/// as a style closer.
fn strip_style_wrappers(selected: &str) -> String {
    let mut out = String::with_capacity(selected.len());
    let mut open_spans: Vec<bool> = Vec::new();
    let mut last = 0;

    for token in span_token().find_iter(selected) {
        let text = token.as_str();
        let drop = if text.starts_with("</") {
            open_spans.pop().unwrap_or(true)
        } else {
            let is_style = style_opening()
                .find(text)
                .is_some_and(|m| m.start() == 0 && m.end() == text.len());
            open_spans.push(is_style);
            is_style
        };
        if drop {
            out.push_str(&selected[last..token.start()]);
            last = token.end();
        }
    }
    out.push_str(&selected[last..]);
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Toggle Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Add or remove `mark` around the selected text.
///
/// `selection` is a pair of character offsets; the order of the pair does not
/// matter and offsets past the end are clamped. An empty selection returns
/// [`FormatOutcome::NoSelection`] and the buffer unchanged.
pub fn toggle_mark(text: &str, selection: (usize, usize), mark: Mark) -> FormatResult {
    let (start, end) = normalize_char_range(text, selection.0, selection.1);
    if start == end {
        return FormatResult::no_selection(text);
    }

    let (byte_start, byte_end) = char_range_to_byte_range(text, start, end);
    let selected = &text[byte_start..byte_end];
    let patterns = mark_patterns(mark);

    let (replacement, outcome) = if patterns.opening.is_match(selected) {
        let stripped = patterns.any.replace_all(selected, "").into_owned();
        (stripped, FormatOutcome::Removed)
    } else {
        let tag = mark.tag();
        (format!("<{tag}>{selected}</{tag}>"), FormatOutcome::Added)
    };

    splice(text, byte_start, byte_end, start, replacement, outcome)
}

/// Rewrite the style wrapper of the selected text to `style`.
///
/// Any style wrapper token already in the selection is stripped first. A new
/// wrapper encoding both size and color is applied unless `style` is the
/// default pair, in which case the selection ends up unstyled.
pub fn apply_style(text: &str, selection: (usize, usize), style: StylePair) -> FormatResult {
    let (start, end) = normalize_char_range(text, selection.0, selection.1);
    if start == end {
        return FormatResult::no_selection(text);
    }

    let (byte_start, byte_end) = char_range_to_byte_range(text, start, end);
    let selected = &text[byte_start..byte_end];

    let stripped = strip_style_wrappers(selected);

    let (replacement, outcome) = if style.is_default() {
        (stripped, FormatOutcome::Unstyled)
    } else {
        (
            format!("<span style=\"{}\">{}</span>", style.css(), stripped),
            FormatOutcome::Styled,
        )
    };

    splice(text, byte_start, byte_end, start, replacement, outcome)
}

/// Replace `text[byte_start..byte_end]` and report the new character range.
fn splice(
    text: &str,
    byte_start: usize,
    byte_end: usize,
    char_start: usize,
    replacement: String,
    outcome: FormatOutcome,
) -> FormatResult {
    let new_end = char_start + char_count(&replacement);
    let mut new_text =
        String::with_capacity(text.len() - (byte_end - byte_start) + replacement.len());
    new_text.push_str(&text[..byte_start]);
    new_text.push_str(&replacement);
    new_text.push_str(&text[byte_end..]);

    FormatResult {
        text: new_text,
        selection: Some((char_start, new_end)),
        outcome,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting State Detection
// ─────────────────────────────────────────────────────────────────────────────

/// Formatting found at the current selection, used to highlight the toolbar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormattingState {
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_underline: bool,
    /// Style pair encoded by the nearest style wrapper, if any
    pub style: Option<StylePair>,
}

impl FormattingState {
    pub fn has(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.is_bold,
            Mark::Italic => self.is_italic,
            Mark::Underline => self.is_underline,
        }
    }

    fn set(&mut self, mark: Mark, value: bool) {
        match mark {
            Mark::Bold => self.is_bold = value,
            Mark::Italic => self.is_italic = value,
            Mark::Underline => self.is_underline = value,
        }
    }
}

/// Detect formatting for a selection.
///
/// For a non-empty selection this is the same presence check a toggle would
/// perform. For a caret, a mark counts as active when its last opening token
/// before the caret has not been closed yet.
pub fn detect_formatting_state(text: &str, selection: (usize, usize)) -> FormattingState {
    let (start, end) = normalize_char_range(text, selection.0, selection.1);
    let (byte_start, byte_end) = char_range_to_byte_range(text, start, end);
    let mut state = FormattingState::default();

    if start != end {
        let selected = &text[byte_start..byte_end];
        for &mark in Mark::all() {
            state.set(mark, mark_patterns(mark).opening.is_match(selected));
        }
        state.style = style_opening()
            .captures(selected)
            .and_then(|caps| StylePair::from_css(&caps[1]));
        return state;
    }

    let before = &text[..byte_start];
    for &mark in Mark::all() {
        let patterns = mark_patterns(mark);
        state.set(mark, is_open_before(before, &patterns.opening, &patterns.closing));
    }
    if is_open_before(before, style_opening(), style_closing()) {
        state.style = style_opening()
            .captures_iter(before)
            .last()
            .and_then(|caps| StylePair::from_css(&caps[1]));
    }
    state
}

/// Whether the last opening token in `before` comes after the last closing one.
fn is_open_before(before: &str, opening: &Regex, closing: &Regex) -> bool {
    let last_open = opening.find_iter(before).last().map(|m| m.start());
    let last_close = closing.find_iter(before).last().map(|m| m.start());
    match (last_open, last_close) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
