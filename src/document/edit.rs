//! Structured formatting edits
//!
//! These take the same inputs as the tag-search toggles in `markup::toggle`
//! (the raw buffer and a character selection over it) but decide per visible
//! character instead of searching the selected text for tags. A visible
//! character is selected when its source position lies inside the selection,
//! so a selection that starts or ends inside a tag pair affects exactly the
//! characters it covers.
//!
//! The buffer is written back in canonical form (see [`super::serialize`]).

use super::node::Glyph;
use super::parser::parse_with_offsets;
use super::serialize::{serialize, Escape};
use crate::markup::{FormatOutcome, FormatResult, Mark, StylePair};
use crate::string_utils::normalize_char_range;

/// Toggle `mark` on the visible characters inside `selection`.
///
/// The mark is removed when every selected character already carries it,
/// otherwise it is added to all of them.
pub fn toggle_mark_structured(text: &str, selection: (usize, usize), mark: Mark) -> FormatResult {
    edit_selected(text, selection, |glyphs| {
        let all_marked = glyphs.iter().all(|g| g.marks.contains(mark));
        for glyph in glyphs.iter_mut() {
            glyph.marks.set(mark, !all_marked);
        }
        if all_marked {
            FormatOutcome::Removed
        } else {
            FormatOutcome::Added
        }
    })
}

/// Set the style pair on the visible characters inside `selection`.
///
/// The default pair clears styling instead of recording it.
pub fn apply_style_structured(
    text: &str,
    selection: (usize, usize),
    style: StylePair,
) -> FormatResult {
    let value = (!style.is_default()).then_some(style);
    edit_selected(text, selection, |glyphs| {
        for glyph in glyphs.iter_mut() {
            glyph.style = value;
        }
        if value.is_some() {
            FormatOutcome::Styled
        } else {
            FormatOutcome::Unstyled
        }
    })
}

/// Parse, let `edit` change the selected glyphs, write back.
fn edit_selected(
    text: &str,
    selection: (usize, usize),
    edit: impl FnOnce(&mut [Glyph]) -> FormatOutcome,
) -> FormatResult {
    let (start, end) = normalize_char_range(text, selection.0, selection.1);
    if start == end {
        return FormatResult::no_selection(text);
    }

    let (document, offsets) = parse_with_offsets(text);
    let mut glyphs = document.glyphs();

    // Glyphs are in source order, so the selected ones are contiguous
    let first = offsets.iter().position(|&o| o >= start && o < end);
    let last = offsets.iter().rposition(|&o| o >= start && o < end);
    let (Some(first), Some(last)) = (first, last) else {
        // Only markup was selected
        return FormatResult::no_selection(text);
    };

    let outcome = edit(&mut glyphs[first..=last]);
    let out = serialize(&glyphs, Escape::Source);
    let selection = (out.spans[first].0, out.spans[last].1);

    FormatResult {
        text: out.markup,
        selection: Some(selection),
        outcome,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
