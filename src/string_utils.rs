//! Character/byte offset helpers
//!
//! Selections coming from the host text widget are expressed in character
//! indices (Unicode scalar values), while Rust string slicing works on byte
//! offsets. Everything that slices the buffer goes through these helpers so a
//! selection next to `ø`, `中` or `🎉` never panics.
//!
//! # Example
//! ```ignore
//! use crate::string_utils::char_range_to_byte_range;
//!
//! let text = "Hei på deg";
//! let (start, end) = char_range_to_byte_range(text, 4, 6); // "på"
//! assert_eq!(&text[start..end], "på");
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Index Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Number of characters in `s`.
#[inline]
pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

/// Convert a character index to a byte index.
///
/// Returns the string length if `char_index` is at or beyond the end.
pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection Normalization
// ─────────────────────────────────────────────────────────────────────────────

/// Order and clamp a character range against `s`.
///
/// Host widgets report the anchor and the cursor, so `start` may come after
/// `end`; both ends are also clamped to the character length.
pub fn normalize_char_range(s: &str, start: usize, end: usize) -> (usize, usize) {
    let len = char_count(s);
    let (start, end) = if start > end { (end, start) } else { (start, end) };
    (start.min(len), end.min(len))
}

/// Convert a (normalized) character range into a byte range usable for slicing.
pub fn char_range_to_byte_range(s: &str, start: usize, end: usize) -> (usize, usize) {
    let (start, end) = normalize_char_range(s, start, end);
    (
        char_index_to_byte_index(s, start),
        char_index_to_byte_index(s, end),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_to_byte_ascii() {
        assert_eq!(char_index_to_byte_index("Hello", 0), 0);
        assert_eq!(char_index_to_byte_index("Hello", 3), 3);
        assert_eq!(char_index_to_byte_index("Hello", 5), 5);
        assert_eq!(char_index_to_byte_index("Hello", 99), 5);
    }

    #[test]
    fn test_char_to_byte_multibyte() {
        let s = "Hei på deg"; // 'å' is 2 bytes
        assert_eq!(char_index_to_byte_index(s, 5), 5);
        assert_eq!(char_index_to_byte_index(s, 6), 7);
        assert_eq!(char_index_to_byte_index("🎉x", 1), 4);
    }

    #[test]
    fn test_char_count_counts_scalars() {
        assert_eq!(char_count("Hei på deg"), 10);
        assert_eq!(char_count("🎉x"), 2);
        assert_eq!(char_count(""), 0);
    }

    #[test]
    fn test_normalize_swaps_and_clamps() {
        assert_eq!(normalize_char_range("Hello", 4, 1), (1, 4));
        assert_eq!(normalize_char_range("Hello", 2, 50), (2, 5));
        assert_eq!(normalize_char_range("", 3, 3), (0, 0));
    }

    #[test]
    fn test_char_range_to_byte_range() {
        let text = "Hei på deg";
        let (start, end) = char_range_to_byte_range(text, 4, 6);
        assert_eq!(&text[start..end], "på");

        let (start, end) = char_range_to_byte_range("中文字", 2, 1);
        assert_eq!(&"中文字"[start..end], "文");
    }
}
