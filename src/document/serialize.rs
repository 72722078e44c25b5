//! Glyphs back to markup
//!
//! Output nests wrappers in a fixed order (style, then strong, em, u) and keeps
//! a wrapper open across neighboring runs that share it, so
//! `a` bold + `b` bold-italic becomes `<strong>a<em>b</em></strong>`.

use super::node::Glyph;
use crate::markup::{Mark, StylePair};

/// How text characters are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// Decoded text is escaped, verbatim source is written back unchanged.
    /// Parsing the output yields the same glyphs.
    Source,
    /// Everything is escaped and newlines become `<br>`. Only recognized
    /// formatting tags reach the output.
    Html,
}

/// Serialized markup plus, for every glyph, the character range it occupies
/// in the output.
#[derive(Debug, Clone, Default)]
pub struct Serialized {
    pub markup: String,
    pub spans: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrapper {
    Style(StylePair),
    Mark(Mark),
}

impl Wrapper {
    fn open(&self) -> String {
        match self {
            Wrapper::Style(pair) => format!("<span style=\"{}\">", pair.css()),
            Wrapper::Mark(mark) => format!("<{}>", mark.tag()),
        }
    }

    fn close(&self) -> String {
        match self {
            Wrapper::Style(_) => "</span>".to_string(),
            Wrapper::Mark(mark) => format!("</{}>", mark.tag()),
        }
    }
}

fn wrappers_for(glyph: &Glyph) -> Vec<Wrapper> {
    glyph
        .style
        .map(Wrapper::Style)
        .into_iter()
        .chain(glyph.marks.iter().map(Wrapper::Mark))
        .collect()
}

/// Output buffer that keeps a running character count.
struct Writer {
    out: String,
    chars: usize,
}

impl Writer {
    fn push(&mut self, s: &str) {
        self.out.push_str(s);
        self.chars += s.chars().count();
    }
}

fn escape_char(ch: char) -> Option<&'static str> {
    match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    }
}

fn html_escape_char(ch: char) -> Option<&'static str> {
    match ch {
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        '\n' => Some("<br>\n"),
        _ => escape_char(ch),
    }
}

/// Write glyphs as markup.
pub fn serialize(glyphs: &[Glyph], escape: Escape) -> Serialized {
    let mut writer = Writer {
        out: String::new(),
        chars: 0,
    };
    let mut open: Vec<Wrapper> = Vec::new();
    let mut spans = Vec::with_capacity(glyphs.len());

    for glyph in glyphs {
        let wanted = wrappers_for(glyph);
        let shared = open
            .iter()
            .zip(&wanted)
            .take_while(|(a, b)| a == b)
            .count();

        while open.len() > shared {
            if let Some(wrapper) = open.pop() {
                writer.push(&wrapper.close());
            }
        }
        for wrapper in &wanted[shared..] {
            writer.push(&wrapper.open());
            open.push(*wrapper);
        }

        let start = writer.chars;
        let escaped = match escape {
            Escape::Source if glyph.raw => None,
            Escape::Source => escape_char(glyph.ch),
            Escape::Html => html_escape_char(glyph.ch),
        };
        match escaped {
            Some(entity) => writer.push(entity),
            None => {
                writer.out.push(glyph.ch);
                writer.chars += 1;
            }
        }
        spans.push((start, writer.chars));
    }

    while let Some(wrapper) = open.pop() {
        writer.push(&wrapper.close());
    }

    Serialized {
        markup: writer.out,
        spans,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;
    use crate::markup::Rgb;

    fn source(markup: &str) -> String {
        serialize(&parse(markup).glyphs(), Escape::Source).markup
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(source("Hello world"), "Hello world");
    }

    #[test]
    fn test_shared_wrapper_stays_open() {
        assert_eq!(
            source("<strong>a</strong><strong><em>b</em></strong>"),
            "<strong>a<em>b</em></strong>"
        );
    }

    #[test]
    fn test_canonical_order_and_aliases() {
        assert_eq!(source("<u><b>x</b></u>"), "<strong><u>x</u></strong>");
        assert_eq!(
            source("<em><span style=\"color:#ff0000\">x</span></em>"),
            "<span style=\"font-size:16px;color:#ff0000\"><em>x</em></span>"
        );
    }

    #[test]
    fn test_source_keeps_raw_and_reescapes_entities() {
        assert_eq!(source("R&D &lt;tag&gt; <div>"), "R&D &lt;tag&gt; <div>");
    }

    #[test]
    fn test_html_escapes_everything() {
        let glyphs = parse("<div>\"hi\"</div>\n<strong>x</strong>").glyphs();
        let html = serialize(&glyphs, Escape::Html).markup;
        assert_eq!(
            html,
            "&lt;div&gt;&quot;hi&quot;&lt;/div&gt;<br>\n<strong>x</strong>"
        );
    }

    #[test]
    fn test_spans_track_glyph_positions() {
        let glyph = |ch, bold| Glyph {
            ch,
            marks: if bold {
                crate::document::MarkSet::default().with(Mark::Bold)
            } else {
                Default::default()
            },
            style: None,
            raw: false,
        };
        let out = serialize(&[glyph('a', false), glyph('&', true)], Escape::Source);
        assert_eq!(out.markup, "a<strong>&amp;</strong>");
        assert_eq!(out.spans, vec![(0, 1), (9, 14)]);
    }

    #[test]
    fn test_style_wrapper_css() {
        let glyphs = parse("<span style=\"font-size:20px;color:#000000\">x</span>").glyphs();
        assert_eq!(glyphs[0].style, Some(StylePair::new(20, Rgb::BLACK)));
        assert_eq!(
            serialize(&glyphs, Escape::Source).markup,
            "<span style=\"font-size:20px;color:#000000\">x</span>"
        );
    }
}
