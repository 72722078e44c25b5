//! Tag coloring for the raw editor

use crate::theme::Palette;
use eframe::egui::text::{LayoutJob, TextFormat};
use eframe::egui::{Color32, FontId};
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// What a highlighted stretch of the buffer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    Tag,
    /// Quoted attribute value inside a tag
    Attribute,
    Entity,
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?P<tag></?[A-Za-z][A-Za-z0-9]*[^<>]*>)|(?P<entity>&(?:#[0-9]+|#[xX][0-9A-Fa-f]+|[A-Za-z]+);)")
            .expect("markup token pattern is valid")
    })
}

fn quoted_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""[^"]*""#).expect("quoted value pattern is valid"))
}

/// Split `text` into byte ranges by token kind, covering the whole input.
pub fn highlight_spans(text: &str) -> Vec<(Range<usize>, TokenKind)> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in token_pattern().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            spans.push((last..whole.start(), TokenKind::Text));
        }
        if caps.name("entity").is_some() {
            spans.push((whole.range(), TokenKind::Entity));
        } else {
            push_tag(&mut spans, whole.start(), whole.as_str());
        }
        last = whole.end();
    }

    if last < text.len() {
        spans.push((last..text.len(), TokenKind::Text));
    }
    spans
}

fn push_tag(spans: &mut Vec<(Range<usize>, TokenKind)>, offset: usize, tag: &str) {
    let mut last = 0;
    for value in quoted_pattern().find_iter(tag) {
        if value.start() > last {
            spans.push((offset + last..offset + value.start(), TokenKind::Tag));
        }
        spans.push((offset + value.start()..offset + value.end(), TokenKind::Attribute));
        last = value.end();
    }
    if last < tag.len() {
        spans.push((offset + last..offset + tag.len(), TokenKind::Tag));
    }
}

/// Layout job for the raw editor with tags, attribute values and entities colored.
pub fn markup_layout_job(text: &str, font_id: FontId, palette: &Palette) -> LayoutJob {
    let mut job = LayoutJob::default();
    for (range, kind) in highlight_spans(text) {
        let color: Color32 = match kind {
            TokenKind::Text => palette.text,
            TokenKind::Tag => palette.tag,
            TokenKind::Attribute => palette.attribute,
            TokenKind::Entity => palette.entity,
        };
        job.append(
            &text[range],
            0.0,
            TextFormat {
                font_id: font_id.clone(),
                color,
                ..Default::default()
            },
        );
    }
    job
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(&str, TokenKind)> {
        highlight_spans(text)
            .into_iter()
            .map(|(range, kind)| (&text[range], kind))
            .collect()
    }

    #[test]
    fn test_plain_text_single_span() {
        assert_eq!(kinds("Hello"), vec![("Hello", TokenKind::Text)]);
        assert!(highlight_spans("").is_empty());
    }

    #[test]
    fn test_tags_and_text() {
        assert_eq!(
            kinds("<strong>Hi</strong>!"),
            vec![
                ("<strong>", TokenKind::Tag),
                ("Hi", TokenKind::Text),
                ("</strong>", TokenKind::Tag),
                ("!", TokenKind::Text),
            ]
        );
    }

    #[test]
    fn test_attribute_value_split_out() {
        assert_eq!(
            kinds("<span style=\"color:#ff0000\">x</span>"),
            vec![
                ("<span style=", TokenKind::Tag),
                ("\"color:#ff0000\"", TokenKind::Attribute),
                (">", TokenKind::Tag),
                ("x", TokenKind::Text),
                ("</span>", TokenKind::Tag),
            ]
        );
    }

    #[test]
    fn test_entities() {
        assert_eq!(
            kinds("a&amp;b & c"),
            vec![
                ("a", TokenKind::Text),
                ("&amp;", TokenKind::Entity),
                ("b & c", TokenKind::Text),
            ]
        );
    }

    #[test]
    fn test_layout_job_keeps_text() {
        let palette = Palette::light();
        let job = markup_layout_job("<em>x</em>", FontId::monospace(14.0), &palette);
        assert_eq!(job.text, "<em>x</em>");
        assert_eq!(job.sections.len(), 3);
        assert_eq!(job.sections[0].format.color, palette.tag);
        assert_eq!(job.sections[1].format.color, palette.text);
    }
}
