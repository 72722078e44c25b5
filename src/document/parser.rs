//! Markup to span tree
//!
//! The parser is tolerant: it never fails. Recognized tags become typed
//! nodes, anything else is kept verbatim as a [`Node::Raw`] leaf so it can be
//! written back unchanged and shown literally by the preview.
//!
//! Recognized:
//! - `<strong>`/`<b>`, `<em>`/`<i>`, `<u>` (any case, attributes ignored)
//! - `<span style="...">` whose style carries `font-size` and/or `color`
//! - `&amp; &lt; &gt; &quot; &#39; &apos; &nbsp;` and numeric entities
//!
//! A closer with no matching opener is verbatim. A closer that matches an
//! opener further up the stack implicitly closes everything above it.
//! Openers still unclosed at the end are closed implicitly.

use super::node::{Document, Node};
use crate::markup::{Mark, StylePair};
use regex::Regex;
use std::sync::OnceLock;

/// A tag-shaped token at the start of the input: `<name attrs>` or `</name>`.
fn tag_token() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^<(/?)([A-Za-z][A-Za-z0-9]*)([^<>]*)>").expect("tag token pattern is valid")
    })
}

fn style_attribute() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)(?:^|\s)style\s*=\s*"([^"]*)""#).expect("style attribute pattern is valid")
    })
}

/// A wrapper the parser knows how to nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrapper {
    Mark(Mark),
    Style(StylePair),
}

/// What a closing tag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closer {
    Mark(Mark),
    Span,
}

impl Closer {
    fn closes(&self, wrapper: &Wrapper) -> bool {
        match (self, wrapper) {
            (Closer::Mark(a), Wrapper::Mark(b)) => a == b,
            (Closer::Span, Wrapper::Style(_)) => true,
            _ => false,
        }
    }
}

enum Token {
    Open(Wrapper),
    Close(Closer),
    Unknown,
}

fn classify(closing: bool, name: &str, attrs: &str) -> Token {
    // `<strong/>` and `<u foo>` style oddities are not formatting
    let attrs_ok = attrs.is_empty() || attrs.starts_with(char::is_whitespace);
    if !attrs_ok || attrs.trim_end().ends_with('/') {
        return Token::Unknown;
    }

    if let Some(mark) = Mark::from_tag(name) {
        return if closing {
            Token::Close(Closer::Mark(mark))
        } else {
            Token::Open(Wrapper::Mark(mark))
        };
    }

    if name.eq_ignore_ascii_case("span") {
        if closing {
            return if attrs.trim().is_empty() {
                Token::Close(Closer::Span)
            } else {
                Token::Unknown
            };
        }
        return style_attribute()
            .captures(attrs)
            .and_then(|caps| StylePair::from_css(&caps[1]))
            .map(|pair| Token::Open(Wrapper::Style(pair)))
            .unwrap_or(Token::Unknown);
    }

    Token::Unknown
}

/// Decode an entity at the start of `input`, returning the char and its byte length.
fn read_entity(input: &str) -> Option<(char, usize)> {
    let end = input.find(';')?;
    // Longest entity we accept is `&#x10FFFF;`
    if end > 9 {
        return None;
    }
    let body = &input[1..end];
    let ch = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let number = body.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some((ch, end + 1))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree Builder
// ─────────────────────────────────────────────────────────────────────────────

struct Frame {
    wrapper: Option<Wrapper>,
    children: Vec<Node>,
}

struct TreeBuilder {
    stack: Vec<Frame>,
    /// Source char offset of every visible character, in document order
    offsets: Vec<usize>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame {
                wrapper: None,
                children: Vec::new(),
            }],
            offsets: Vec::new(),
        }
    }

    fn current(&mut self) -> &mut Vec<Node> {
        let last = self.stack.len() - 1;
        &mut self.stack[last].children
    }

    fn push_text(&mut self, ch: char, offset: usize) {
        self.offsets.push(offset);
        if let Some(Node::Text(text)) = self.current().last_mut() {
            text.push(ch);
            return;
        }
        self.current().push(Node::Text(ch.to_string()));
    }

    fn push_raw(&mut self, source: &str, offset: usize) {
        self.offsets
            .extend((0..source.chars().count()).map(|i| offset + i));
        if let Some(Node::Raw(raw)) = self.current().last_mut() {
            raw.push_str(source);
            return;
        }
        self.current().push(Node::Raw(source.to_string()));
    }

    fn open(&mut self, wrapper: Wrapper) {
        self.stack.push(Frame {
            wrapper: Some(wrapper),
            children: Vec::new(),
        });
    }

    /// Close the nearest frame matching `closer`. Returns `false` if none is open.
    fn close(&mut self, closer: Closer) -> bool {
        let Some(depth) = self
            .stack
            .iter()
            .rposition(|f| f.wrapper.as_ref().is_some_and(|w| closer.closes(w)))
        else {
            return false;
        };
        while self.stack.len() > depth {
            self.pop_frame();
        }
        true
    }

    fn pop_frame(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let node = match frame.wrapper {
            Some(Wrapper::Mark(mark)) => Node::Mark(mark, frame.children),
            Some(Wrapper::Style(pair)) => Node::Style(pair, frame.children),
            None => {
                // Root frame: put it back
                self.stack.push(frame);
                return;
            }
        };
        self.current().push(node);
    }

    fn finish(mut self) -> (Document, Vec<usize>) {
        while self.stack.len() > 1 {
            self.pop_frame();
        }
        let root = self.stack.pop().map(|f| f.children).unwrap_or_default();
        (Document::new(root), self.offsets)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a markup buffer into a span tree.
pub fn parse(markup: &str) -> Document {
    parse_with_offsets(markup).0
}

/// Parse a markup buffer, also returning the source character offset of every
/// visible character (in the order [`Document::glyphs`] yields them).
pub fn parse_with_offsets(markup: &str) -> (Document, Vec<usize>) {
    let mut builder = TreeBuilder::new();
    let mut byte = 0;
    let mut offset = 0;

    while let Some(ch) = markup[byte..].chars().next() {
        let rest = &markup[byte..];

        if ch == '<' {
            if let Some(caps) = tag_token().captures(rest) {
                let token = &caps[0];
                let closing = !caps[1].is_empty();
                match classify(closing, &caps[2], &caps[3]) {
                    Token::Open(wrapper) => builder.open(wrapper),
                    Token::Close(closer) => {
                        if !builder.close(closer) {
                            builder.push_raw(token, offset);
                        }
                    }
                    Token::Unknown => builder.push_raw(token, offset),
                }
                byte += token.len();
                offset += token.chars().count();
                continue;
            }
        }

        if ch == '&' {
            if let Some((decoded, len)) = read_entity(rest) {
                builder.push_text(decoded, offset);
                byte += len;
                // Entities are ASCII
                offset += len;
                continue;
            }
        }

        if matches!(ch, '<' | '>' | '&') {
            builder.push_raw(&rest[..1], offset);
        } else {
            builder.push_text(ch, offset);
        }
        byte += ch.len_utf8();
        offset += 1;
    }

    builder.finish()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Rgb;

    #[test]
    fn test_plain_text() {
        let doc = parse("Hello world");
        assert_eq!(doc.nodes(), &[Node::Text("Hello world".into())]);
    }

    #[test]
    fn test_empty() {
        let (doc, offsets) = parse_with_offsets("");
        assert!(doc.is_empty());
        assert!(offsets.is_empty());
    }

    #[test]
    fn test_marks_and_aliases() {
        let doc = parse("<B>a</b><i>b</I><u>c</u>");
        assert_eq!(
            doc.nodes(),
            &[
                Node::Mark(Mark::Bold, vec![Node::Text("a".into())]),
                Node::Mark(Mark::Italic, vec![Node::Text("b".into())]),
                Node::Mark(Mark::Underline, vec![Node::Text("c".into())]),
            ]
        );
    }

    #[test]
    fn test_style_span() {
        let doc = parse("<span style=\"font-size:20px;color:#ff0000\">hi</span>");
        assert_eq!(
            doc.nodes(),
            &[Node::Style(
                StylePair::new(20, Rgb::new(255, 0, 0)),
                vec![Node::Text("hi".into())]
            )]
        );
    }

    #[test]
    fn test_span_without_usable_style_is_raw() {
        let doc = parse("<span class=\"x\">hi</span>");
        assert_eq!(
            doc.nodes(),
            &[
                Node::Raw("<span class=\"x\">".into()),
                Node::Text("hi".into()),
                Node::Raw("</span>".into())
            ]
        );
    }

    #[test]
    fn test_unknown_tags_are_raw() {
        let doc = parse("a<div>b</div><br/>");
        assert_eq!(doc.plain_text(), "a<div>b</div><br/>");
        assert!(matches!(doc.nodes()[1], Node::Raw(_)));
    }

    #[test]
    fn test_stray_closer_is_raw() {
        let doc = parse("a</strong>b");
        assert_eq!(
            doc.nodes(),
            &[
                Node::Text("a".into()),
                Node::Raw("</strong>".into()),
                Node::Text("b".into())
            ]
        );
    }

    #[test]
    fn test_unclosed_opener_closes_at_end() {
        let doc = parse("<em>open");
        assert_eq!(
            doc.nodes(),
            &[Node::Mark(Mark::Italic, vec![Node::Text("open".into())])]
        );
    }

    #[test]
    fn test_mismatched_closer_closes_inner() {
        let doc = parse("<strong><em>x</strong>y</em>");
        assert_eq!(
            doc.nodes(),
            &[
                Node::Mark(
                    Mark::Bold,
                    vec![Node::Mark(Mark::Italic, vec![Node::Text("x".into())])]
                ),
                Node::Text("y".into()),
                Node::Raw("</em>".into()),
            ]
        );
    }

    #[test]
    fn test_entities_decoded() {
        let doc = parse("a &lt;b&gt; &amp; &#65;&#x42; &nbsp;");
        assert_eq!(doc.plain_text(), "a <b> & AB \u{a0}");
    }

    #[test]
    fn test_bare_ampersand_and_angle_are_raw() {
        let doc = parse("R&D > 1 < 2");
        assert_eq!(doc.plain_text(), "R&D > 1 < 2");
        assert!(doc.nodes().iter().any(|n| matches!(n, Node::Raw(r) if r == "&")));
    }

    #[test]
    fn test_offsets_skip_tags() {
        let (doc, offsets) = parse_with_offsets("a<strong>bc</strong>&amp;");
        assert_eq!(doc.plain_text(), "abc&");
        assert_eq!(offsets, vec![0, 9, 10, 20]);
    }

    #[test]
    fn test_offsets_multibyte() {
        let (_, offsets) = parse_with_offsets("<em>på</em>x");
        assert_eq!(offsets, vec![4, 5, 11]);
    }
}
