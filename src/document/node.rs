//! Span tree types
//!
//! A parsed buffer is a small tree: text leaves, verbatim leaves for markup
//! that is not understood, and typed wrappers for marks and the style pair.
//! Rendering and editing work on the flattened form, one [`Glyph`] per
//! visible character.

use crate::markup::{Mark, StylePair};

// ─────────────────────────────────────────────────────────────────────────────
// Mark Set
// ─────────────────────────────────────────────────────────────────────────────

/// The marks active on a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MarkSet {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl MarkSet {
    pub fn contains(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
        }
    }

    pub fn set(&mut self, mark: Mark, on: bool) {
        match mark {
            Mark::Bold => self.bold = on,
            Mark::Italic => self.italic = on,
            Mark::Underline => self.underline = on,
        }
    }

    pub fn with(mut self, mark: Mark) -> Self {
        self.set(mark, true);
        self
    }

    /// Active marks in canonical nesting order (outermost first).
    pub fn iter(&self) -> impl Iterator<Item = Mark> + '_ {
        Mark::all().iter().copied().filter(|m| self.contains(*m))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree
// ─────────────────────────────────────────────────────────────────────────────

/// One node of the span tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Decoded text
    Text(String),
    /// Source text kept verbatim: unknown tags, stray closers, bare `&` or `>`
    Raw(String),
    /// A mark wrapping its children
    Mark(Mark, Vec<Node>),
    /// A size/color wrapper around its children
    Style(StylePair, Vec<Node>),
}

/// A visible character with the formatting in force on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub marks: MarkSet,
    pub style: Option<StylePair>,
    /// Came from verbatim source rather than decoded text
    pub raw: bool,
}

/// A maximal stretch of characters sharing the same formatting and origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub marks: MarkSet,
    pub style: Option<StylePair>,
    /// Verbatim source shown literally
    pub raw: bool,
}

/// A parsed buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    #[cfg(test)]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Flatten the tree into one glyph per visible character, in order.
    pub fn glyphs(&self) -> Vec<Glyph> {
        let mut out = Vec::new();
        flatten(&self.nodes, MarkSet::default(), None, &mut out);
        out
    }

    /// Styled runs for rendering.
    pub fn runs(&self) -> Vec<Run> {
        runs_from_glyphs(&self.glyphs())
    }

    /// The visible text with all markup removed.
    pub fn plain_text(&self) -> String {
        self.glyphs().iter().map(|g| g.ch).collect()
    }
}

fn flatten(nodes: &[Node], marks: MarkSet, style: Option<StylePair>, out: &mut Vec<Glyph>) {
    for node in nodes {
        match node {
            Node::Text(text) | Node::Raw(text) => {
                let raw = matches!(node, Node::Raw(_));
                out.extend(text.chars().map(|ch| Glyph {
                    ch,
                    marks,
                    style,
                    raw,
                }));
            }
            Node::Mark(mark, children) => flatten(children, marks.with(*mark), style, out),
            // Innermost style wins
            Node::Style(pair, children) => flatten(children, marks, Some(*pair), out),
        }
    }
}

/// Merge adjacent glyphs with equal formatting into runs.
fn runs_from_glyphs(glyphs: &[Glyph]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();

    for glyph in glyphs {
        if let Some(run) = runs.last_mut() {
            if run.marks == glyph.marks && run.style == glyph.style && run.raw == glyph.raw {
                run.text.push(glyph.ch);
                continue;
            }
        }
        runs.push(Run {
            text: glyph.ch.to_string(),
            marks: glyph.marks,
            style: glyph.style,
            raw: glyph.raw,
        });
    }

    runs
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
