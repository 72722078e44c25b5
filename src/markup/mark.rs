//! Formatting intents: inline marks and the size/color style pair.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Marks
// ─────────────────────────────────────────────────────────────────────────────

/// A named inline formatting attribute applied by wrapping text in a tag pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    /// `<strong>`
    Bold,
    /// `<em>`
    Italic,
    /// `<u>`
    Underline,
}

impl Mark {
    /// Tag name written into the buffer for this mark.
    pub fn tag(&self) -> &'static str {
        match self {
            Mark::Bold => "strong",
            Mark::Italic => "em",
            Mark::Underline => "u",
        }
    }

    /// Tag names accepted as this mark when reading markup.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Mark::Bold => &["strong", "b"],
            Mark::Italic => &["em", "i"],
            Mark::Underline => &["u"],
        }
    }

    /// Look up a mark from a tag name (case-insensitive).
    pub fn from_tag(name: &str) -> Option<Mark> {
        Mark::all()
            .iter()
            .copied()
            .find(|mark| mark.aliases().iter().any(|a| a.eq_ignore_ascii_case(name)))
    }

    pub fn all() -> &'static [Mark] {
        &[Mark::Bold, Mark::Italic, Mark::Underline]
    }

    /// Keyboard shortcut label for the toolbar tooltip.
    pub fn shortcut_label(&self) -> &'static str {
        match self {
            Mark::Bold => "Ctrl+B",
            Mark::Italic => "Ctrl+I",
            Mark::Underline => "Ctrl+U",
        }
    }

    /// Toolbar button glyph.
    pub fn icon(&self) -> &'static str {
        match self {
            Mark::Bold => "B",
            Mark::Italic => "I",
            Mark::Underline => "U",
        }
    }

    pub fn tooltip(&self) -> String {
        let name = match self {
            Mark::Bold => "Bold",
            Mark::Italic => "Italic",
            Mark::Underline => "Underline",
        };
        format!("{} ({})", name, self.shortcut_label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Color
// ─────────────────────────────────────────────────────────────────────────────

/// An sRGB text color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::BLACK
    }
}

/// Error returned when a color string is not `#rgb` or `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color '{}', expected #rrggbb", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| err());
        match hex.len() {
            6 => Ok(Rgb::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            // #abc shorthand expands each digit: #aabbcc
            3 => {
                let expand = |i: usize| channel(&hex[i..=i].repeat(2));
                Ok(Rgb::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Style Pair
// ─────────────────────────────────────────────────────────────────────────────

/// Font size and text color, always applied together as one wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StylePair {
    /// Font size in points (encoded as `px` in markup)
    pub size: u32,
    pub color: Rgb,
}

impl StylePair {
    /// Size that needs no wrapper.
    pub const DEFAULT_SIZE: u32 = 16;
    pub const MIN_SIZE: u32 = 6;
    pub const MAX_SIZE: u32 = 96;

    pub const fn new(size: u32, color: Rgb) -> Self {
        Self { size, color }
    }

    /// Whether this pair equals the unstyled default (16, black).
    pub fn is_default(&self) -> bool {
        self.size == Self::DEFAULT_SIZE && self.color == Rgb::BLACK
    }

    /// Inline `style` attribute value encoding both properties.
    pub fn css(&self) -> String {
        format!("font-size:{}px;color:{}", self.size, self.color)
    }

    /// Read a pair back from a `style` attribute value.
    ///
    /// Properties other than `font-size` and `color` are ignored; a missing
    /// property keeps its default. Sizes are clamped to
    /// `MIN_SIZE..=MAX_SIZE`. Returns `None` when neither is present or a
    /// value cannot be read.
    pub fn from_css(style: &str) -> Option<StylePair> {
        let mut pair = StylePair::default();
        let mut found = false;

        for decl in style.split(';') {
            let Some((name, value)) = decl.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match name.trim().to_ascii_lowercase().as_str() {
                "font-size" => {
                    let number = value
                        .strip_suffix("px")
                        .or_else(|| value.strip_suffix("pt"))
                        .unwrap_or(value)
                        .trim();
                    let size: f32 = number.parse().ok()?;
                    if size.is_nan() {
                        return None;
                    }
                    pair.size = size
                        .round()
                        .clamp(Self::MIN_SIZE as f32, Self::MAX_SIZE as f32)
                        as u32;
                    found = true;
                }
                "color" => {
                    pair.color = value.parse().ok()?;
                    found = true;
                }
                _ => {}
            }
        }

        found.then_some(pair)
    }

    /// Apply one property change, keeping the other.
    pub fn with(mut self, property: StyleProperty) -> Self {
        match property {
            StyleProperty::Size(size) => self.size = size,
            StyleProperty::Color(color) => self.color = color,
        }
        self
    }
}

impl Default for StylePair {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE, Rgb::BLACK)
    }
}

/// A single style property change requested from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleProperty {
    Size(u32),
    Color(Rgb),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_tags() {
        assert_eq!(Mark::Bold.tag(), "strong");
        assert_eq!(Mark::Italic.tag(), "em");
        assert_eq!(Mark::Underline.tag(), "u");
    }

    #[test]
    fn test_mark_from_tag_aliases() {
        assert_eq!(Mark::from_tag("STRONG"), Some(Mark::Bold));
        assert_eq!(Mark::from_tag("b"), Some(Mark::Bold));
        assert_eq!(Mark::from_tag("i"), Some(Mark::Italic));
        assert_eq!(Mark::from_tag("ul"), None);
    }

    #[test]
    fn test_mark_tooltip() {
        assert_eq!(Mark::Underline.tooltip(), "Underline (Ctrl+U)");
    }

    #[test]
    fn test_rgb_parse_and_display() {
        let red: Rgb = "#FF0000".parse().unwrap();
        assert_eq!(red, Rgb::new(255, 0, 0));
        assert_eq!(red.to_string(), "#ff0000");

        let short: Rgb = "#0a3".parse().unwrap();
        assert_eq!(short, Rgb::new(0x00, 0xaa, 0x33));

        assert_eq!("00ff00".parse::<Rgb>().unwrap(), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_rgb_parse_rejects_garbage() {
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert!("".parse::<Rgb>().is_err());
        assert!("#ééé".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_rgb_serde_as_string() {
        let json = serde_json::to_string(&Rgb::new(255, 0, 0)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: Rgb = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(back, Rgb::new(0, 255, 0));
        assert!(serde_json::from_str::<Rgb>("\"red\"").is_err());
    }

    #[test]
    fn test_style_pair_default() {
        let pair = StylePair::default();
        assert!(pair.is_default());
        assert!(!StylePair::new(20, Rgb::BLACK).is_default());
        assert!(!StylePair::new(16, Rgb::new(1, 0, 0)).is_default());
    }

    #[test]
    fn test_style_pair_css() {
        assert_eq!(
            StylePair::new(20, Rgb::BLACK).css(),
            "font-size:20px;color:#000000"
        );
    }

    #[test]
    fn test_style_pair_from_css() {
        assert_eq!(
            StylePair::from_css("font-size:20px;color:#ff0000"),
            Some(StylePair::new(20, Rgb::new(255, 0, 0)))
        );
        assert_eq!(
            StylePair::from_css(" color: #00ff00 "),
            Some(StylePair::new(16, Rgb::new(0, 255, 0)))
        );
        assert_eq!(StylePair::from_css("font-weight:bold"), None);
        assert_eq!(StylePair::from_css("color:blue"), None);
    }

    #[test]
    fn test_style_pair_from_css_clamps_size() {
        let size = |css: &str| StylePair::from_css(css).map(|pair| pair.size);
        assert_eq!(size("font-size:100000px"), Some(StylePair::MAX_SIZE));
        assert_eq!(size("font-size:inf"), Some(StylePair::MAX_SIZE));
        assert_eq!(size("font-size:-4px"), Some(StylePair::MIN_SIZE));
        assert_eq!(size("font-size:0px"), Some(StylePair::MIN_SIZE));
        assert_eq!(size("font-size:NaN"), None);
    }

    #[test]
    fn test_style_pair_with_property() {
        let pair = StylePair::default()
            .with(StyleProperty::Color(Rgb::new(255, 0, 0)))
            .with(StyleProperty::Size(24));
        assert_eq!(pair, StylePair::new(24, Rgb::new(255, 0, 0)));
    }
}
