//! Colors for the editor and preview
//!
//! `Palette` holds the handful of colors the app draws with directly (tag
//! highlighting in the raw editor, the preview's default text and strong
//! text). `ThemeManager` resolves the configured `Theme` and applies egui
//! visuals.

pub mod manager;

pub use manager::ThemeManager;

use eframe::egui::{Color32, Visuals};

// ─────────────────────────────────────────────────────────────────────────────
// Palette
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Default body text
    pub text: Color32,
    /// Text inside `<strong>` when no bold font face is available
    pub strong: Color32,
    /// Tags in the raw editor
    pub tag: Color32,
    /// Attribute values inside tags
    pub attribute: Color32,
    /// Entities such as `&amp;`
    pub entity: Color32,
    /// Markup shown literally in the preview
    pub raw: Color32,
    /// Active toolbar button fill
    pub active: Color32,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            text: Color32::from_rgb(30, 30, 30),
            strong: Color32::from_rgb(0, 0, 0),
            tag: Color32::from_rgb(128, 40, 160),
            attribute: Color32::from_rgb(20, 110, 60),
            entity: Color32::from_rgb(170, 90, 0),
            raw: Color32::from_rgb(130, 130, 130),
            active: Color32::from_rgb(200, 220, 245),
        }
    }

    pub fn dark() -> Self {
        Self {
            text: Color32::from_rgb(210, 210, 210),
            strong: Color32::from_rgb(255, 255, 255),
            tag: Color32::from_rgb(200, 140, 230),
            attribute: Color32::from_rgb(140, 210, 150),
            entity: Color32::from_rgb(230, 170, 90),
            raw: Color32::from_rgb(130, 130, 130),
            active: Color32::from_rgb(50, 80, 120),
        }
    }

    pub fn for_dark_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

/// egui visuals for the light or dark variant.
pub fn create_visuals(dark: bool) -> Visuals {
    let palette = Palette::for_dark_mode(dark);
    let mut visuals = if dark {
        Visuals::dark()
    } else {
        Visuals::light()
    };
    visuals.selection.bg_fill = palette.active;
    visuals
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_variants_differ() {
        assert_ne!(Palette::light().text, Palette::dark().text);
        assert_eq!(Palette::for_dark_mode(true), Palette::dark());
        assert_eq!(Palette::for_dark_mode(false), Palette::light());
    }

    #[test]
    fn test_visuals_mode() {
        assert!(create_visuals(true).dark_mode);
        assert!(!create_visuals(false).dark_mode);
    }
}
