//! User settings and preferences for Inkmark
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::markup::StylePair;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// Follow the operating system
    System,
}

impl Theme {
    /// Next theme in the Light -> Dark -> System cycle.
    pub fn cycle(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting Behavior
// ─────────────────────────────────────────────────────────────────────────────

/// How mark and style toggles decide what to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToggleStrategy {
    /// Search the selected text for the tag and strip or wrap it
    #[default]
    Heuristic,
    /// Parse the buffer and edit the selected characters' formatting
    Structured,
}

impl ToggleStrategy {
    pub fn toggle(&self) -> Self {
        match self {
            ToggleStrategy::Heuristic => ToggleStrategy::Structured,
            ToggleStrategy::Structured => ToggleStrategy::Heuristic,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToggleStrategy::Heuristic => "Tag search",
            ToggleStrategy::Structured => "Structured",
        }
    }
}

/// What the preview pane shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// Formatted text rendered from the span tree
    #[default]
    Rendered,
    /// Canonical markup as text
    Source,
    /// No preview pane
    Hidden,
}

impl PreviewMode {
    /// Next mode in the Rendered -> Source -> Hidden cycle.
    pub fn cycle(&self) -> Self {
        match self {
            PreviewMode::Rendered => PreviewMode::Source,
            PreviewMode::Source => PreviewMode::Hidden,
            PreviewMode::Hidden => PreviewMode::Rendered,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PreviewMode::Rendered => "Rendered",
            PreviewMode::Source => "Source",
            PreviewMode::Hidden => "Hidden",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: f32,
    pub height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 640.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// Serialized to JSON in the user's config directory. Missing fields fall
/// back to `Default` via `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    pub theme: Theme,

    /// Font size of the raw editor (in points)
    pub font_size: f32,

    pub preview_mode: PreviewMode,

    // ─────────────────────────────────────────────────────────────────────────
    // Formatting
    // ─────────────────────────────────────────────────────────────────────────
    /// Size and color the toolbar starts with
    pub default_style: StylePair,

    pub toggle_strategy: ToggleStrategy,

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────
    /// Buffer content when the editor opens
    pub initial_text: String,

    /// Maximum undo history entries
    pub max_undo_size: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Window State
    // ─────────────────────────────────────────────────────────────────────────
    pub window_size: WindowSize,

    // ─────────────────────────────────────────────────────────────────────────
    // Export Settings
    // ─────────────────────────────────────────────────────────────────────────
    /// Last directory used for HTML export
    pub last_export_directory: Option<PathBuf>,

    /// Whether to open exported files after export
    pub open_after_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: 14.0,
            preview_mode: PreviewMode::default(),

            default_style: StylePair::default(),
            toggle_strategy: ToggleStrategy::default(),

            initial_text: String::new(),
            max_undo_size: 100,

            window_size: WindowSize::default(),

            last_export_directory: None,
            open_after_export: false,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    pub const MIN_FONT_SIZE: f32 = 8.0;
    pub const MAX_FONT_SIZE: f32 = 72.0;
    pub const MIN_UNDO_SIZE: usize = 1;
    pub const MAX_UNDO_SIZE: usize = 1000;

    /// Clamp every value into its valid range.
    pub fn sanitize(&mut self) {
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.default_style.size = self
            .default_style
            .size
            .clamp(StylePair::MIN_SIZE, StylePair::MAX_SIZE);

        self.max_undo_size = self
            .max_undo_size
            .clamp(Self::MIN_UNDO_SIZE, Self::MAX_UNDO_SIZE);

        if self.window_size.width < 200.0 || self.window_size.height < 150.0 {
            self.window_size = WindowSize::default();
        }
    }

    /// Deserialize and then sanitize.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Rgb;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.font_size, 14.0);
        assert_eq!(settings.default_style, StylePair::new(16, Rgb::BLACK));
        assert_eq!(settings.toggle_strategy, ToggleStrategy::Heuristic);
        assert_eq!(settings.preview_mode, PreviewMode::Rendered);
    }

    #[test]
    fn test_theme_cycle() {
        assert_eq!(Theme::Light.cycle(), Theme::Dark);
        assert_eq!(Theme::Dark.cycle(), Theme::System);
        assert_eq!(Theme::System.cycle(), Theme::Light);
    }

    #[test]
    fn test_preview_mode_cycle() {
        let mode = PreviewMode::Rendered.cycle().cycle().cycle();
        assert_eq!(mode, PreviewMode::Rendered);
    }

    #[test]
    fn test_strategy_toggle() {
        assert_eq!(ToggleStrategy::Heuristic.toggle(), ToggleStrategy::Structured);
        assert_eq!(ToggleStrategy::Structured.toggle(), ToggleStrategy::Heuristic);
    }

    #[test]
    fn test_serialization_uses_lowercase_enums() {
        let settings = Settings {
            theme: Theme::Dark,
            toggle_strategy: ToggleStrategy::Structured,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"theme\":\"dark\""));
        assert!(json.contains("\"toggle_strategy\":\"structured\""));
        assert!(json.contains("\"color\":\"#000000\""));
    }

    #[test]
    fn test_roundtrip() {
        let settings = Settings {
            default_style: StylePair::new(20, Rgb::new(0xff, 0, 0)),
            initial_text: "<strong>hi</strong>".to_string(),
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, back);
    }

    #[test]
    fn test_sanitize_font_size() {
        let mut settings = Settings::default();
        settings.font_size = 4.0;
        settings.sanitize();
        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);

        settings.font_size = 100.0;
        settings.sanitize();
        assert_eq!(settings.font_size, Settings::MAX_FONT_SIZE);
    }

    #[test]
    fn test_sanitize_style_size() {
        let mut settings = Settings::default();
        settings.default_style.size = 1;
        settings.sanitize();
        assert_eq!(settings.default_style.size, StylePair::MIN_SIZE);

        settings.default_style.size = 500;
        settings.sanitize();
        assert_eq!(settings.default_style.size, StylePair::MAX_SIZE);
    }

    #[test]
    fn test_sanitize_window_size() {
        let mut settings = Settings::default();
        settings.window_size.width = 10.0;
        settings.sanitize();
        assert_eq!(settings.window_size, WindowSize::default());
    }

    #[test]
    fn test_from_json_sanitized() {
        let json = r#"{"font_size": 4.0, "max_undo_size": 0}"#;
        let settings = Settings::from_json_sanitized(json).unwrap();
        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);
        assert_eq!(settings.max_undo_size, Settings::MIN_UNDO_SIZE);
    }

    #[test]
    fn test_invalid_color_rejected() {
        let json = r#"{"default_style": {"size": 16, "color": "red"}}"#;
        assert!(Settings::from_json_sanitized(json).is_err());
    }
}
