//! Applies the configured theme to the egui context

use eframe::egui::{Context, Visuals};
use log::{debug, info};

use super::{create_visuals, Palette};
use crate::config::Theme;

#[derive(Debug, Clone)]
pub struct ThemeManager {
    current_theme: Theme,
    cached_visuals: Option<Visuals>,
    needs_apply: bool,
    /// Last seen system dark mode, for `Theme::System`
    last_system_dark_mode: Option<bool>,
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        info!("ThemeManager initialized with theme: {:?}", theme);
        Self {
            current_theme: theme,
            cached_visuals: None,
            needs_apply: true,
            last_system_dark_mode: None,
        }
    }

    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    /// Select a theme. Takes effect on the next `apply_if_needed`.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            info!("Theme changed from {:?} to {:?}", self.current_theme, theme);
            self.current_theme = theme;
            self.cached_visuals = None;
            self.needs_apply = true;
        }
    }

    /// Apply visuals when the theme or the system preference changed.
    ///
    /// Returns `true` if visuals were applied.
    pub fn apply_if_needed(&mut self, ctx: &Context) -> bool {
        if self.current_theme == Theme::System {
            let system_dark = ctx.style().visuals.dark_mode;
            if self.last_system_dark_mode != Some(system_dark) {
                self.last_system_dark_mode = Some(system_dark);
                self.cached_visuals = None;
                self.needs_apply = true;
                debug!("System dark mode changed to: {}", system_dark);
            }
        }

        if !self.needs_apply {
            return false;
        }
        let visuals = self.visuals(ctx);
        ctx.set_visuals(visuals);
        self.needs_apply = false;
        debug!("Applied theme: {:?}", self.current_theme);
        true
    }

    fn visuals(&mut self, ctx: &Context) -> Visuals {
        if let Some(visuals) = &self.cached_visuals {
            return visuals.clone();
        }
        let visuals = create_visuals(self.is_dark(ctx));
        self.cached_visuals = Some(visuals.clone());
        visuals
    }

    /// Whether the effective theme is dark.
    pub fn is_dark(&self, ctx: &Context) -> bool {
        match self.current_theme {
            Theme::Dark => true,
            Theme::Light => false,
            Theme::System => ctx.style().visuals.dark_mode,
        }
    }

    pub fn palette(&self, ctx: &Context) -> Palette {
        Palette::for_dark_mode(self.is_dark(ctx))
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
