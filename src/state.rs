//! Application state for Inkmark
//!
//! `Draft` is the markup buffer being edited together with its selection and
//! undo history. `AppState` ties the draft to settings, the toolbar's
//! formatter and transient UI state such as toasts.

use crate::config::{load_config, save_config_silent, Settings, ToggleStrategy};
use crate::markup::{
    detect_formatting_state, Formatter, FormattingState, Mark, SelectionHost, StyleProperty,
};
use crate::string_utils::char_count;
use log::{debug, info, warn};

// ─────────────────────────────────────────────────────────────────────────────
// Draft
// ─────────────────────────────────────────────────────────────────────────────

/// The markup buffer and its editing state.
#[derive(Debug, Clone)]
pub struct Draft {
    /// Raw buffer, tags included
    pub content: String,
    /// Current selection as ordered character offsets (equal when collapsed)
    pub selection: (usize, usize),
    /// Selection the editor widget should apply on the next frame
    pending_selection: Option<(usize, usize)>,
    undo_stack: Vec<String>,
    redo_stack: Vec<String>,
    max_undo_size: usize,
    /// Incremented whenever the content is replaced from outside the editor
    content_version: u64,
    /// Whether the editor should request focus on next frame
    pub needs_focus: bool,
    /// Range left selected by the last style edit, while nothing else changed
    style_run: Option<(usize, usize)>,
    /// Fold the next content change into the current undo entry
    merge_next_change: bool,
}

impl Draft {
    pub fn new(content: impl Into<String>, max_undo_size: usize) -> Self {
        Self {
            content: content.into(),
            selection: (0, 0),
            pending_selection: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo_size: max_undo_size.max(1),
            content_version: 0,
            needs_focus: true,
            style_run: None,
            merge_next_change: false,
        }
    }

    /// Replace the content, pushing the old one onto the undo stack.
    pub fn set_content(&mut self, new_content: String) {
        if new_content == self.content {
            return;
        }
        let old = std::mem::replace(&mut self.content, new_content);
        if self.merge_next_change {
            self.redo_stack.clear();
        } else {
            self.push_undo(old);
        }
        self.style_run = None;
        self.content_version = self.content_version.wrapping_add(1);
    }

    /// Record an edit the editor widget already applied in place.
    ///
    /// `old_content` is the buffer before the widget changed it.
    pub fn record_edit(&mut self, old_content: String) {
        if old_content != self.content {
            self.push_undo(old_content);
            self.style_run = None;
        }
    }

    fn push_undo(&mut self, old: String) {
        self.undo_stack.push(old);
        if self.undo_stack.len() > self.max_undo_size {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.content, previous);
        self.redo_stack.push(current);
        self.after_history_move();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.content, next);
        self.undo_stack.push(current);
        self.after_history_move();
        true
    }

    fn after_history_move(&mut self) {
        self.style_run = None;
        self.content_version = self.content_version.wrapping_add(1);
        let len = char_count(&self.content);
        self.selection = (self.selection.0.min(len), self.selection.1.min(len));
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn set_max_undo_size(&mut self, size: usize) {
        self.max_undo_size = size.max(1);
        while self.undo_stack.len() > self.max_undo_size {
            self.undo_stack.remove(0);
        }
    }

    pub fn content_version(&self) -> u64 {
        self.content_version
    }

    /// Selection requested by a formatting command, consumed by the editor.
    pub fn take_pending_selection(&mut self) -> Option<(usize, usize)> {
        self.pending_selection.take()
    }

    pub fn has_selection(&self) -> bool {
        self.selection.0 != self.selection.1
    }
}

impl SelectionHost for Draft {
    fn buffer(&self) -> &str {
        &self.content
    }

    fn selection(&self) -> (usize, usize) {
        self.selection
    }

    fn on_change(&mut self, value: String) {
        self.set_content(value);
    }

    fn select(&mut self, start: usize, end: usize) {
        let range = (start.min(end), start.max(end));
        self.selection = range;
        self.pending_selection = Some(range);
        self.needs_focus = true;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub show_settings: bool,
    pub show_error_modal: bool,
    pub error_message: String,
    /// Temporary toast message (shown in the status bar)
    pub toast_message: Option<String>,
    /// When the toast expires (seconds since app start)
    pub toast_expires_at: Option<f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct AppState {
    pub draft: Draft,
    pub formatter: Formatter,
    pub settings: Settings,
    pub ui: UiState,
    settings_dirty: bool,
}

impl AppState {
    /// Create state with settings loaded from the config file.
    pub fn new() -> Self {
        let settings = load_config();
        info!("AppState initialized with settings");
        debug!(
            "Theme: {:?}, strategy: {:?}, default style: {:?}",
            settings.theme, settings.toggle_strategy, settings.default_style
        );
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: Settings) -> Self {
        let draft = Draft::new(settings.initial_text.clone(), settings.max_undo_size);
        let formatter = Formatter::new(settings.default_style, settings.toggle_strategy);
        Self {
            draft,
            formatter,
            settings,
            ui: UiState::default(),
            settings_dirty: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Formatting
    // ─────────────────────────────────────────────────────────────────────────

    /// Toggle `mark` on the draft's selection. Returns `false` without a selection.
    pub fn toggle_mark(&mut self, mark: Mark) -> bool {
        self.formatter.toggle_mark(&mut self.draft, mark)
    }

    /// Change the toolbar's size or color and apply it to the selection.
    ///
    /// Repeated style edits on the range the previous one left selected
    /// share one undo entry, so dragging the color picker is undone in one
    /// step.
    pub fn set_style(&mut self, property: StyleProperty) -> bool {
        let draft = &mut self.draft;
        draft.merge_next_change = draft.style_run == Some(draft.selection);
        let applied = self.formatter.set_style(&mut *draft, property);
        draft.merge_next_change = false;
        draft.style_run = applied.then_some(draft.selection);
        applied
    }

    pub fn set_strategy(&mut self, strategy: ToggleStrategy) {
        self.formatter.set_strategy(strategy);
        self.update_settings(|s| s.toggle_strategy = strategy);
    }

    /// Which marks and style cover the current selection.
    pub fn formatting_state(&self) -> FormattingState {
        detect_formatting_state(&self.draft.content, self.draft.selection)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings Management
    // ─────────────────────────────────────────────────────────────────────────

    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
        self.apply_settings();
    }

    /// Sanitize settings edited in place and push them into the draft and
    /// formatter.
    pub fn apply_settings(&mut self) {
        self.settings.sanitize();
        self.draft.set_max_undo_size(self.settings.max_undo_size);
        self.formatter.set_strategy(self.settings.toggle_strategy);
        self.settings_dirty = true;
    }

    /// Replace all settings with defaults, keeping the buffer.
    pub fn reset_settings(&mut self) {
        self.settings = Settings::default();
        self.apply_settings();
        info!("Settings reset to defaults");
    }

    pub fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    pub fn settings_dirty(&self) -> bool {
        self.settings_dirty
    }

    /// Save settings if modified. Returns `true` if they were written.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if !self.settings_dirty {
            return false;
        }
        if save_config_silent(&self.settings) {
            self.settings_dirty = false;
            info!("Settings saved");
            return true;
        }
        warn!("Failed to save settings");
        false
    }

    pub fn shutdown(&mut self) {
        self.save_settings_if_dirty();
        info!("AppState shutdown complete");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI State Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_settings(&mut self) {
        self.ui.show_settings = !self.ui.show_settings;
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.ui.error_message = message.into();
        self.ui.show_error_modal = true;
    }

    pub fn dismiss_error(&mut self) {
        self.ui.show_error_modal = false;
        self.ui.error_message.clear();
    }

    /// Show a toast for `duration` seconds from `current_time`.
    pub fn show_toast(&mut self, message: impl Into<String>, current_time: f64, duration: f64) {
        self.ui.toast_message = Some(message.into());
        self.ui.toast_expires_at = Some(current_time + duration);
    }

    /// Clear the toast once it has expired. Call every frame.
    pub fn update_toast(&mut self, current_time: f64) {
        if let Some(expires_at) = self.ui.toast_expires_at {
            if current_time >= expires_at {
                self.clear_toast();
            }
        }
    }

    pub fn clear_toast(&mut self) {
        self.ui.toast_message = None;
        self.ui.toast_expires_at = None;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{Rgb, StylePair};

    fn state_with(text: &str) -> AppState {
        AppState::with_settings(Settings {
            initial_text: text.to_string(),
            ..Settings::default()
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Draft Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_draft_new() {
        let draft = Draft::new("Hello", 10);
        assert_eq!(draft.content, "Hello");
        assert_eq!(draft.selection, (0, 0));
        assert!(!draft.can_undo());
        assert!(draft.needs_focus);
    }

    #[test]
    fn test_set_content_and_undo_redo() {
        let mut draft = Draft::new("a", 10);
        draft.set_content("b".into());
        draft.set_content("c".into());

        assert!(draft.undo());
        assert_eq!(draft.content, "b");
        assert!(draft.undo());
        assert_eq!(draft.content, "a");
        assert!(!draft.undo());

        assert!(draft.redo());
        assert_eq!(draft.content, "b");
        assert!(draft.can_redo());
    }

    #[test]
    fn test_same_content_not_recorded() {
        let mut draft = Draft::new("a", 10);
        draft.set_content("a".into());
        assert!(!draft.can_undo());
        assert_eq!(draft.content_version(), 0);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut draft = Draft::new("a", 10);
        draft.set_content("b".into());
        draft.undo();
        draft.set_content("c".into());
        assert!(!draft.can_redo());
    }

    #[test]
    fn test_undo_limit() {
        let mut draft = Draft::new("0", 2);
        for i in 1..=5 {
            draft.set_content(i.to_string());
        }
        assert!(draft.undo());
        assert!(draft.undo());
        assert!(!draft.undo());
        assert_eq!(draft.content, "3");
    }

    #[test]
    fn test_shrinking_undo_limit_drops_oldest() {
        let mut draft = Draft::new("0", 10);
        for i in 1..=4 {
            draft.set_content(i.to_string());
        }
        draft.set_max_undo_size(1);
        assert!(draft.undo());
        assert_eq!(draft.content, "3");
        assert!(!draft.can_undo());
    }

    #[test]
    fn test_record_edit() {
        let mut draft = Draft::new("ab", 10);
        let old = draft.content.clone();
        draft.content.push('c');
        draft.record_edit(old);
        assert!(draft.undo());
        assert_eq!(draft.content, "ab");
    }

    #[test]
    fn test_undo_clamps_selection() {
        let mut draft = Draft::new("abc", 10);
        draft.set_content("abcdef".into());
        draft.selection = (4, 6);
        draft.undo();
        assert_eq!(draft.selection, (3, 3));
    }

    #[test]
    fn test_host_select_queues_selection() {
        let mut draft = Draft::new("Hello", 10);
        draft.needs_focus = false;
        draft.select(4, 1);
        assert_eq!(draft.selection, (1, 4));
        assert!(draft.needs_focus);
        assert_eq!(draft.take_pending_selection(), Some((1, 4)));
        assert_eq!(draft.take_pending_selection(), None);
    }

    #[test]
    fn test_on_change_records() {
        let mut draft = Draft::new("x", 10);
        draft.on_change("<em>x</em>".into());
        assert_eq!(draft.content, "<em>x</em>");
        assert_eq!(draft.content_version(), 1);
        assert!(draft.can_undo());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // AppState Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_initial_text_from_settings() {
        let state = state_with("<u>hi</u>");
        assert_eq!(state.draft.content, "<u>hi</u>");
        assert!(!state.settings_dirty());
    }

    #[test]
    fn test_bold_toggle_and_undo() {
        let mut state = state_with("Hello world");
        state.draft.selection = (0, 5);

        assert!(state.toggle_mark(Mark::Bold));
        assert_eq!(state.draft.content, "<strong>Hello</strong> world");
        assert_eq!(state.draft.selection, (0, 22));
        assert!(state.formatting_state().is_bold);

        assert!(state.draft.undo());
        assert_eq!(state.draft.content, "Hello world");
    }

    #[test]
    fn test_toggle_without_selection() {
        let mut state = state_with("Hello");
        state.draft.selection = (3, 3);
        assert!(!state.toggle_mark(Mark::Underline));
        assert_eq!(state.draft.content, "Hello");
        assert_eq!(state.draft.content_version(), 0);
        assert!(!state.draft.can_undo());
    }

    #[test]
    fn test_color_change() {
        let mut state = state_with("Hello world");
        state.draft.selection = (6, 11);
        assert!(state.set_style(StyleProperty::Color(Rgb::new(0xff, 0, 0))));
        assert_eq!(
            state.draft.content,
            "Hello <span style=\"font-size:16px;color:#ff0000\">world</span>"
        );
        assert_eq!(
            state.formatting_state().style,
            Some(StylePair::new(16, Rgb::new(0xff, 0, 0)))
        );
    }

    #[test]
    fn test_color_drag_is_one_undo_step() {
        let mut state = state_with("Hello world");
        state.draft.selection = (6, 11);
        for red in [0x10, 0x40, 0x80, 0xc0, 0xff] {
            assert!(state.set_style(StyleProperty::Color(Rgb::new(red, 0, 0))));
        }
        assert_eq!(
            state.draft.content,
            "Hello <span style=\"font-size:16px;color:#ff0000\">world</span>"
        );

        assert!(state.draft.undo());
        assert_eq!(state.draft.content, "Hello world");
        assert!(!state.draft.can_undo());
    }

    #[test]
    fn test_style_after_other_edit_is_new_undo_step() {
        let mut state = state_with("Hello world");
        state.draft.selection = (6, 11);
        assert!(state.set_style(StyleProperty::Size(20)));
        assert!(state.toggle_mark(Mark::Bold));
        let bolded = state.draft.content.clone();
        assert!(state.set_style(StyleProperty::Size(24)));

        assert!(state.draft.undo());
        assert_eq!(state.draft.content, bolded);
    }

    #[test]
    fn test_formatter_starts_from_settings() {
        let state = AppState::with_settings(Settings {
            default_style: StylePair::new(24, Rgb::BLACK),
            toggle_strategy: ToggleStrategy::Structured,
            ..Settings::default()
        });
        assert_eq!(state.formatter.style().size, 24);
        assert_eq!(state.formatter.strategy(), ToggleStrategy::Structured);
    }

    #[test]
    fn test_set_strategy_marks_dirty() {
        let mut state = state_with("");
        state.set_strategy(ToggleStrategy::Structured);
        assert_eq!(state.formatter.strategy(), ToggleStrategy::Structured);
        assert_eq!(state.settings.toggle_strategy, ToggleStrategy::Structured);
        assert!(state.settings_dirty());
    }

    #[test]
    fn test_update_settings_sanitizes() {
        let mut state = state_with("");
        state.update_settings(|s| s.font_size = 1000.0);
        assert_eq!(state.settings.font_size, Settings::MAX_FONT_SIZE);
    }

    #[test]
    fn test_apply_settings_syncs_formatter() {
        let mut state = state_with("");
        state.settings.toggle_strategy = ToggleStrategy::Structured;
        state.apply_settings();
        assert_eq!(state.formatter.strategy(), ToggleStrategy::Structured);
        assert!(state.settings_dirty());
    }

    #[test]
    fn test_reset_settings_keeps_buffer() {
        let mut state = state_with("keep me");
        state.update_settings(|s| s.font_size = 20.0);
        state.reset_settings();
        assert_eq!(state.settings.font_size, Settings::default().font_size);
        assert_eq!(state.draft.content, "keep me");
    }

    #[test]
    fn test_toast_expiry() {
        let mut state = state_with("");
        state.show_toast("Copied", 1.0, 2.0);
        state.update_toast(2.5);
        assert_eq!(state.ui.toast_message.as_deref(), Some("Copied"));
        state.update_toast(3.0);
        assert!(state.ui.toast_message.is_none());
    }

    #[test]
    fn test_error_modal() {
        let mut state = state_with("");
        state.show_error("boom");
        assert!(state.ui.show_error_modal);
        state.dismiss_error();
        assert!(!state.ui.show_error_modal);
        assert!(state.ui.error_message.is_empty());
    }
}
