//! Main application module for Inkmark
//!
//! Implements `eframe::App`: a toolbar on top, a status bar at the bottom and
//! the raw editor beside the preview in the middle.

use crate::config::{PreviewMode, WindowSize};
use crate::editor::EditorWidget;
use crate::export::{copy_html_to_clipboard, export_to_html_file};
use crate::markup::{Mark, StyleProperty};
use crate::preview::show_preview;
use crate::state::AppState;
use crate::string_utils::char_count;
use crate::theme::ThemeManager;
use crate::ui::{SettingsPanel, Toolbar, ToolbarAction, ToolbarContext};
use eframe::egui;
use log::{debug, info, warn};

/// How long settings may stay dirty before they are written, in seconds.
const SETTINGS_SAVE_INTERVAL: f64 = 5.0;

/// Keyboard shortcut actions detected before the editor sees the input.
#[derive(Debug, Clone, Copy, PartialEq)]
enum KeyboardAction {
    /// Toggle a mark (Ctrl+B / Ctrl+I / Ctrl+U)
    ToggleMark(Mark),
    /// Undo (Ctrl+Z)
    Undo,
    /// Redo (Ctrl+Y or Ctrl+Shift+Z)
    Redo,
    /// Export as HTML (Ctrl+Shift+E)
    ExportHtml,
    /// Copy as HTML (Ctrl+Shift+C)
    CopyAsHtml,
    /// Cycle preview mode (Ctrl+E)
    CyclePreview,
    /// Cycle theme (Ctrl+Shift+T)
    CycleTheme,
    /// Open settings panel (Ctrl+,)
    OpenSettings,
}

pub struct InkmarkApp {
    state: AppState,
    theme_manager: ThemeManager,
    toolbar: Toolbar,
    settings_panel: SettingsPanel,
    /// Application start time for toasts and periodic saves
    start_time: std::time::Instant,
    last_settings_save: f64,
    last_window_size: Option<egui::Vec2>,
    last_window_pos: Option<egui::Pos2>,
}

impl InkmarkApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        info!("Initializing Inkmark");

        let state = AppState::new();
        let mut theme_manager = ThemeManager::new(state.settings.theme);
        theme_manager.apply_if_needed(&cc.egui_ctx);
        info!("Applied initial theme: {:?}", state.settings.theme);

        Self {
            state,
            theme_manager,
            toolbar: Toolbar::new(),
            settings_panel: SettingsPanel::new(),
            start_time: std::time::Instant::now(),
            last_settings_save: 0.0,
            last_window_size: None,
            last_window_pos: None,
        }
    }

    /// Elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn toast(&mut self, message: impl Into<String>, duration: f64) {
        let time = self.get_app_time();
        self.state.show_toast(message, time, duration);
    }

    /// Copy window size and position into settings when they change.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let Some(rect) = ctx.input(|i| i.viewport().outer_rect) else {
            return;
        };
        let size = rect.size();
        let pos = rect.min;

        let size_changed = self
            .last_window_size
            .map_or(true, |s| (s - size).length() > 1.0);
        let pos_changed = self
            .last_window_pos
            .map_or(true, |p| (p - pos).length() > 1.0);
        if !size_changed && !pos_changed {
            return;
        }

        // The first observation only seeds the tracker
        let first = self.last_window_size.is_none();
        self.last_window_size = Some(size);
        self.last_window_pos = Some(pos);
        if first {
            return;
        }

        let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
        self.state.settings.window_size = WindowSize {
            width: size.x,
            height: size.y,
            x: Some(pos.x),
            y: Some(pos.y),
            maximized,
        };
        self.state.mark_settings_dirty();
        debug!(
            "Window state updated: {}x{} at ({}, {}), maximized: {}",
            size.x, size.y, pos.x, pos.y, maximized
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Consume shortcut keys so the text widget does not also act on them.
    fn read_keyboard_shortcut(ctx: &egui::Context) -> Option<KeyboardAction> {
        use egui::{Key, Modifiers};
        let command_shift = Modifiers::COMMAND | Modifiers::SHIFT;

        ctx.input_mut(|i| {
            // Shifted combinations first, they are the more specific ones
            if i.consume_key(command_shift, Key::E) {
                debug!("Keyboard shortcut: Ctrl+Shift+E (Export HTML)");
                return Some(KeyboardAction::ExportHtml);
            }
            if i.consume_key(command_shift, Key::C) {
                debug!("Keyboard shortcut: Ctrl+Shift+C (Copy as HTML)");
                return Some(KeyboardAction::CopyAsHtml);
            }
            if i.consume_key(command_shift, Key::T) {
                debug!("Keyboard shortcut: Ctrl+Shift+T (Cycle Theme)");
                return Some(KeyboardAction::CycleTheme);
            }
            if i.consume_key(command_shift, Key::Z) {
                debug!("Keyboard shortcut: Ctrl+Shift+Z (Redo)");
                return Some(KeyboardAction::Redo);
            }

            for &mark in Mark::all() {
                let key = match mark {
                    Mark::Bold => Key::B,
                    Mark::Italic => Key::I,
                    Mark::Underline => Key::U,
                };
                if i.consume_key(Modifiers::COMMAND, key) {
                    debug!("Keyboard shortcut: {} ({:?})", mark.shortcut_label(), mark);
                    return Some(KeyboardAction::ToggleMark(mark));
                }
            }

            if i.consume_key(Modifiers::COMMAND, Key::Z) {
                debug!("Keyboard shortcut: Ctrl+Z (Undo)");
                return Some(KeyboardAction::Undo);
            }
            if i.consume_key(Modifiers::COMMAND, Key::Y) {
                debug!("Keyboard shortcut: Ctrl+Y (Redo)");
                return Some(KeyboardAction::Redo);
            }
            if i.consume_key(Modifiers::COMMAND, Key::E) {
                debug!("Keyboard shortcut: Ctrl+E (Cycle Preview)");
                return Some(KeyboardAction::CyclePreview);
            }
            if i.consume_key(Modifiers::COMMAND, Key::Comma) {
                debug!("Keyboard shortcut: Ctrl+, (Open Settings)");
                return Some(KeyboardAction::OpenSettings);
            }
            None
        })
    }

    fn handle_keyboard_action(&mut self, action: KeyboardAction, ctx: &egui::Context) {
        match action {
            KeyboardAction::ToggleMark(mark) => self.handle_toggle_mark(mark),
            KeyboardAction::Undo => self.handle_undo(),
            KeyboardAction::Redo => self.handle_redo(),
            KeyboardAction::ExportHtml => self.handle_export_html(ctx),
            KeyboardAction::CopyAsHtml => self.handle_copy_as_html(ctx),
            KeyboardAction::CyclePreview => self.handle_cycle_preview(),
            KeyboardAction::CycleTheme => self.handle_cycle_theme(),
            KeyboardAction::OpenSettings => self.state.toggle_settings(),
        }
    }

    fn handle_toolbar_action(&mut self, action: ToolbarAction, ctx: &egui::Context) {
        debug!("Toolbar action: {:?}", action);
        match action {
            ToolbarAction::ToggleMark(mark) => self.handle_toggle_mark(mark),
            ToolbarAction::SetStyle(property) => self.handle_set_style(property),
            ToolbarAction::Undo => self.handle_undo(),
            ToolbarAction::Redo => self.handle_redo(),
            ToolbarAction::ExportHtml => self.handle_export_html(ctx),
            ToolbarAction::CopyAsHtml => self.handle_copy_as_html(ctx),
            ToolbarAction::CyclePreview => self.handle_cycle_preview(),
            ToolbarAction::ToggleStrategy => {
                let strategy = self.state.formatter.strategy().toggle();
                self.state.set_strategy(strategy);
                self.toast(format!("Toggle behavior: {}", strategy.label()), 1.5);
            }
            ToolbarAction::CycleTheme => self.handle_cycle_theme(),
            ToolbarAction::OpenSettings => self.state.toggle_settings(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Handlers
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_toggle_mark(&mut self, mark: Mark) {
        if !self.state.toggle_mark(mark) {
            self.toast("Select some text first", 1.5);
        }
    }

    /// The picked size/color is remembered even without a selection.
    fn handle_set_style(&mut self, property: StyleProperty) {
        if !self.state.set_style(property) {
            let style = self.state.formatter.style();
            self.toast(
                format!("Next style: {}px {}", style.size, style.color),
                1.5,
            );
        }
    }

    fn handle_undo(&mut self) {
        if self.state.draft.undo() {
            debug!("Undo performed");
        } else {
            self.toast("Nothing to undo", 1.5);
            debug!("Undo requested but stack is empty");
        }
    }

    fn handle_redo(&mut self) {
        if self.state.draft.redo() {
            debug!("Redo performed");
        } else {
            self.toast("Nothing to redo", 1.5);
            debug!("Redo requested but stack is empty");
        }
    }

    fn handle_cycle_preview(&mut self) {
        let mode = self.state.settings.preview_mode.cycle();
        self.state.update_settings(|s| s.preview_mode = mode);
        self.toast(format!("Preview: {}", mode.label()), 1.5);
    }

    fn handle_cycle_theme(&mut self) {
        let theme = self.theme_manager.current_theme().cycle();
        self.theme_manager.set_theme(theme);
        self.state.update_settings(|s| s.theme = theme);
        self.toast(format!("Theme: {}", theme.label()), 1.5);
        info!("Theme cycled to: {:?}", theme);
    }

    fn handle_export_html(&mut self, ctx: &egui::Context) {
        let dialog = rfd::FileDialog::new()
            .add_filter("HTML Files", &["html", "htm"])
            .set_file_name("document.html");
        let dialog = match &self.state.settings.last_export_directory {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        };

        let Some(path) = dialog.save_file() else {
            debug!("Export cancelled");
            return;
        };

        let dark = self.theme_manager.is_dark(ctx);
        match export_to_html_file(&self.state.draft.content, &path, dark) {
            Ok(()) => {
                if let Some(parent) = path.parent() {
                    let parent = parent.to_path_buf();
                    self.state
                        .update_settings(|s| s.last_export_directory = Some(parent));
                }
                self.toast(format!("Exported to {}", path.display()), 2.5);

                if self.state.settings.open_after_export {
                    if let Err(e) = open::that(&path) {
                        warn!("Failed to open exported file: {}", e);
                    }
                }
            }
            Err(e) => {
                warn!("HTML export failed: {}", e);
                self.state.show_error(format!("Export failed:\n{}", e));
            }
        }
    }

    fn handle_copy_as_html(&mut self, ctx: &egui::Context) {
        match copy_html_to_clipboard(&self.state.draft.content) {
            Ok(()) => {
                info!("Copied HTML to clipboard");
                self.toast("HTML copied to clipboard", 2.0);
            }
            Err(e) => {
                // Fall back to egui's clipboard, plain markup only
                warn!("Failed to copy HTML to clipboard: {}", e);
                ctx.output_mut(|o| o.copied_text = self.state.draft.content.clone());
                self.toast(format!("Copied markup only: {}", e), 3.0);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn render_ui(&mut self, ctx: &egui::Context) -> Option<ToolbarAction> {
        let is_dark = self.theme_manager.is_dark(ctx);
        let palette = self.theme_manager.palette(ctx);

        let toolbar_cx = ToolbarContext {
            formatting: self.state.formatting_state(),
            style: self.state.formatter.style(),
            strategy: self.state.formatter.strategy(),
            preview_mode: self.state.settings.preview_mode,
            can_undo: self.state.draft.can_undo(),
            can_redo: self.state.draft.can_redo(),
            has_selection: self.state.draft.has_selection(),
            is_dark,
        };
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| self.toolbar.show(ui, &toolbar_cx))
            .inner;

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let (start, end) = self.state.draft.selection;
                if start == end {
                    ui.label(format!("Cursor {}", start));
                } else {
                    ui.label(format!("Selected {}..{} ({} chars)", start, end, end - start));
                }

                if let Some(toast) = &self.state.ui.toast_message {
                    ui.with_layout(
                        egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                        |ui| {
                            ui.label(egui::RichText::new(toast).italics());
                        },
                    );
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(self.state.formatter.strategy().label());
                    ui.separator();
                    ui.label(format!("{} chars", char_count(&self.state.draft.content)));
                });
            });
        });

        let font_size = self.state.settings.font_size;
        let preview_mode = self.state.settings.preview_mode;
        let editor_id = egui::Id::new("inkmark_editor");
        egui::CentralPanel::default().show(ctx, |ui| {
            if preview_mode == PreviewMode::Hidden {
                EditorWidget::new(&mut self.state.draft)
                    .font_size(font_size)
                    .palette(palette)
                    .id(editor_id)
                    .show(ui);
                return;
            }

            ui.columns(2, |columns| {
                EditorWidget::new(&mut self.state.draft)
                    .font_size(font_size)
                    .palette(palette)
                    .id(editor_id)
                    .show(&mut columns[0]);
                show_preview(
                    &mut columns[1],
                    &self.state.draft.content,
                    preview_mode,
                    font_size,
                    &palette,
                );
            });
        });

        toolbar_action
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if self.state.ui.show_error_modal {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new("⚠").size(24.0));
                    ui.label(&self.state.ui.error_message);
                    ui.separator();
                    if ui.button("OK").clicked() {
                        self.state.dismiss_error();
                    }
                });
        }

        if self.state.ui.show_settings {
            let is_dark = self.theme_manager.is_dark(ctx);
            let output = self
                .settings_panel
                .show(ctx, &mut self.state.settings, is_dark);

            if output.changed {
                self.state.apply_settings();
                self.theme_manager.set_theme(self.state.settings.theme);
            }

            if output.reset_requested {
                self.state.reset_settings();
                self.theme_manager.set_theme(self.state.settings.theme);
                self.toast("Settings reset to defaults", 2.0);
            }

            if output.close_requested {
                self.state.ui.show_settings = false;
            }
        }
    }
}

impl eframe::App for InkmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme_manager.apply_if_needed(ctx);

        let current_time = self.get_app_time();
        self.state.update_toast(current_time);
        self.update_window_state(ctx);

        // Read shortcuts before the editor so it never sees them
        let shortcut = if self.state.ui.show_settings {
            None
        } else {
            Self::read_keyboard_shortcut(ctx)
        };
        if let Some(action) = shortcut {
            self.handle_keyboard_action(action, ctx);
        }

        let toolbar_action = self.render_ui(ctx);

        // Toolbar actions run after the editor reported this frame's selection
        if let Some(action) = toolbar_action {
            self.handle_toolbar_action(action, ctx);
        }

        self.render_dialogs(ctx);

        if self.state.settings_dirty()
            && current_time - self.last_settings_save > SETTINGS_SAVE_INTERVAL
        {
            self.state.save_settings_if_dirty();
            self.last_settings_save = current_time;
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.shutdown();
    }
}
