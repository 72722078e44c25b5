//! Formatting toolbar
//!
//! Mark buttons highlight when the selection already carries the mark, the
//! size box and color button show the pair the next style change applies.

use crate::config::{PreviewMode, ToggleStrategy};
use crate::markup::{FormattingState, Mark, Rgb, StylePair, StyleProperty};
use crate::theme::Palette;
use eframe::egui::{self, Color32, Response, RichText, Ui, Vec2};

const TOOLBAR_HEIGHT: f32 = 36.0;

const BUTTON_SIZE: Vec2 = Vec2::new(28.0, 24.0);

/// Sizes offered in the size box.
pub const SIZE_PRESETS: [u32; 14] = [8, 9, 10, 11, 12, 14, 16, 18, 20, 24, 28, 36, 48, 72];

/// Actions that can be triggered from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolbarAction {
    ToggleMark(Mark),
    SetStyle(StyleProperty),
    Undo,
    Redo,
    ExportHtml,
    CopyAsHtml,
    CyclePreview,
    ToggleStrategy,
    CycleTheme,
    OpenSettings,
}

/// What the toolbar needs to know to draw itself.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarContext {
    pub formatting: FormattingState,
    /// Pair the next style change applies
    pub style: StylePair,
    pub strategy: ToggleStrategy,
    pub preview_mode: PreviewMode,
    pub can_undo: bool,
    pub can_redo: bool,
    pub has_selection: bool,
    pub is_dark: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Toolbar;

impl Toolbar {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut Ui, cx: &ToolbarContext) -> Option<ToolbarAction> {
        let mut action = None;
        let palette = Palette::for_dark_mode(cx.is_dark);
        let separator_color = if cx.is_dark {
            Color32::from_rgb(70, 70, 70)
        } else {
            Color32::from_rgb(210, 210, 210)
        };

        ui.horizontal(|ui| {
            ui.set_height(TOOLBAR_HEIGHT);
            ui.spacing_mut().item_spacing.x = 2.0;

            // ─────────────────────────────────────────────────────────────────
            // Edit
            // ─────────────────────────────────────────────────────────────────
            if icon_button(ui, "↩", "Undo (Ctrl+Z)", cx.can_undo).clicked() {
                action = Some(ToolbarAction::Undo);
            }
            if icon_button(ui, "↪", "Redo (Ctrl+Y)", cx.can_redo).clicked() {
                action = Some(ToolbarAction::Redo);
            }

            vertical_separator(ui, separator_color);

            // ─────────────────────────────────────────────────────────────────
            // Marks
            // ─────────────────────────────────────────────────────────────────
            for &mark in Mark::all() {
                let active = cx.formatting.has(mark);
                if mark_button(ui, mark, active, cx.has_selection, &palette).clicked() {
                    action = Some(ToolbarAction::ToggleMark(mark));
                }
            }

            vertical_separator(ui, separator_color);

            // ─────────────────────────────────────────────────────────────────
            // Size and color
            // ─────────────────────────────────────────────────────────────────
            let mut size = cx.style.size;
            egui::ComboBox::from_id_source("style_size")
                .selected_text(format!("{}px", size))
                .width(64.0)
                .show_ui(ui, |ui| {
                    for preset in SIZE_PRESETS {
                        ui.selectable_value(&mut size, preset, format!("{}px", preset));
                    }
                })
                .response
                .on_hover_text("Font size");
            if size != cx.style.size {
                action = Some(ToolbarAction::SetStyle(StyleProperty::Size(size)));
            }

            let mut rgb = [cx.style.color.r, cx.style.color.g, cx.style.color.b];
            if egui::color_picker::color_edit_button_srgb(ui, &mut rgb)
                .on_hover_text("Text color")
                .changed()
            {
                let color = Rgb::new(rgb[0], rgb[1], rgb[2]);
                action = Some(ToolbarAction::SetStyle(StyleProperty::Color(color)));
            }

            vertical_separator(ui, separator_color);

            // ─────────────────────────────────────────────────────────────────
            // Export
            // ─────────────────────────────────────────────────────────────────
            if icon_button(ui, "🌐", "Export as HTML (Ctrl+Shift+E)", true).clicked() {
                action = Some(ToolbarAction::ExportHtml);
            }
            if icon_button(ui, "📋", "Copy as HTML (Ctrl+Shift+C)", true).clicked() {
                action = Some(ToolbarAction::CopyAsHtml);
            }

            // ─────────────────────────────────────────────────────────────────
            // View and settings (right-aligned)
            // ─────────────────────────────────────────────────────────────────
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(8.0);
                if icon_button(ui, "⚙", "Settings (Ctrl+,)", true).clicked() {
                    action = Some(ToolbarAction::OpenSettings);
                }
                if icon_button(ui, "🎨", "Change Theme (Ctrl+Shift+T)", true).clicked() {
                    action = Some(ToolbarAction::CycleTheme);
                }
                let preview_label = format!("Preview: {}", cx.preview_mode.label());
                if ui
                    .small_button(preview_label)
                    .on_hover_text("Cycle preview (Ctrl+E)")
                    .clicked()
                {
                    action = Some(ToolbarAction::CyclePreview);
                }
                if ui
                    .small_button(cx.strategy.label())
                    .on_hover_text(strategy_tooltip(cx.strategy))
                    .clicked()
                {
                    action = Some(ToolbarAction::ToggleStrategy);
                }
            });
        });

        action
    }
}

fn strategy_tooltip(strategy: ToggleStrategy) -> &'static str {
    match strategy {
        ToggleStrategy::Heuristic => {
            "Toggles search the selected text for the tag. Click for structured edits."
        }
        ToggleStrategy::Structured => {
            "Toggles edit exactly the selected characters. Click for tag search."
        }
    }
}

fn icon_button(ui: &mut Ui, icon: &str, tooltip: &str, enabled: bool) -> Response {
    ui.add_enabled(
        enabled,
        egui::Button::new(RichText::new(icon).size(15.0))
            .frame(false)
            .min_size(BUTTON_SIZE),
    )
    .on_hover_text(tooltip)
}

/// A mark button drawn in its own style, filled when active.
fn mark_button(
    ui: &mut Ui,
    mark: Mark,
    active: bool,
    enabled: bool,
    palette: &Palette,
) -> Response {
    let mut text = RichText::new(mark.icon()).size(14.0);
    text = match mark {
        Mark::Bold => text.strong(),
        Mark::Italic => text.italics(),
        Mark::Underline => text.underline(),
    };

    let mut button = egui::Button::new(text).min_size(BUTTON_SIZE);
    button = if active {
        button.fill(palette.active)
    } else {
        button.frame(false)
    };

    ui.add_enabled(enabled, button).on_hover_text(mark.tooltip())
}

fn vertical_separator(ui: &mut Ui, color: Color32) {
    ui.add_space(4.0);
    let (rect, _) =
        ui.allocate_exact_size(Vec2::new(1.0, TOOLBAR_HEIGHT - 12.0), egui::Sense::hover());
    ui.painter().line_segment(
        [rect.center_top(), rect.center_bottom()],
        egui::Stroke::new(1.0, color),
    );
    ui.add_space(4.0);
}
