//! Settings panel
//!
//! Modal window over a dimmed overlay with one page per section. Changes are
//! written straight into the `Settings` passed in; the caller persists them.

use crate::config::{PreviewMode, Settings, Theme, ToggleStrategy};
use crate::markup::{Rgb, StylePair};
use crate::ui::toolbar::SIZE_PRESETS;
use eframe::egui::{self, Color32, RichText, Ui};

/// Settings panel sections for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSection {
    #[default]
    Appearance,
    Formatting,
    Editing,
    Export,
}

impl SettingsSection {
    pub fn all() -> [SettingsSection; 4] {
        [
            SettingsSection::Appearance,
            SettingsSection::Formatting,
            SettingsSection::Editing,
            SettingsSection::Export,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "Appearance",
            SettingsSection::Formatting => "Formatting",
            SettingsSection::Editing => "Editing",
            SettingsSection::Export => "Export",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "🎨",
            SettingsSection::Formatting => "🖋",
            SettingsSection::Editing => "📝",
            SettingsSection::Export => "🌐",
        }
    }
}

/// Result of showing the settings panel.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanelOutput {
    /// Whether settings were modified.
    pub changed: bool,
    /// Whether the panel should be closed.
    pub close_requested: bool,
    /// Whether a reset to defaults was requested.
    pub reset_requested: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    active_section: SettingsSection,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the panel as a modal window over the whole viewport.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        settings: &mut Settings,
        is_dark: bool,
    ) -> SettingsPanelOutput {
        let mut output = SettingsPanelOutput::default();

        let screen_rect = ctx.screen_rect();
        let overlay_color = if is_dark {
            Color32::from_rgba_unmultiplied(0, 0, 0, 180)
        } else {
            Color32::from_rgba_unmultiplied(0, 0, 0, 120)
        };

        egui::Area::new(egui::Id::new("settings_overlay"))
            .order(egui::Order::Middle)
            .fixed_pos(screen_rect.min)
            .show(ctx, |ui| {
                let response = ui.allocate_response(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, overlay_color);

                // Close on click outside
                if response.clicked() {
                    output.close_requested = true;
                }
            });

        egui::Window::new("⚙ Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(480.0)
            .max_width(580.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.set_min_width(120.0);

                        for section in SettingsSection::all() {
                            let selected = self.active_section == section;
                            let text = format!("{} {}", section.icon(), section.label());
                            let btn = ui.add_sized(
                                [110.0, 32.0],
                                egui::SelectableLabel::new(
                                    selected,
                                    RichText::new(text).size(14.0),
                                ),
                            );
                            if btn.clicked() {
                                self.active_section = section;
                            }
                        }

                        ui.add_space(ui.available_height() - 40.0);

                        if ui
                            .add_sized([110.0, 28.0], egui::Button::new("↺ Reset All"))
                            .on_hover_text("Reset all settings to defaults")
                            .clicked()
                        {
                            output.reset_requested = true;
                        }
                    });

                    ui.separator();

                    ui.vertical(|ui| {
                        ui.set_min_width(330.0);
                        ui.set_min_height(300.0);

                        let changed = match self.active_section {
                            SettingsSection::Appearance => show_appearance_section(ui, settings),
                            SettingsSection::Formatting => show_formatting_section(ui, settings),
                            SettingsSection::Editing => show_editing_section(ui, settings),
                            SettingsSection::Export => show_export_section(ui, settings),
                        };
                        output.changed |= changed;
                    });
                });

                ui.separator();

                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            output.close_requested = true;
                        }
                        ui.label(
                            RichText::new("Settings are saved automatically")
                                .small()
                                .weak(),
                        );
                    });
                });
            });

        output
    }
}

fn section_break(ui: &mut Ui) {
    ui.add_space(16.0);
    ui.separator();
    ui.add_space(8.0);
}

/// Returns true if any setting was changed.
fn show_appearance_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.heading("Appearance");
    ui.add_space(8.0);

    ui.label(RichText::new("Theme").strong());
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        for theme in [Theme::Light, Theme::Dark, Theme::System] {
            let icon = match theme {
                Theme::Light => "☀",
                Theme::Dark => "🌙",
                Theme::System => "💻",
            };
            let label = format!("{} {}", icon, theme.label());
            changed |= ui
                .selectable_value(&mut settings.theme, theme, label)
                .changed();
        }
    });

    section_break(ui);

    ui.horizontal(|ui| {
        ui.label(RichText::new("Editor Font Size").strong());
        ui.add_space(8.0);
        ui.label(format!("{}pt", settings.font_size as u32));
    });
    ui.add_space(4.0);
    changed |= ui
        .add(
            egui::Slider::new(
                &mut settings.font_size,
                Settings::MIN_FONT_SIZE..=Settings::MAX_FONT_SIZE,
            )
            .show_value(false)
            .step_by(1.0),
        )
        .changed();
    ui.horizontal(|ui| {
        for (label, size) in [("Small", 12.0), ("Medium", 14.0), ("Large", 18.0)] {
            if ui.small_button(label).clicked() {
                settings.font_size = size;
                changed = true;
            }
        }
    });

    section_break(ui);

    ui.label(RichText::new("Preview").strong());
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        for mode in [PreviewMode::Rendered, PreviewMode::Source, PreviewMode::Hidden] {
            changed |= ui
                .selectable_value(&mut settings.preview_mode, mode, mode.label())
                .changed();
        }
    });

    changed
}

fn show_formatting_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.heading("Formatting");
    ui.add_space(8.0);

    ui.label(RichText::new("Toggle Behavior").strong());
    ui.add_space(4.0);
    changed |= ui
        .radio_value(
            &mut settings.toggle_strategy,
            ToggleStrategy::Heuristic,
            ToggleStrategy::Heuristic.label(),
        )
        .on_hover_text("Remove a tag if the selected text contains it anywhere, else wrap")
        .changed();
    changed |= ui
        .radio_value(
            &mut settings.toggle_strategy,
            ToggleStrategy::Structured,
            ToggleStrategy::Structured.label(),
        )
        .on_hover_text("Change formatting of exactly the selected characters")
        .changed();

    section_break(ui);

    ui.label(RichText::new("Starting Style").strong());
    ui.label(
        RichText::new("Size and color the toolbar starts with")
            .small()
            .weak(),
    );
    ui.add_space(4.0);

    let style = &mut settings.default_style;
    ui.horizontal(|ui| {
        ui.label("Size:");
        egui::ComboBox::from_id_source("settings_default_size")
            .selected_text(format!("{}px", style.size))
            .show_ui(ui, |ui| {
                for preset in SIZE_PRESETS {
                    changed |= ui
                        .selectable_value(&mut style.size, preset, format!("{}px", preset))
                        .changed();
                }
            });

        ui.add_space(12.0);
        ui.label("Color:");
        let mut rgb = [style.color.r, style.color.g, style.color.b];
        if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
            style.color = Rgb::new(rgb[0], rgb[1], rgb[2]);
            changed = true;
        }
        ui.label(RichText::new(style.color.to_string()).monospace().weak());
    });

    if !style.is_default() && ui.small_button("Use 16px black").clicked() {
        *style = StylePair::default();
        changed = true;
    }

    changed
}

fn show_editing_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.heading("Editing");
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label(RichText::new("Undo History").strong());
        ui.add_space(8.0);
        ui.label(format!("{} steps", settings.max_undo_size));
    });
    ui.add_space(4.0);
    changed |= ui
        .add(
            egui::Slider::new(
                &mut settings.max_undo_size,
                Settings::MIN_UNDO_SIZE..=Settings::MAX_UNDO_SIZE,
            )
            .show_value(false)
            .logarithmic(true),
        )
        .changed();

    section_break(ui);

    ui.label(RichText::new("Starting Text").strong());
    ui.label(
        RichText::new("Buffer contents when the app opens")
            .small()
            .weak(),
    );
    ui.add_space(4.0);
    changed |= ui
        .add(
            egui::TextEdit::multiline(&mut settings.initial_text)
                .code_editor()
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        )
        .changed();

    changed
}

fn show_export_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.heading("Export");
    ui.add_space(8.0);

    changed |= ui
        .checkbox(&mut settings.open_after_export, "Open File After Export")
        .on_hover_text("Open exported HTML in the default browser")
        .changed();

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label(RichText::new("Last Folder").strong());
        match &settings.last_export_directory {
            Some(dir) => {
                ui.label(RichText::new(dir.display().to_string()).weak());
            }
            None => {
                ui.label(RichText::new("(none)").weak());
            }
        }
    });
    if settings.last_export_directory.is_some() && ui.small_button("Forget Folder").clicked() {
        settings.last_export_directory = None;
        changed = true;
    }

    changed
}
