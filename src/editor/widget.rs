//! Raw editor widget
//!
//! Wraps egui's `TextEdit` around the draft buffer. Edits typed into the
//! widget are recorded for undo, the widget's cursor is copied into
//! `Draft::selection`, and a selection queued by a formatting command is
//! written into the widget state before it is drawn.

use crate::state::Draft;
use crate::string_utils::char_count;
use crate::theme::Palette;
use eframe::egui::text::{CCursor, CCursorRange};
use eframe::egui::widgets::text_edit::TextEditState;
use eframe::egui::{self, FontId, ScrollArea, TextEdit, Ui};
use log::debug;
use std::sync::Arc;

use super::highlight::markup_layout_job;

pub struct EditorOutput {
    /// Whether the user typed into the buffer this frame
    pub changed: bool,
}

/// # Example
///
/// ```ignore
/// EditorWidget::new(&mut state.draft)
///     .font_size(settings.font_size)
///     .palette(palette)
///     .show(ui);
/// ```
pub struct EditorWidget<'a> {
    draft: &'a mut Draft,
    font_size: f32,
    palette: Palette,
    id: Option<egui::Id>,
}

impl<'a> EditorWidget<'a> {
    pub fn new(draft: &'a mut Draft) -> Self {
        Self {
            draft,
            font_size: 14.0,
            palette: Palette::light(),
            id: None,
        }
    }

    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    #[must_use]
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn id(mut self, id: egui::Id) -> Self {
        self.id = Some(id);
        self
    }

    pub fn show(self, ui: &mut Ui) -> EditorOutput {
        // A new id per content version makes the TextEdit drop stale state
        // after the buffer was replaced from outside (formatting, undo).
        let base_id = self.id.unwrap_or_else(|| ui.id().with("editor"));
        let id = base_id.with(self.draft.content_version());

        if let Some((start, end)) = self.draft.take_pending_selection() {
            let len = char_count(&self.draft.content);
            let range = CCursorRange::two(CCursor::new(start.min(len)), CCursor::new(end.min(len)));
            let mut state = TextEdit::load_state(ui.ctx(), id).unwrap_or_else(TextEditState::default);
            state.cursor.set_char_range(Some(range));
            state.store(ui.ctx(), id);
            debug!("Editor selection set to {}..{}", start, end);
        }

        let needs_focus = std::mem::take(&mut self.draft.needs_focus);
        let original_content = self.draft.content.clone();

        let font_size = self.font_size;
        let palette = self.palette;
        let mut layouter = move |ui: &Ui, text: &str, wrap_width: f32| -> Arc<egui::Galley> {
            let mut job = markup_layout_job(text, FontId::monospace(font_size), &palette);
            job.wrap.max_width = wrap_width;
            ui.fonts(|f| f.layout_job(job))
        };

        let content = &mut self.draft.content;
        let text_output = ScrollArea::vertical()
            .id_source(base_id.with("scroll"))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let output = TextEdit::multiline(content)
                    .id(id)
                    .font(FontId::monospace(font_size))
                    .desired_width(f32::INFINITY)
                    .desired_rows(12)
                    .layouter(&mut layouter)
                    .show(ui);
                if needs_focus {
                    output.response.request_focus();
                }
                output
            })
            .inner;

        let changed = self.draft.content != original_content;
        if changed {
            // TextEdit edits the string in place
            self.draft.record_edit(original_content);
            debug!("Editor content changed, recorded for undo");
        }

        // Without focus the widget reports no cursor; keep the last selection
        // so toolbar clicks still see what the user selected.
        if let Some(cursor_range) = text_output.cursor_range {
            let primary = cursor_range.primary.ccursor.index;
            let secondary = cursor_range.secondary.ccursor.index;
            self.draft.selection = (primary.min(secondary), primary.max(secondary));
        }

        EditorOutput { changed }
    }
}
