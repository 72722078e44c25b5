//! Formatted preview of the buffer
//!
//! Rendered mode lays out the span tree's runs directly: bold, italic,
//! underline and the size/color pair become egui text formats. Markup the
//! parser did not recognize is shown as literal text in a muted color, so
//! nothing in the buffer is ever interpreted beyond the known tags.
//!
//! Source mode shows the canonical markup the structured edits would write.

use crate::config::PreviewMode;
use crate::document::{parse, Document, MarkSet};
use crate::editor::markup_layout_job;
use crate::markup::StylePair;
use crate::theme::Palette;
use eframe::egui::text::{LayoutJob, TextFormat};
use eframe::egui::{self, Color32, FontId, ScrollArea, Stroke, Ui};

// ─────────────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────────────

/// Point size for a style pair, scaled so the default size matches `base_size`.
pub fn scaled_size(style: Option<StylePair>, base_size: f32) -> f32 {
    let px = style
        .map_or(StylePair::DEFAULT_SIZE, |s| s.size)
        .clamp(StylePair::MIN_SIZE, StylePair::MAX_SIZE);
    px as f32 * base_size / StylePair::DEFAULT_SIZE as f32
}

fn text_format(
    marks: MarkSet,
    style: Option<StylePair>,
    raw: bool,
    base_size: f32,
    palette: &Palette,
) -> TextFormat {
    let color = match style {
        Some(pair) => Color32::from_rgb(pair.color.r, pair.color.g, pair.color.b),
        None if raw => palette.raw,
        None if marks.bold => palette.strong,
        None => palette.text,
    };
    let underline = if marks.underline {
        Stroke::new(1.0, color)
    } else {
        Stroke::NONE
    };
    TextFormat {
        font_id: FontId::proportional(scaled_size(style, base_size)),
        color,
        italics: marks.italic,
        underline,
        ..Default::default()
    }
}

/// Layout job for the rendered preview of `document`.
pub fn rendered_layout_job(document: &Document, base_size: f32, palette: &Palette) -> LayoutJob {
    let mut job = LayoutJob::default();
    for run in document.runs() {
        job.append(
            &run.text,
            0.0,
            text_format(run.marks, run.style, run.raw, base_size, palette),
        );
    }
    job
}

// ─────────────────────────────────────────────────────────────────────────────
// Widget
// ─────────────────────────────────────────────────────────────────────────────

/// Draw the preview pane for `buffer` in the given mode.
pub fn show_preview(ui: &mut Ui, buffer: &str, mode: PreviewMode, base_size: f32, palette: &Palette) {
    let document = parse(buffer);
    if mode != PreviewMode::Hidden && document.is_empty() {
        ui.label(egui::RichText::new("Nothing to preview").weak().italics());
        return;
    }
    let mut job = match mode {
        PreviewMode::Hidden => return,
        PreviewMode::Rendered => rendered_layout_job(&document, base_size, palette),
        PreviewMode::Source => {
            markup_layout_job(&document.to_markup(), FontId::monospace(base_size), palette)
        }
    };

    ScrollArea::vertical()
        .id_source("preview_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            job.wrap.max_width = ui.available_width();
            let galley = ui.fonts(|f| f.layout_job(job));
            ui.add(egui::Label::new(galley).selectable(true));
        });
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Rgb;

    fn job_for(markup: &str) -> LayoutJob {
        rendered_layout_job(&parse(markup), 14.0, &Palette::light())
    }

    #[test]
    fn test_plain_text_one_section() {
        let job = job_for("Hello world");
        assert_eq!(job.text, "Hello world");
        assert_eq!(job.sections.len(), 1);
        assert_eq!(job.sections[0].format.color, Palette::light().text);
    }

    #[test]
    fn test_oversized_span_lays_out() {
        let job = job_for("<span style=\"font-size:100000px;color:#000000\">x</span>");
        let expected = StylePair::MAX_SIZE as f32 * 14.0 / StylePair::DEFAULT_SIZE as f32;
        assert_eq!(job.sections[0].format.font_id.size, expected);

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let galley = ctx.fonts(|fonts| fonts.layout_job(job.clone()));
            assert_eq!(galley.text(), "x");
        });
    }

    #[test]
    fn test_scaled_size_clamps_direct_pairs() {
        let huge = StylePair::new(5000, Rgb::BLACK);
        assert_eq!(scaled_size(Some(huge), 16.0), StylePair::MAX_SIZE as f32);
    }

    #[test]
    fn test_tags_hidden_and_marks_applied() {
        let job = job_for("<strong>Hello</strong> <em><u>world</u></em>");
        assert_eq!(job.text, "Hello world");
        assert_eq!(job.sections.len(), 3);

        let bold = &job.sections[0].format;
        assert_eq!(bold.color, Palette::light().strong);

        let styled = &job.sections[2].format;
        assert!(styled.italics);
        assert_ne!(styled.underline, Stroke::NONE);
    }

    #[test]
    fn test_style_pair_sets_size_and_color() {
        let job = job_for("<span style=\"font-size:32px;color:#ff0000\">big</span>");
        let format = &job.sections[0].format;
        assert_eq!(format.color, Color32::from_rgb(0xff, 0, 0));
        assert_eq!(format.font_id.size, 28.0);
    }

    #[test]
    fn test_unknown_markup_shown_literally() {
        let job = job_for("a<div>b");
        assert_eq!(job.text, "a<div>b");
        assert_eq!(job.sections.len(), 3);
        assert_eq!(job.sections[1].format.color, Palette::light().raw);
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(job_for("R&amp;D &lt;3").text, "R&D <3");
    }

    #[test]
    fn test_scaled_size() {
        assert_eq!(scaled_size(None, 14.0), 14.0);
        assert_eq!(scaled_size(Some(StylePair::new(8, Rgb::BLACK)), 16.0), 8.0);
    }
}
