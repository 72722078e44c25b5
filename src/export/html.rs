//! HTML export
//!
//! The buffer is parsed and written back with only the recognized formatting
//! tags; any other markup in the buffer is escaped and appears as text. This
//! keeps arbitrary user markup out of the exported document.

use crate::document::parse;
use crate::error::{Error, Result};
use log::info;
use std::fs;
use std::path::Path;

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Body HTML for `buffer`, without doctype or head.
pub fn generate_html_fragment(buffer: &str) -> String {
    parse(buffer).to_safe_html()
}

/// A complete standalone HTML document for `buffer`.
///
/// `dark` selects the color scheme of the inlined CSS.
pub fn generate_html_document(buffer: &str, title: Option<&str>, dark: bool) -> String {
    let body = generate_html_fragment(buffer);
    let doc_title = title.unwrap_or("Exported Document");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="Inkmark">
    <title>{title}</title>
    <style>
{base_css}
{scheme_css}
    </style>
</head>
<body>
    <article class="inkmark-body">
{body}
    </article>
</body>
</html>"#,
        title = html_escape(doc_title),
        base_css = BASE_CSS,
        scheme_css = scheme_css(dark),
        body = body,
    )
}

/// Write `buffer` as a standalone HTML document to `output_path`.
///
/// The title is taken from the file stem.
pub fn export_to_html_file(buffer: &str, output_path: &Path, dark: bool) -> Result<()> {
    let title = output_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Document");

    let html = generate_html_document(buffer, Some(title), dark);
    fs::write(output_path, html).map_err(|e| Error::ExportWrite {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    info!("Exported HTML to {}", output_path.display());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS
// ─────────────────────────────────────────────────────────────────────────────

const BASE_CSS: &str = r#"
*, *::before, *::after {
    box-sizing: border-box;
}

body {
    margin: 0;
    padding: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
    font-size: 16px;
    line-height: 1.6;
}

.inkmark-body {
    max-width: 900px;
    margin: 0 auto;
    padding: 32px 24px;
}

.inkmark-body strong { font-weight: 700; }
.inkmark-body em { font-style: italic; }
.inkmark-body u { text-decoration: underline; }
"#;

fn scheme_css(dark: bool) -> String {
    let (scheme, bg, text) = if dark {
        ("dark", "rgb(30, 30, 30)", "rgb(220, 220, 220)")
    } else {
        ("light", "rgb(255, 255, 255)", "rgb(0, 0, 0)")
    };
    format!(
        ":root {{ color-scheme: {}; }}\nbody {{ background-color: {}; color: {}; }}\n",
        scheme, bg, text
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fragment_keeps_formatting() {
        let html = generate_html_fragment("<strong>Hello</strong> <em>world</em>");
        assert_eq!(html, "<strong>Hello</strong> <em>world</em>");
        assert!(!html.contains("<!DOCTYPE"));
    }

    #[test]
    fn test_fragment_keeps_style_wrapper() {
        let html = generate_html_fragment(
            "Hello <span style=\"font-size:16px;color:#ff0000\">world</span>",
        );
        assert_eq!(
            html,
            "Hello <span style=\"font-size:16px;color:#ff0000\">world</span>"
        );
    }

    #[test]
    fn test_fragment_escapes_unknown_markup() {
        let html = generate_html_fragment("<script>alert(1)</script><b>ok</b>");
        assert_eq!(
            html,
            "&lt;script&gt;alert(1)&lt;/script&gt;<strong>ok</strong>"
        );
    }

    #[test]
    fn test_fragment_drops_injected_style_attributes() {
        let html = generate_html_fragment(
            "<span style=\"color:#ff0000;background:url(x)\" onclick=\"x\">a</span>",
        );
        assert_eq!(
            html,
            "<span style=\"font-size:16px;color:#ff0000\">a</span>"
        );
    }

    #[test]
    fn test_fragment_line_breaks() {
        assert_eq!(generate_html_fragment("a\nb"), "a<br>\nb");
    }

    #[test]
    fn test_document_structure() {
        let html = generate_html_document("<u>x</u>", Some("Notes & <Ideas>"), false);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Notes &amp; &lt;Ideas&gt;</title>"));
        assert!(html.contains("<article class=\"inkmark-body\">"));
        assert!(html.contains("<u>x</u>"));
        assert!(html.contains("color-scheme: light"));
    }

    #[test]
    fn test_document_dark_scheme_and_default_title() {
        let html = generate_html_document("", None, true);
        assert!(html.contains("color-scheme: dark"));
        assert!(html.contains("<title>Exported Document</title>"));
    }

    #[test]
    fn test_export_to_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("letter.html");

        export_to_html_file("<strong>Dear</strong> reader", &path, false).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("<title>letter</title>"));
        assert!(written.contains("<strong>Dear</strong> reader"));
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("out.html");

        let err = export_to_html_file("x", &path, false).unwrap_err();
        assert!(matches!(err, Error::ExportWrite { .. }));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("Hello"), "Hello");
        assert_eq!(html_escape("a & 'b'"), "a &amp; &#39;b&#39;");
    }
}
