//! HTML Export Generation
//!
//! This module turns a render cycle's output into the markup written to a
//! display surface: either a standalone page with inlined CSS or the bare
//! body fragment.

use super::options::{ExportFormat, ExportOptions};
use crate::config::Theme;
use crate::document::markup::{escape, parse, text_content};
use crate::document::{Rendered, SyntaxHighlighter};
use crate::error::{Error, Result};

/// Page title used when the document has none.
const UNTITLED: &str = "Untitled";

// ─────────────────────────────────────────────────────────────────────────────
// HTML Exporter
// ─────────────────────────────────────────────────────────────────────────────

/// Turns rendered documents into output markup.
///
/// Highlight CSS is generated once when the exporter is built and reused for
/// every render cycle.
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    format: ExportFormat,
    theme: Theme,
    syntax_css: Option<String>,
}

impl HtmlExporter {
    /// Create an exporter, generating highlight CSS if the options ask for it.
    pub fn new(options: &ExportOptions, highlighter: &SyntaxHighlighter) -> Result<Self> {
        let syntax_css = if options.include_syntax_css
            && options.format == ExportFormat::StandalonePage
        {
            Some(highlighter.css_for_theme(&options.syntax_theme)?)
        } else {
            None
        };

        Ok(Self {
            format: options.format,
            theme: options.theme,
            syntax_css,
        })
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Output markup for a successful render.
    pub fn export(&self, rendered: &Rendered) -> String {
        match self.format {
            ExportFormat::StandalonePage => self.page(
                &document_title(rendered),
                &title_header(rendered),
                &rendered.body,
            ),
            ExportFormat::Fragment => rendered.body.clone(),
        }
    }

    /// Output markup that makes a failed render visible.
    pub fn export_error(&self, error: &Error) -> String {
        let body = format!(
            "<div class=\"render-error\"><strong>Render failed</strong><pre>{}</pre></div>",
            escape(&error.to_string())
        );
        match self.format {
            ExportFormat::StandalonePage => self.page("Render failed", "", &body),
            ExportFormat::Fragment => body,
        }
    }

    fn page(&self, title: &str, header: &str, body: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="kdml">
    <title>{title}</title>
    <style>
{base_css}

{theme_css}

{syntax_css}
    </style>
</head>
<body>
{header}    <article class="kdml-body">
{body}
    </article>
</body>
</html>"#,
            title = escape(title),
            base_css = BASE_CSS,
            theme_css = generate_theme_css(self.theme),
            syntax_css = self.syntax_css.as_deref().unwrap_or_default(),
            header = header,
            body = body,
        )
    }
}

/// Plain-text page title: tags stripped, entities decoded.
pub fn document_title(rendered: &Rendered) -> String {
    let Some(title) = rendered.title.as_deref() else {
        return UNTITLED.to_string();
    };
    let text = match parse(title) {
        Ok(nodes) => text_content(&nodes),
        Err(_) => title.to_string(),
    };
    let text = text.trim();
    if text.is_empty() {
        UNTITLED.to_string()
    } else {
        text.to_string()
    }
}

/// Header block showing the title markup, empty when there is no title.
fn title_header(rendered: &Rendered) -> String {
    match rendered.title.as_deref() {
        Some(title) => format!("    <header class=\"document-title\">{}</header>\n", title),
        None => String::new(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Base CSS for rendered documents (layout, typography).
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

.document-title,
.kdml-body {
    max-width: 900px;
    margin: 0 auto;
    padding: 0 24px;
}

.document-title {
    padding-top: 32px;
    font-size: 2.25em;
    font-weight: 700;
}

.kdml-body {
    padding-bottom: 32px;
}

.kdml-body h1,
.kdml-body h2,
.kdml-body h3,
.kdml-body h4,
.kdml-body h5,
.kdml-body h6 {
    margin-top: 24px;
    margin-bottom: 16px;
    font-weight: 600;
    line-height: 1.25;
}

.kdml-body h1 { font-size: 2em; border-bottom: 1px solid; padding-bottom: 0.3em; }
.kdml-body h2 { font-size: 1.5em; border-bottom: 1px solid; padding-bottom: 0.3em; }
.kdml-body h3 { font-size: 1.25em; }
.kdml-body h4 { font-size: 1em; }
.kdml-body h5 { font-size: 0.875em; }
.kdml-body h6 { font-size: 0.85em; }

.kdml-body p {
    margin-top: 0;
    margin-bottom: 16px;
}

.kdml-body blockquote {
    margin: 0 0 16px 0;
    padding: 0 1em;
    border-left: 4px solid;
}

.kdml-body q {
    font-style: italic;
}

.kdml-body code {
    font-family: 'JetBrains Mono', 'Fira Code', 'Consolas', 'Monaco', monospace;
    font-size: 0.9em;
    padding: 0.2em 0.4em;
    border-radius: 4px;
}

.kdml-body pre {
    margin-top: 0;
    margin-bottom: 16px;
    padding: 16px;
    overflow: auto;
    border-radius: 6px;
    line-height: 1.45;
}

.kdml-body pre code {
    padding: 0;
    background: transparent;
    border-radius: 0;
    font-size: 0.875em;
}

.kdml-body div.math {
    margin: 16px 0;
    overflow-x: auto;
    text-align: center;
}

.render-error pre {
    white-space: pre-wrap;
}
"#;

/// Palette CSS for a page theme.
fn generate_theme_css(theme: Theme) -> String {
    let (bg, text, border, quote, code_bg, error) = match theme {
        Theme::Light => ("#ffffff", "#1f2328", "#d0d7de", "#59636e", "#f6f8fa", "#cf222e"),
        Theme::Dark => ("#0d1117", "#e6edf3", "#30363d", "#9198a1", "#161b22", "#f85149"),
    };

    format!(
        r#"
:root {{
    color-scheme: {color_scheme};
}}

body {{
    background-color: {bg};
    color: {text};
}}

.kdml-body h1,
.kdml-body h2 {{
    border-bottom-color: {border};
}}

.kdml-body blockquote {{
    color: {quote};
    border-left-color: {border};
}}

.kdml-body code,
.kdml-body pre {{
    background-color: {code_bg};
}}

.render-error {{
    color: {error};
}}
"#,
        color_scheme = if theme.is_dark() { "dark" } else { "light" },
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(title: Option<&str>, body: &str) -> Rendered {
        Rendered {
            title: title.map(str::to_string),
            body: body.to_string(),
        }
    }

    fn exporter(format: ExportFormat, include_syntax_css: bool) -> HtmlExporter {
        let options = ExportOptions {
            format,
            include_syntax_css,
            ..ExportOptions::default()
        };
        HtmlExporter::new(&options, &SyntaxHighlighter::new()).unwrap()
    }

    #[test]
    fn test_standalone_page_structure() {
        let html = exporter(ExportFormat::StandalonePage, false)
            .export(&rendered(Some("Report"), "<p>Body</p>"));

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Report</title>"));
        assert!(html.contains("<header class=\"document-title\">Report</header>"));
        assert!(html.contains("<article class=\"kdml-body\">\n<p>Body</p>\n    </article>"));
    }

    #[test]
    fn test_page_without_title() {
        let html = exporter(ExportFormat::StandalonePage, false).export(&rendered(None, "<p>x</p>"));

        assert!(html.contains("<title>Untitled</title>"));
        assert!(!html.contains("document-title\">"));
    }

    #[test]
    fn test_fragment_is_body_only() {
        let html = exporter(ExportFormat::Fragment, true).export(&rendered(Some("T"), "<p>x</p>"));
        assert_eq!(html, "<p>x</p>");
    }

    #[test]
    fn test_syntax_css_included_on_request() {
        let with_css = exporter(ExportFormat::StandalonePage, true).export(&rendered(None, ""));
        let without_css =
            exporter(ExportFormat::StandalonePage, false).export(&rendered(None, ""));

        assert!(with_css.contains(".syn-"));
        assert!(!without_css.contains(".syn-"));
    }

    #[test]
    fn test_document_title_strips_markup() {
        let title = document_title(&rendered(Some("Q<sub>1</sub> &amp; <em>more</em>"), ""));
        assert_eq!(title, "Q1 & more");

        let html = exporter(ExportFormat::StandalonePage, false)
            .export(&rendered(Some("Fish &amp; Chips"), ""));
        assert!(html.contains("<title>Fish &amp; Chips</title>"));
    }

    #[test]
    fn test_document_title_drops_comments() {
        let title = document_title(&rendered(Some("Report<!-- draft -->"), ""));
        assert_eq!(title, "Report");
    }

    #[test]
    fn test_blank_title_is_untitled() {
        assert_eq!(document_title(&rendered(Some("  "), "")), "Untitled");
    }

    #[test]
    fn test_error_page_escapes_message() {
        let error = Error::Math {
            source_text: "a<b".to_string(),
            message: "bad".to_string(),
        };
        let html = exporter(ExportFormat::StandalonePage, false).export_error(&error);

        assert!(html.contains("<title>Render failed</title>"));
        assert!(html.contains("a&lt;b"));
        assert!(!html.contains("a<b"));
    }

    #[test]
    fn test_theme_css() {
        assert!(generate_theme_css(Theme::Light).contains("color-scheme: light"));
        assert!(generate_theme_css(Theme::Dark).contains("color-scheme: dark"));
    }
}
