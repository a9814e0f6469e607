//! Export Options and Configuration
//!
//! This module defines the output formats and the options that shape rendered
//! HTML.

use crate::config::{Settings, Theme};

// ─────────────────────────────────────────────────────────────────────────────
// Export Format
// ─────────────────────────────────────────────────────────────────────────────

/// Shapes of rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Complete HTML document with embedded styles
    #[default]
    StandalonePage,
    /// Body markup only, for embedding in another page
    Fragment,
}

impl ExportFormat {
    /// Get the display label for this format.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::StandalonePage => "HTML page",
            ExportFormat::Fragment => "HTML fragment",
        }
    }

    pub fn from_standalone(standalone: bool) -> Self {
        if standalone {
            ExportFormat::StandalonePage
        } else {
            ExportFormat::Fragment
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Options
// ─────────────────────────────────────────────────────────────────────────────

/// Options for HTML export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Output shape
    pub format: ExportFormat,
    /// Page color theme
    pub theme: Theme,
    /// Syntect theme for highlight CSS
    pub syntax_theme: String,
    /// Whether to embed highlight CSS in standalone pages
    pub include_syntax_css: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl ExportOptions {
    /// Build export options from user settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            format: ExportFormat::from_standalone(settings.standalone),
            theme: settings.theme,
            syntax_theme: settings.effective_syntax_theme().to_string(),
            include_syntax_css: settings.include_syntax_css,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExportOptions::default();
        assert_eq!(options.format, ExportFormat::StandalonePage);
        assert_eq!(options.theme, Theme::Light);
        assert!(options.include_syntax_css);
    }

    #[test]
    fn test_options_follow_settings() {
        let settings = Settings {
            theme: Theme::Dark,
            standalone: false,
            ..Settings::default()
        };
        let options = ExportOptions::from_settings(&settings);

        assert_eq!(options.format, ExportFormat::Fragment);
        assert_eq!(options.syntax_theme, Theme::Dark.default_syntax_theme());
    }

    #[test]
    fn test_format_labels() {
        assert_eq!(ExportFormat::StandalonePage.label(), "HTML page");
        assert_eq!(ExportFormat::Fragment.label(), "HTML fragment");
    }
}
