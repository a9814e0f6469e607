//! Syntax Highlighting Module
//!
//! This module integrates syntect for highlighting `code` elements. Output is
//! class-based HTML (`<span class="syn-...">`) so the colors come from a
//! stylesheet generated once per theme rather than from inline styles.
//!
//! # Example
//! ```ignore
//! use kdml::document::syntax::{Highlighter, SyntaxHighlighter};
//!
//! let highlighter = SyntaxHighlighter::new();
//! let html = highlighter.highlight("fn main() {}", "rust")?;
//! ```

use crate::error::{Error, Result};
use log::debug;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Default dark theme name from syntect's built-in themes
pub const DEFAULT_DARK_THEME: &str = "base16-ocean.dark";

/// Default light theme name from syntect's built-in themes
pub const DEFAULT_LIGHT_THEME: &str = "InspiredGitHub";

/// Fallback theme if the specified theme is not found
pub const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Class prefix for highlighted spans, keeps syntect scopes from colliding
/// with document classes.
pub const CLASS_PREFIX: &str = "syn-";

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed {
    prefix: CLASS_PREFIX,
};

// ─────────────────────────────────────────────────────────────────────────────
// Highlighter Capability
// ─────────────────────────────────────────────────────────────────────────────

/// Turns source code into highlighted markup.
pub trait Highlighter {
    /// Highlight raw (unescaped) `code` written in `language`.
    ///
    /// Returns `Ok(None)` when the language is not supported; callers treat
    /// that as a request to fall back to plain text.
    fn highlight(&self, code: &str, language: &str) -> Result<Option<String>>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Syntax highlighter that caches syntect sets for performance.
///
/// This struct holds the loaded SyntaxSet and ThemeSet, which are expensive
/// to load and should be reused across render cycles.
pub struct SyntaxHighlighter {
    /// Loaded syntax definitions
    syntax_set: SyntaxSet,
    /// Loaded color themes
    theme_set: ThemeSet,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    /// Create a new syntax highlighter with default syntax and theme sets.
    pub fn new() -> Self {
        debug!("Loading syntect syntax and theme sets");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        debug!(
            "Loaded {} syntaxes and {} themes",
            syntax_set.syntaxes().len(),
            theme_set.themes.len()
        );
        Self {
            syntax_set,
            theme_set,
        }
    }

    /// Get available theme names.
    pub fn available_themes(&self) -> Vec<&str> {
        self.theme_set.themes.keys().map(|s| s.as_str()).collect()
    }

    /// Get a theme by name, falling back to the default if not found.
    pub fn get_theme(&self, name: &str) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.get(FALLBACK_THEME))
    }

    /// Stylesheet matching the classes emitted by [`Highlighter::highlight`].
    pub fn css_for_theme(&self, name: &str) -> Result<String> {
        let theme = self.get_theme(name).ok_or_else(|| {
            Error::Application(format!("Syntax theme '{}' is not available", name))
        })?;
        css_for_theme_with_class_style(theme, CLASS_STYLE).map_err(|e| {
            Error::Application(format!("Failed to build CSS for theme '{}': {}", name, e))
        })
    }

    /// Find syntax definition for a language identifier.
    ///
    /// Tries multiple strategies:
    /// 1. By extension, after mapping common aliases (e.g. "rust" -> "rs")
    /// 2. By name (e.g. "Rust")
    /// 3. By case-insensitive name
    fn find_syntax_for_language(&self, language: &str) -> Option<&SyntaxReference> {
        if language.is_empty() {
            return None;
        }

        let lang_lower = language.to_lowercase();

        let extension = match lang_lower.as_str() {
            "rust" | "rs" => "rs",
            "python" | "py" => "py",
            "javascript" | "js" => "js",
            "typescript" | "ts" => "ts",
            "c" => "c",
            "cpp" | "c++" | "cxx" => "cpp",
            "csharp" | "c#" | "cs" => "cs",
            "java" => "java",
            "go" | "golang" => "go",
            "ruby" | "rb" => "rb",
            "php" => "php",
            "scala" => "scala",
            "html" | "htm" => "html",
            "css" => "css",
            "json" => "json",
            "yaml" | "yml" => "yaml",
            "xml" => "xml",
            "markdown" | "md" => "md",
            "sql" => "sql",
            "shell" | "sh" | "bash" | "zsh" => "sh",
            "makefile" | "make" => "Makefile",
            "lua" => "lua",
            "perl" | "pl" => "pl",
            "r" => "r",
            "haskell" | "hs" => "hs",
            "erlang" | "erl" => "erl",
            "clojure" | "clj" => "clj",
            "latex" | "tex" => "tex",
            "diff" | "patch" => "diff",
            "text" | "plain" | "txt" => "txt",
            other => other,
        };

        if let Some(syntax) = self.syntax_set.find_syntax_by_extension(extension) {
            return Some(syntax);
        }

        if let Some(syntax) = self.syntax_set.find_syntax_by_name(language) {
            return Some(syntax);
        }

        self.syntax_set
            .syntaxes()
            .iter()
            .find(|syntax| syntax.name.to_lowercase() == lang_lower)
    }
}

impl Highlighter for SyntaxHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Result<Option<String>> {
        let Some(syntax) = self.find_syntax_for_language(language) else {
            debug!("No syntax found for language: {}", language);
            return Ok(None);
        };

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| Error::Highlight {
                    language: language.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(Some(generator.finalize()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlighter_creation() {
        let highlighter = SyntaxHighlighter::new();
        assert!(!highlighter.syntax_set.syntaxes().is_empty());
        assert!(!highlighter.theme_set.themes.is_empty());
    }

    #[test]
    fn test_available_themes() {
        let highlighter = SyntaxHighlighter::new();
        let themes = highlighter.available_themes();
        assert!(themes.contains(&DEFAULT_DARK_THEME));
        assert!(themes.contains(&DEFAULT_LIGHT_THEME));
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let highlighter = SyntaxHighlighter::new();
        assert!(highlighter.get_theme("no-such-theme").is_some());
    }

    #[test]
    fn test_highlight_rust_code() {
        let highlighter = SyntaxHighlighter::new();
        let html = highlighter
            .highlight("fn main() {\n    let x = 1;\n}\n", "rust")
            .unwrap()
            .unwrap();

        assert!(html.contains("<span class=\"syn-"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_highlight_escapes_markup() {
        let highlighter = SyntaxHighlighter::new();
        let html = highlighter.highlight("a < b", "js").unwrap().unwrap();
        assert!(html.contains("&lt;"));
        assert!(!html.contains("a < b"));
    }

    #[test]
    fn test_highlight_unknown_language_is_unsupported() {
        let highlighter = SyntaxHighlighter::new();
        let result = highlighter.highlight("some text", "nonexistent-lang").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_empty_language_is_unsupported() {
        let highlighter = SyntaxHighlighter::new();
        assert!(highlighter.highlight("x", "").unwrap().is_none());
    }

    #[test]
    fn test_language_aliases() {
        let highlighter = SyntaxHighlighter::new();

        let aliases = vec![
            ("rs", "rust"),
            ("py", "python"),
            ("js", "javascript"),
            ("cpp", "c++"),
        ];

        for (alias, canonical) in aliases {
            let syntax1 = highlighter.find_syntax_for_language(alias);
            let syntax2 = highlighter.find_syntax_for_language(canonical);

            if let (Some(s1), Some(s2)) = (syntax1, syntax2) {
                assert_eq!(
                    s1.name, s2.name,
                    "Alias {} should map to same syntax as {}",
                    alias, canonical
                );
            }
        }
    }

    #[test]
    fn test_case_insensitive_name_lookup() {
        let highlighter = SyntaxHighlighter::new();
        assert!(highlighter.find_syntax_for_language("RUST").is_some());
    }

    #[test]
    fn test_css_for_theme_uses_prefix() {
        let highlighter = SyntaxHighlighter::new();
        let css = highlighter.css_for_theme(DEFAULT_LIGHT_THEME).unwrap();
        assert!(css.contains(".syn-"));
    }
}
