//! User settings and preferences for kdml
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON and TOML persistence.

use crate::document::syntax::{DEFAULT_DARK_THEME, DEFAULT_LIGHT_THEME};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Page color themes for rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Get the display label for the theme.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Syntax theme used when none is configured explicitly.
    pub fn default_syntax_theme(&self) -> &'static str {
        match self {
            Theme::Light => DEFAULT_LIGHT_THEME,
            Theme::Dark => DEFAULT_DARK_THEME,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}' (expected light or dark)", other)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences for rendering and previewing.
///
/// All fields have sensible defaults via the `Default` trait and
/// `#[serde(default)]`, so partial config files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Page color theme
    pub theme: Theme,

    /// Syntax highlighting theme name (defaults to one matching `theme`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax_theme: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────────────────
    /// Write a complete HTML page instead of a body fragment
    pub standalone: bool,

    /// Embed highlighting CSS in standalone pages
    pub include_syntax_css: bool,

    /// Open the output in the system viewer after the first render
    pub open_after_render: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Live Preview
    // ─────────────────────────────────────────────────────────────────────────
    /// Poll interval for the file watcher, in milliseconds
    pub watch_poll_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            syntax_theme: None,
            standalone: true,
            include_syntax_css: true,
            open_after_render: false,
            watch_poll_interval_ms: 250,
        }
    }
}

impl Settings {
    /// Minimum allowed watcher poll interval.
    pub const MIN_POLL_INTERVAL_MS: u64 = 50;
    /// Maximum allowed watcher poll interval.
    pub const MAX_POLL_INTERVAL_MS: u64 = 10_000;

    /// Syntax theme to use, falling back to the page theme's default.
    pub fn effective_syntax_theme(&self) -> &str {
        self.syntax_theme
            .as_deref()
            .unwrap_or_else(|| self.theme.default_syntax_theme())
    }

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.watch_poll_interval_ms = self
            .watch_poll_interval_ms
            .clamp(Self::MIN_POLL_INTERVAL_MS, Self::MAX_POLL_INTERVAL_MS);

        if self
            .syntax_theme
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            self.syntax_theme = None;
        }
    }

    /// Deserialize JSON settings and sanitize them.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Deserialize TOML settings and sanitize them.
    pub fn from_toml_sanitized(source: &str) -> Result<Self, toml::de::Error> {
        let mut settings: Self = toml::from_str(source)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
