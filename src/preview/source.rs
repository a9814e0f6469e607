//! Editing surfaces that supply KDML source text.

use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Something that can hand over the current document text.
pub trait SourceDocument {
    /// Read the full current text of the document.
    fn current_text(&self) -> Result<String>;

    /// Label used in log messages.
    fn describe(&self) -> String;
}

// ─────────────────────────────────────────────────────────────────────────────
// File Source
// ─────────────────────────────────────────────────────────────────────────────

/// A KDML document on disk, re-read on every cycle.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceDocument for FileSource {
    fn current_text(&self) -> Result<String> {
        debug!("Reading source from {}", self.path.display());
        fs::read_to_string(&self.path).map_err(|e| Error::FileRead {
            path: self.path.clone(),
            source: e,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stdin Source
// ─────────────────────────────────────────────────────────────────────────────

/// Standard input, read to the end. Only meaningful for a single cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinSource;

impl SourceDocument for StdinSource {
    fn current_text(&self) -> Result<String> {
        let mut text = String::new();
        io::stdin().lock().read_to_string(&mut text)?;
        Ok(text)
    }

    fn describe(&self) -> String {
        "<stdin>".to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-Memory Source
// ─────────────────────────────────────────────────────────────────────────────

/// Source text held in memory.
#[derive(Debug, Clone, Default)]
pub struct TextSource {
    text: String,
}

impl TextSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Replace the held text, as an edit would.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl SourceDocument for TextSource {
    fn current_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
