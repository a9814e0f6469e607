//! Display surfaces that receive rendered output.
//!
//! Every cycle overwrites the surface wholesale: title and body are replaced
//! together, and an absent title shows as empty.

use crate::document::Rendered;
use crate::error::{Error, Result};
use crate::export::HtmlExporter;
use log::debug;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A place where rendered documents are shown.
pub trait DisplaySurface {
    /// Replace the displayed document.
    fn show(&mut self, rendered: &Rendered) -> Result<()>;

    /// Replace the displayed document with a visible error.
    fn show_error(&mut self, error: &Error) -> Result<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// File Display
// ─────────────────────────────────────────────────────────────────────────────

/// Writes each cycle's output to a file.
#[derive(Debug, Clone)]
pub struct FileDisplay {
    path: PathBuf,
    exporter: HtmlExporter,
}

impl FileDisplay {
    pub fn new(path: impl Into<PathBuf>, exporter: HtmlExporter) -> Self {
        Self {
            path: path.into(),
            exporter,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, html: &str) -> Result<()> {
        debug!("Writing {} bytes to {}", html.len(), self.path.display());
        fs::write(&self.path, html).map_err(|e| Error::FileWrite {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl DisplaySurface for FileDisplay {
    fn show(&mut self, rendered: &Rendered) -> Result<()> {
        self.write(&self.exporter.export(rendered))
    }

    fn show_error(&mut self, error: &Error) -> Result<()> {
        self.write(&self.exporter.export_error(error))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stream Display
// ─────────────────────────────────────────────────────────────────────────────

/// Writes each cycle's output to a stream, stdout by default.
pub struct StreamDisplay<W: Write> {
    writer: W,
    exporter: HtmlExporter,
}

impl StreamDisplay<io::Stdout> {
    pub fn stdout(exporter: HtmlExporter) -> Self {
        Self::new(io::stdout(), exporter)
    }
}

impl<W: Write> StreamDisplay<W> {
    pub fn new(writer: W, exporter: HtmlExporter) -> Self {
        Self { writer, exporter }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write(&mut self, html: &str) -> Result<()> {
        self.writer.write_all(html.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> DisplaySurface for StreamDisplay<W> {
    fn show(&mut self, rendered: &Rendered) -> Result<()> {
        let html = self.exporter.export(rendered);
        self.write(&html)
    }

    fn show_error(&mut self, error: &Error) -> Result<()> {
        let html = self.exporter.export_error(error);
        self.write(&html)
    }
}
