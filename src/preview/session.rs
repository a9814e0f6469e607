//! Render cycles between an editing surface and a display surface.

use super::display::DisplaySurface;
use super::source::SourceDocument;
use super::watcher::{SourceEvent, SourceWatcher};
use crate::document::Transformer;
use crate::error::Result;
use log::{debug, error, info, warn};

/// Drives render cycles from a source document to a display.
///
/// Cycles run one at a time on the caller's thread; nothing is carried over
/// from one cycle to the next.
pub struct PreviewSession<S: SourceDocument, D: DisplaySurface> {
    source: S,
    display: D,
    transformer: Transformer,
}

impl<S: SourceDocument, D: DisplaySurface> PreviewSession<S, D> {
    pub fn new(source: S, display: D, transformer: Transformer) -> Self {
        Self {
            source,
            display,
            transformer,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Run one render cycle and show the result.
    ///
    /// A failed render leaves the display untouched and returns the error.
    pub fn run_cycle(&mut self) -> Result<()> {
        let text = self.source.current_text()?;
        let rendered = self.transformer.render(&text)?;
        self.display.show(&rendered)?;
        info!("Rendered {}", self.source.describe());
        Ok(())
    }

    /// Run one render cycle, showing a failed render on the display.
    ///
    /// Only a failure to update the display itself is returned.
    pub fn refresh(&mut self) -> Result<()> {
        match self.run_cycle() {
            Ok(()) => Ok(()),
            Err(err) => {
                error!("Failed to render {}: {}", self.source.describe(), err);
                self.display.show_error(&err)
            }
        }
    }

    /// Refresh once per batch of change notifications until the watcher closes.
    pub fn watch(&mut self, watcher: &SourceWatcher) -> Result<()> {
        while let Some(events) = watcher.wait() {
            let mut changed = false;
            for event in events {
                match event {
                    SourceEvent::Changed => changed = true,
                    SourceEvent::Removed => {
                        debug!("{} was removed, waiting for it to return", self.source.describe())
                    }
                    SourceEvent::Error(msg) => warn!("File watcher error: {}", msg),
                }
            }
            if changed {
                self.refresh()?;
            }
        }
        debug!("Watcher closed, stopping preview");
        Ok(())
    }
}
