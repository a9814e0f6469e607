//! Live preview for kdml
//!
//! This module connects an editing surface (file or stdin) to a display
//! surface (file or stdout) and re-renders whenever the source changes.

mod display;
mod session;
mod source;
mod watcher;

pub use display::{DisplaySurface, FileDisplay, StreamDisplay};
pub use session::PreviewSession;
pub use source::{FileSource, SourceDocument, StdinSource, TextSource};
pub use watcher::{SourceEvent, SourceWatcher};
