//! Document Export Module for kdml
//!
//! This module turns rendered documents into the HTML written to a display
//! surface.
//!
//! # Supported Export Formats
//!
//! - **HTML page**: Complete HTML document with inlined theme and highlight CSS
//! - **HTML fragment**: Body markup only
//!
//! # Architecture
//!
//! - `options.rs` - Export configuration and options
//! - `html.rs` - HTML document generation with theme styling

pub mod html;
pub mod options;

pub use html::{document_title, HtmlExporter};
pub use options::{ExportFormat, ExportOptions};
