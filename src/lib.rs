//! kdml - KDML to HTML rendering and live preview
//!
//! The [`document`] module holds the transformation from KDML source to
//! presentation markup. [`export`] wraps rendered documents into HTML pages,
//! [`preview`] drives render cycles from a source to a display, and
//! [`config`] loads the user's preferences.

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod preview;

pub use error::{Error, Result};
