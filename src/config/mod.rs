//! Configuration module for kdml
//!
//! This module handles user preferences for rendering and previewing,
//! including serialization to/from JSON and TOML and persistent storage in
//! platform-specific directories.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
