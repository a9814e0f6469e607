//! Configuration file persistence for kdml
//!
//! Settings come from, in increasing precedence: built-in defaults, the user
//! config file in the platform config directory (JSON), and a project file
//! `kdml.toml` in the working directory. A project file replaces the user
//! config wholesale. Broken files never stop a render; they log a warning and
//! the defaults are used instead.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "kdml";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Backup configuration file name (used during atomic writes)
const CONFIG_BACKUP_NAME: &str = "config.json.bak";

/// Per-project configuration file looked up in the working directory
pub const PROJECT_CONFIG_NAME: &str = "kdml.toml";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for kdml.
///
/// - **Windows**: `%APPDATA%\kdml\`
/// - **macOS**: `~/Library/Application Support/kdml/`
/// - **Linux**: `~/.config/kdml/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be
/// determined (e.g. if the HOME environment variable is not set).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the user configuration file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load the effective configuration for the current working directory.
///
/// Falls back to defaults (with a warning) if any config file is unreadable
/// or malformed.
pub fn load_config() -> Settings {
    let project_dir = std::env::current_dir().ok();
    load_config_internal(project_dir.as_deref())
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

fn load_config_internal(project_dir: Option<&Path>) -> Result<Settings> {
    if let Some(dir) = project_dir {
        if let Some(settings) = load_project_config(dir)? {
            return Ok(settings);
        }
    }
    load_config_file(&get_config_file_path()?)
}

/// Load `kdml.toml` from `dir`, if it exists.
pub fn load_project_config(dir: &Path) -> Result<Option<Settings>> {
    let path = dir.join(PROJECT_CONFIG_NAME);
    if !path.exists() {
        return Ok(None);
    }

    debug!("Loading project config from: {}", path.display());
    let contents = fs::read_to_string(&path).map_err(|e| Error::ConfigLoad {
        path: path.clone(),
        source: Box::new(e),
    })?;

    let settings = Settings::from_toml_sanitized(&contents).map_err(|e| {
        warn!("Project config at {} is invalid: {}", path.display(), e);
        Error::from(e)
    })?;

    info!("Using project configuration from {}", path.display());
    Ok(Some(settings))
}

/// Load a JSON config file; a missing or empty file yields defaults.
pub fn load_config_file(path: &Path) -> Result<Settings> {
    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    debug!("Loading config from: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse config file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!("Configuration loaded successfully from {}", path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save configuration to the user config directory.
///
/// Returns the path written.
pub fn save_config(settings: &Settings) -> Result<PathBuf> {
    save_config_to(settings, &get_config_dir()?)
}

/// Save configuration into `config_dir`, creating it if needed.
///
/// The JSON is written to a backup file first and then renamed over the
/// config file, so a crash mid-write never leaves a truncated config.
pub fn save_config_to(settings: &Settings, config_dir: &Path) -> Result<PathBuf> {
    if !config_dir.exists() {
        debug!("Creating config directory: {}", config_dir.display());
        fs::create_dir_all(config_dir).map_err(|e| Error::ConfigSave {
            path: config_dir.to_path_buf(),
            source: Box::new(e),
        })?;
    }

    let config_path = config_dir.join(CONFIG_FILE_NAME);
    let backup_path = config_dir.join(CONFIG_BACKUP_NAME);

    debug!("Saving config to: {}", config_path.display());

    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&backup_path, &config_path).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    info!(
        "Configuration saved successfully to {}",
        config_path.display()
    );
    Ok(config_path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
