//! Configuration file persistence
//!
//! This module handles loading and saving the viewer configuration in the
//! platform config directory, with graceful fallback to defaults.

use crate::config::Config;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "umaviewer";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Temporary file used during atomic writes
const CONFIG_BACKUP_NAME: &str = "config.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\umaviewer\`
/// - **macOS**: `~/Library/Application Support/umaviewer/`
/// - **Linux**: `~/.config/umaviewer/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the configuration file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load configuration from the default location, falling back to defaults
/// when the file is missing or unreadable.
pub fn load_config() -> Config {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(Config::default(), "Failed to load configuration")
}

/// Load configuration from `config_path`.
///
/// A missing or empty file yields the defaults; invalid JSON is an error.
pub fn load_config_from(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(config_path).map_err(|e| Error::ConfigRead {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Config::default());
    }

    let config = Config::from_json(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            config_path.display(),
            e
        );
        Error::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        }
    })?;

    info!("Configuration loaded from {}", config_path.display());
    Ok(config)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save configuration to `config_path`.
///
/// Writes a sibling backup file first and renames it over the original.
pub fn save_config_to(config_path: &Path, config: &Config) -> Result<()> {
    let config_dir = config_path
        .parent()
        .ok_or(Error::ConfigDirNotFound)?
        .to_path_buf();
    let backup_path = config_dir.join(CONFIG_BACKUP_NAME);

    if !config_dir.exists() {
        debug!("Creating config directory: {}", config_dir.display());
        fs::create_dir_all(&config_dir).map_err(|e| Error::ConfigWrite {
            path: config_dir.clone(),
            source: e,
        })?;
    }

    let json = serde_json::to_string_pretty(config).map_err(|e| Error::ConfigParse {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    fs::write(&backup_path, &json).map_err(|e| Error::ConfigWrite {
        path: backup_path.clone(),
        source: e,
    })?;

    fs::rename(&backup_path, config_path).map_err(|e| Error::ConfigWrite {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    info!("Configuration saved to {}", config_path.display());
    Ok(())
}
