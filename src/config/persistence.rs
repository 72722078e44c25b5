//! Reading and writing `config.json`
//!
//! Settings live in the platform config directory (`~/.config/inkmark/` on
//! Linux, `%APPDATA%\inkmark\` on Windows, `~/Library/Application Support/inkmark/`
//! on macOS). A missing, empty or unreadable file yields defaults; the app
//! never refuses to start over its config.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

const APP_NAME: &str = "inkmark";

const CONFIG_FILE_NAME: &str = "config.json";

/// Written first, then renamed over the real file
const CONFIG_TEMP_NAME: &str = "config.json.tmp";

// ─────────────────────────────────────────────────────────────────────────────
// Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Platform config directory for the application.
///
/// # Errors
///
/// `Error::ConfigDirNotFound` when the platform has no config directory
/// (for example `HOME` is unset).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

// ─────────────────────────────────────────────────────────────────────────────
// Load
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from the platform config directory, falling back to defaults.
pub fn load_config() -> Settings {
    get_config_dir()
        .and_then(|dir| load_config_from(&dir))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Load and sanitize `config.json` from `dir`.
///
/// A missing or blank file is not an error and yields defaults.
pub fn load_config_from(dir: &Path) -> Result<Settings> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(&path).map_err(|e| Error::ConfigLoad {
        path: path.clone(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Config file {} is empty, using defaults", path.display());
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| Error::ConfigParse {
        message: format!("{} is not valid settings JSON: {}", path.display(), e),
        source: Some(Box::new(e)),
    })?;

    info!("Loaded configuration from {}", path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save
// ─────────────────────────────────────────────────────────────────────────────

/// Save settings to the platform config directory.
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to(&get_config_dir()?, settings)
}

/// Write `config.json` into `dir`, creating the directory if needed.
///
/// The JSON goes to a temp file that is then renamed over the old config,
/// so a crash mid-write leaves the previous file intact.
pub fn save_config_to(dir: &Path, settings: &Settings) -> Result<()> {
    if !dir.exists() {
        debug!("Creating config directory {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| Error::ConfigSave {
            path: dir.to_path_buf(),
            source: Box::new(e),
        })?;
    }

    let path = dir.join(CONFIG_FILE_NAME);
    let temp = dir.join(CONFIG_TEMP_NAME);

    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: path.clone(),
        source: Box::new(e),
    })?;

    fs::write(&temp, json).map_err(|e| Error::ConfigSave {
        path: temp.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&temp, &path).map_err(|e| Error::ConfigSave {
        path: path.clone(),
        source: Box::new(e),
    })?;

    info!("Saved configuration to {}", path.display());
    Ok(())
}

/// Save settings, logging instead of returning a failure.
///
/// Returns whether the write went through.
pub fn save_config_silent(settings: &Settings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
