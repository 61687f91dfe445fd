//! Settings Persistence
//!
//! Locates the per-user configuration directory and loads canvas settings
//! from it, falling back to defaults when no file exists yet.

use std::path::{Path, PathBuf};

use crate::config::CanvasSettings;
use crate::error::{SettingsError, SettingsResult};

const APP_DIR: &str = "diagramkit";
const CONFIG_FILE: &str = "canvas.toml";

/// Platform configuration directory for diagramkit
pub fn config_dir() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".into())
        })
}

/// Default location of the canvas settings file
pub fn config_file_path() -> SettingsResult<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Create the configuration directory if it does not exist
pub fn ensure_config_dir() -> SettingsResult<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)
        .map_err(|e| SettingsError::ConfigDirectory(format!("{}: {}", dir.display(), e)))?;
    Ok(dir)
}

/// Load settings from `path`, or return defaults if the file is missing.
///
/// A file that exists but fails to parse or validate is an error.
pub fn load_or_default(path: &Path) -> SettingsResult<CanvasSettings> {
    if !path.exists() {
        tracing::info!(
            "No settings at {}, using defaults",
            path.display()
        );
        return Ok(CanvasSettings::default());
    }
    CanvasSettings::load_from_file(path)
}
