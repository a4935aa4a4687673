//! Project formatter settings (`.assistantConfig`).

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::errors::SettingsError;
use crate::domain::models::FormatSettings;

/// File name of the project settings document, relative to the workspace root.
pub const SETTINGS_FILE_NAME: &str = ".assistantConfig";

pub fn settings_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE_NAME)
}

/// Load the project's formatter settings from `root`.
///
/// A missing file yields the defaults; an unreadable or invalid file is an error.
pub fn load_project_settings(root: &Path) -> Result<FormatSettings, SettingsError> {
    let path = settings_path(root);
    if !path.exists() {
        debug!(path = %path.display(), "no project settings file, using defaults");
        return Ok(FormatSettings::default());
    }
    load_settings_file(&path)
}

pub fn load_settings_file(path: &Path) -> Result<FormatSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.display().to_string(),
        source,
    })?;
    FormatSettings::from_json(&content)
}

/// Write `settings` to `path` as pretty JSON.
pub fn export_settings(settings: &FormatSettings, path: &Path) -> Result<(), SettingsError> {
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SettingsError::Invalid(e.to_string()))?;
    std::fs::write(path, json).map_err(|source| SettingsError::Write {
        path: path.display().to_string(),
        source,
    })
}
