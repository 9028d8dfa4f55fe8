use anyhow::{anyhow, Result};
use directories::{BaseDirs, ProjectDirs};
use sentry_youtrack::PluginSettings;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "sentry-youtrack";
const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Load plugin settings from the explicit path or the user config directory
///
/// An explicit path must exist; the default location is optional.
pub fn load_settings(explicit: Option<&Path>) -> Result<PluginSettings> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(anyhow!("Settings file not found: {}", path.display()));
        }
    }

    let path = explicit.map(Path::to_path_buf).or_else(settings_path);
    PluginSettings::load(path.as_deref()).map_err(|e| anyhow!("Failed to load settings: {}", e))
}

/// Default settings file location
pub fn settings_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join(APP_NAME).join(SETTINGS_FILE_NAME));
    }

    ProjectDirs::from("", "", APP_NAME)
        .map(|d| d.config_dir().join(SETTINGS_FILE_NAME))
        .or_else(|| {
            BaseDirs::new().map(|dirs| {
                dirs.home_dir()
                    .join(".config")
                    .join(APP_NAME)
                    .join(SETTINGS_FILE_NAME)
            })
        })
}
