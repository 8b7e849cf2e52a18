//! Persisted client settings.
//!
//! A JSON file with the notice service URL. The file lives under the
//! platform config directory unless overridden on the command line.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors from settings loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings file has no service url")]
    MissingUrl,
}

/// Client settings. Only the service URL is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// WebSocket URL of the notice service.
    #[serde(default)]
    pub url: String,
}

impl Settings {
    /// Loads settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let data = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&data)?;
        if settings.url.is_empty() {
            return Err(SettingsError::MissingUrl);
        }
        Ok(settings)
    }
}

/// Returns the default settings path.
pub fn default_settings_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("traybell").join("settings.json"))
}

/// Returns the platform-specific config directory.
fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join(".config"))
    }
}
