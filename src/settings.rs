//! Panel settings loaded from a TOML file
//!
//! The two action command templates and the default SSH user. Search
//! order: an explicit `--config` path, then `settings.toml` in the
//! platform config directory, then built-in defaults. A missing default
//! file is fine; a missing explicit path or a malformed file is an error.

use std::path::Path;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Settings file name under the platform config dir
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Operator panel settings
///
/// Templates may use `{rack}`, `{address}` and `{user}` placeholders;
/// values substitute verbatim.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// Shell command for the "open console" action
    pub console_template: String,
    /// Shell command for the "probe status" action
    pub status_template: String,
    /// SSH user when none is given on the command line
    pub default_user: String,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            console_template: "ssh -o SetEnv=RACK_ID={rack} {user}@{address}".to_string(),
            status_template: "curl -fsS http://{address}/api/racks/{rack}/health".to_string(),
            default_user: "admin".to_string(),
        }
    }
}

impl PanelSettings {
    /// Load settings, falling back to defaults when no file exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(dirs) = ProjectDirs::from("", "", "rackpanel") {
            let path = dirs.config_dir().join(SETTINGS_FILE);
            if path.is_file() {
                return Self::from_file(&path);
            }
        }

        debug!("no settings file found, using defaults");
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings = toml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }
}
