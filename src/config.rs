use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

const APP_NAME: &str = "CodingTracker";
const FALLBACK_DATABASE_PATH: &str = "Database/CodingTracker.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the sqlite file, created on first open if missing.
    pub database_path: PathBuf,
}

impl Config {
    pub fn load() -> Option<Self> {
        let config_path = Self::path()?;
        let content = std::fs::read_to_string(&config_path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                debug!(error = %err, path = %config_path.display(), "Ignoring unreadable config");
                None
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let config_path = Self::path().ok_or(ConfigError::NoDataDir)?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&config_path, toml::to_string(self)?)?;
        Ok(config_path)
    }

    fn path() -> Option<PathBuf> {
        let app_dirs = platform_dirs::AppDirs::new(Some(APP_NAME), true)?;
        Some(app_dirs.data_dir.join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        // Get appdata dir, fall back to the working directory
        let database_path = match platform_dirs::AppDirs::new(Some(APP_NAME), true) {
            Some(app_dirs) => app_dirs.data_dir.join("coding_tracker.db"),
            None => PathBuf::from(FALLBACK_DATABASE_PATH),
        };

        Config { database_path }
    }
}
