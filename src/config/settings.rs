//! Persisted user settings.
//!
//! The only persisted setting is the AI service credential. It lives in a
//! small JSON file in the data directory, readable only by its owner.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Settings stored in `settings.json`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field(
                "api_key",
                &self
                    .api_key
                    .as_ref()
                    .map(|_| crate::constants::REDACTED_PLACEHOLDER),
            )
            .finish()
    }
}

impl Settings {
    /// Loads settings from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file exists but is not valid settings JSON.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!("No settings file at {:?}, using defaults", path);
            return Ok(Settings::default());
        }

        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| AppError::Config(format!("Invalid settings file {:?}: {}", path, e)))
    }

    /// Writes settings to `path`, creating or truncating it.
    ///
    /// On Unix the file is restricted to the owner (mode 0600).
    pub fn save(&self, path: &Path) -> AppResult<()> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to encode settings: {}", e)))?;
        super::write_private_file(path, raw.as_bytes())?;
        debug!("Settings saved to {:?}", path);
        Ok(())
    }

    /// Stores a trimmed API key; an empty key clears it.
    pub fn set_api_key(&mut self, key: &str) {
        let key = key.trim();
        self.api_key = if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        };
    }
}
