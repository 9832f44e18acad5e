//! Configuration management for the vocalog application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables and the persisted settings file, with sensible defaults.
//!
//! # Environment Variables
//!
//! - `VOCALOG_DIR`: Data directory (defaults to ~/.vocalog)
//! - `VOCALOG_API_KEY`: AI service key, overriding the persisted one
//! - `VOCALOG_API_BASE`: AI service base URL (defaults to https://api.openai.com/v1)
//! - `VOCALOG_CHAT_MODEL`: Chat model (defaults to gpt-4o-mini)
//! - `VOCALOG_TRANSCRIPTION_MODEL`: Transcription model (defaults to whisper-1)
//! - `HOME`: Used for expanding the default data directory path

pub mod settings;

pub use settings::Settings;

use crate::ai::ChatClient;
use crate::constants::{
    DB_FILE_NAME, DEFAULT_API_BASE, DEFAULT_CHAT_MODEL, DEFAULT_DATA_SUBDIR,
    DEFAULT_TRANSCRIPTION_MODEL, ENV_VAR_API_BASE, ENV_VAR_API_KEY, ENV_VAR_CHAT_MODEL,
    ENV_VAR_HOME, ENV_VAR_TRANSCRIPTION_MODEL, ENV_VAR_VOCALOG_DIR, REDACTED_PLACEHOLDER,
    SETTINGS_FILE_NAME,
};
use crate::errors::{AIError, AppError, AppResult};
use std::env;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for the vocalog application.
///
/// Built once in `main` and passed explicitly to whatever needs it.
///
/// # Examples
///
/// ```
/// use vocalog::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/path/to/data"),
///     ..Config::default()
/// };
/// assert!(config.ai_client().is_err()); // no API key configured
/// ```
#[derive(Clone)]
pub struct Config {
    /// Directory holding the database and settings file.
    pub data_dir: PathBuf,

    /// AI service key. `None` disables AI features.
    pub api_key: Option<String>,

    /// AI service base URL.
    pub api_base: String,

    /// Chat model used for summaries and digests.
    pub chat_model: String,

    /// Model used for transcription.
    pub transcription_model: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &"[REDACTED_PATH]")
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED_PLACEHOLDER))
            .field("api_base", &self.api_base)
            .field("chat_model", &self.chat_model)
            .field("transcription_model", &self.transcription_model)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(""),
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    /// Loads configuration from environment variables and the settings file.
    ///
    /// `VOCALOG_API_KEY` takes precedence over the key stored in the
    /// settings file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The data directory path expansion fails or is empty
    /// - The API base URL is not http(s)
    /// - The settings file exists but cannot be parsed
    pub fn load() -> AppResult<Self> {
        let data_dir_str = env::var(ENV_VAR_VOCALOG_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });

        // Expand the path (handles ~ and environment variables)
        let expanded_path = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let data_dir = PathBuf::from(expanded_path.into_owned());

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let api_base = non_empty_env(ENV_VAR_API_BASE).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Config::validate_api_base(&api_base)?;

        let settings = Settings::load(&data_dir.join(SETTINGS_FILE_NAME))?;
        let api_key = non_empty_env(ENV_VAR_API_KEY).or(settings.api_key);

        let config = Config {
            data_dir,
            api_key,
            api_base,
            chat_model: non_empty_env(ENV_VAR_CHAT_MODEL)
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            transcription_model: non_empty_env(ENV_VAR_TRANSCRIPTION_MODEL)
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_MODEL.to_string()),
        };
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    fn validate_api_base(api_base: &str) -> AppResult<()> {
        if !(api_base.starts_with("https://") || api_base.starts_with("http://")) {
            return Err(AppError::Config(format!(
                "API base URL must start with http:// or https://, got '{}'",
                api_base
            )));
        }
        Ok(())
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Data directory path is empty"
    /// - "Data directory must be an absolute path"
    /// - an API base URL complaint
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }
        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }
        Config::validate_api_base(&self.api_base)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE_NAME)
    }

    /// Creates the data directory if needed (mode 0700 on Unix).
    pub fn ensure_data_dir(&self) -> AppResult<()> {
        if !self.data_dir.exists() {
            debug!("Creating data directory");
            fs::create_dir_all(&self.data_dir)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(
                    &self.data_dir,
                    fs::Permissions::from_mode(crate::constants::DEFAULT_DIR_PERMISSIONS),
                )?;
            }
        }
        Ok(())
    }

    /// Whether AI features are available.
    pub fn ai_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Builds the AI client from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `AIError::MissingApiKey` when no key is configured.
    pub fn ai_client(&self) -> AppResult<ChatClient> {
        let api_key = self.api_key.as_ref().ok_or(AIError::MissingApiKey)?;
        ChatClient::new(
            self.api_base.clone(),
            api_key.clone(),
            self.chat_model.clone(),
            self.transcription_model.clone(),
        )
    }
}

/// Creates or truncates `path` and writes `contents`, owner-only on Unix.
///
/// The mode is applied to the open handle before anything is written, so the
/// data is never readable by other users, even when `path` already existed
/// with looser permissions.
pub(crate) fn write_private_file(path: &Path, contents: &[u8]) -> AppResult<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(crate::constants::DEFAULT_FILE_PERMISSIONS);
    }

    let mut file = options.open(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(
            crate::constants::DEFAULT_FILE_PERMISSIONS,
        ))?;
    }

    file.write_all(contents)?;
    Ok(())
}
