//! Constants used throughout the application.
//!
//! This module contains all constants used in the vocalog application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "vocalog";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A voice and text journal with tagged timelines and exports";

// Logging
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for the vocalog data directory.
pub const ENV_VAR_VOCALOG_DIR: &str = "VOCALOG_DIR";
/// Environment variable overriding the persisted API key.
pub const ENV_VAR_API_KEY: &str = "VOCALOG_API_KEY";
/// Environment variable for the chat/transcription API base URL.
pub const ENV_VAR_API_BASE: &str = "VOCALOG_API_BASE";
/// Environment variable for the chat model name.
pub const ENV_VAR_CHAT_MODEL: &str = "VOCALOG_CHAT_MODEL";
/// Environment variable for the transcription model name.
pub const ENV_VAR_TRANSCRIPTION_MODEL: &str = "VOCALOG_TRANSCRIPTION_MODEL";
/// Environment variable supplying an export passphrase non-interactively.
pub const ENV_VAR_EXPORT_PASSPHRASE: &str = "VOCALOG_EXPORT_PASSPHRASE";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory for vocalog data within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".vocalog";
/// Database file name inside the data directory.
pub const DB_FILE_NAME: &str = "vocalog.db";
/// Settings file name inside the data directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// AI
/// Default base URL of the chat-completion API.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
/// Default chat model used for summaries and digests.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
/// Default transcription model.
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";
/// Mood reported when a summary omits one.
pub const DEFAULT_MOOD: &str = "neutral";
/// Number of days covered by the weekly digest.
pub const DIGEST_WINDOW_DAYS: i64 = 7;

// File System Parameters
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Export
/// Date format used for export records and filenames (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Filename stem for exports.
pub const EXPORT_FILE_STEM: &str = "journal-export";
/// Filename suffix for encrypted exports.
pub const ENCRYPTED_EXPORT_SUFFIX: &str = "encrypted.json";
/// Highlights kept per entry in a full export.
pub const EXPORT_HIGHLIGHTS: usize = 5;
/// Highlights kept per entry in a preview.
pub const PREVIEW_HIGHLIGHTS: usize = 3;
/// Entries rendered in a preview.
pub const PREVIEW_ENTRIES: usize = 3;
/// Marker written in place of audio in markdown and text exports.
pub const AUDIO_MARKER: &str = "[Audio data included]";

// Encryption
/// Algorithm tag written into encrypted export envelopes.
pub const ENVELOPE_ALGORITHM: &str = "AES-256-GCM";
/// Key-derivation tag written into encrypted export envelopes.
pub const ENVELOPE_KDF: &str = "PBKDF2-SHA256";
/// PBKDF2 iteration count for new envelopes.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
/// Highest iteration count accepted when opening an envelope.
pub const MAX_PBKDF2_ITERATIONS: u32 = 10 * PBKDF2_ITERATIONS;
/// Salt length in bytes.
pub const SALT_LEN: usize = 16;
/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// Derived key length in bytes.
pub const KEY_LEN: usize = 32;
