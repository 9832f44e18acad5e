//! Error handling utilities for the vocalog application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Errors fall into four families, each with its own enum: storage
//! ([`DatabaseError`]), input validation ([`ValidationError`]), the external
//! AI service ([`AIError`]) and export encryption ([`CryptoError`]). None of
//! them is retried; every failure is terminal for the call that produced it.

use thiserror::Error;

/// Represents specific error cases that can occur during database operations.
///
/// # Examples
///
/// ```
/// use vocalog::errors::DatabaseError;
///
/// let error = DatabaseError::NotFound("Entry with id abc not found".to_string());
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite database error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}\n\nThis may indicate database connection issues. Try closing other vocalog instances.")]
    Pool(#[from] r2d2::Error),

    /// Requested entry not found in database.
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// A stored record could not be decoded.
    #[error("Corrupt record {id}: {message}")]
    CorruptRecord {
        /// Id of the offending entry
        id: String,
        /// What failed to decode
        message: String,
    },

    /// The database was written by a newer schema.
    #[error("Database schema v{found} is newer than the supported v{supported}")]
    UnsupportedSchema {
        /// Version stored in the file
        found: i32,
        /// Highest version this build understands
        supported: i32,
    },
}

/// Input rejected before any I/O takes place.
///
/// # Examples
///
/// ```
/// use vocalog::errors::ValidationError;
///
/// let error = ValidationError::PassphraseMismatch;
/// assert!(format!("{}", error).contains("do not match"));
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Neither text content nor an audio recording was provided.
    #[error("An entry needs either text content or an audio recording")]
    EmptyEntry,

    /// The export selection contains no entries.
    #[error("No entries selected for export")]
    EmptySelection,

    /// Encryption was requested without a passphrase.
    #[error("Encryption requires a passphrase")]
    MissingPassphrase,

    /// The passphrase and its confirmation differ.
    #[error("Passphrases do not match")]
    PassphraseMismatch,

    /// The operation needs an audio recording the entry does not have.
    #[error("Entry {0} has no audio recording")]
    NoAudio(String),

    /// No entries fall inside the digest window.
    #[error("No entries in the last {0} days to build a digest from")]
    NothingToDigest(i64),

    /// A date or date range argument could not be used.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// An export format name was not recognised.
    #[error("Unknown export format '{0}'. Expected json, markdown or text")]
    UnknownFormat(String),
}

/// Represents specific error cases that can occur during AI operations.
///
/// # Examples
///
/// ```
/// use vocalog::errors::AIError;
///
/// let error = AIError::MissingApiKey;
/// assert!(format!("{}", error).contains("config set-api-key"));
/// ```
#[derive(Debug, Error)]
pub enum AIError {
    /// No API key is configured, so AI features are disabled.
    #[error("AI features are disabled: no API key configured. Set one with `vocalog config set-api-key <KEY>` or VOCALOG_API_KEY")]
    MissingApiKey,

    /// The API rejected the credential.
    #[error("The AI service rejected the API key (HTTP {0}). Check the key with `vocalog config show`")]
    Unauthorized(u16),

    /// The API could not be reached.
    #[error("Could not reach the AI service: {0}. Check your network connection and VOCALOG_API_BASE")]
    Unreachable(#[source] reqwest::Error),

    /// Invalid or unexpected response from the API.
    #[error("Invalid response from the AI service: {0}")]
    InvalidResponse(String),
}

/// Represents specific error cases that can occur while encrypting or
/// decrypting an export envelope.
///
/// # Examples
///
/// ```
/// use vocalog::errors::CryptoError;
///
/// let error = CryptoError::AuthenticationFailed;
/// assert!(format!("{}", error).contains("passphrase"));
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Key derivation was given unusable input.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// The AEAD tag did not verify: wrong passphrase or tampered data.
    #[error("Decryption failed: wrong passphrase or corrupted export")]
    AuthenticationFailed,

    /// Encryption itself failed.
    #[error("Encryption failed")]
    EncryptionFailed,

    /// The envelope is structurally broken.
    #[error("Malformed encrypted export: {0}")]
    MalformedEnvelope(String),

    /// The envelope names an algorithm this build does not support.
    #[error("Unsupported encryption format: {0}")]
    UnsupportedFormat(String),
}

/// Represents all possible errors that can occur in the vocalog application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// ```
/// use vocalog::errors::AppError;
///
/// let error = AppError::Config("Missing data directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing data directory");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors in journal logic that are not input validation.
    #[error("Journal error: {0}")]
    Journal(String),

    /// Input rejected before any I/O.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Errors related to database operations.
    #[error("Storage error: {0}")]
    Database(#[from] DatabaseError),

    /// Errors related to AI operations.
    #[error("AI error: {0}")]
    AI(#[from] AIError),

    /// Errors related to export encryption.
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
pub type AppResult<T> = Result<T, AppError>;
