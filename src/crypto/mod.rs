//! Cryptographic operations for encrypted exports.
//!
//! Exports can optionally be sealed in a password-based envelope before
//! they leave the machine. The transform is stateless in both directions.
//!
//! # Module Structure
//!
//! - `envelope`: PBKDF2-SHA256 key derivation and AES-256-GCM sealing
//!
//! # Example
//!
//! ```
//! use vocalog::crypto::{decrypt_export, encrypt_export};
//!
//! let envelope = encrypt_export(b"Secret journal entry", "passphrase", "text")?;
//! let plaintext = decrypt_export(&envelope, "passphrase")?;
//! assert_eq!(plaintext, b"Secret journal entry");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod envelope;

pub use self::envelope::{decrypt_export, encrypt_export, EncryptedExport};

use crate::errors::{AppResult, ValidationError};
use zeroize::Zeroizing;

/// Checks that a passphrase was entered identically twice.
///
/// This is the caller-side guard run before [`encrypt_export`]; the envelope
/// itself never sees the confirmation.
///
/// # Errors
///
/// Returns `ValidationError::MissingPassphrase` when the passphrase is empty
/// and `ValidationError::PassphraseMismatch` when the two values differ.
pub fn check_passphrase_confirmation(
    passphrase: Zeroizing<String>,
    confirmation: &str,
) -> AppResult<Zeroizing<String>> {
    if passphrase.is_empty() {
        return Err(ValidationError::MissingPassphrase.into());
    }
    if passphrase.as_str() != confirmation {
        return Err(ValidationError::PassphraseMismatch.into());
    }
    Ok(passphrase)
}
