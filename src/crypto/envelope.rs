//! Password-based envelope for encrypted exports.
//!
//! A 256-bit key is derived from the passphrase with PBKDF2-HMAC-SHA256
//! (random 16-byte salt, 100 000 iterations) and the export is sealed with
//! AES-256-GCM under a random 12-byte nonce. The GCM tag is appended to the
//! ciphertext. Salt, nonce and ciphertext are stored as standard base64 in a
//! JSON envelope alongside the parameters needed to reverse the transform.

use crate::constants::{
    ENVELOPE_ALGORITHM, ENVELOPE_KDF, KEY_LEN, MAX_PBKDF2_ITERATIONS, NONCE_LEN,
    PBKDF2_ITERATIONS, SALT_LEN,
};
use crate::errors::{AppResult, CryptoError};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

/// Encrypted export envelope.
///
/// Immutable once produced. `format` records the logical export format
/// (`json`, `markdown` or `text`) of the sealed plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedExport {
    pub algorithm: String,
    pub kdf: String,
    pub iterations: u32,
    pub salt: String,
    pub iv: String,
    pub ciphertext: String,
    pub format: String,
}

impl EncryptedExport {
    /// Serializes the envelope as pretty-printed JSON.
    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CryptoError::MalformedEnvelope(e.to_string()).into())
    }

    /// Parses an envelope from its JSON form.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw).map_err(|e| CryptoError::MalformedEnvelope(e.to_string()).into())
    }
}

fn derive_key(
    passphrase: &str,
    salt: &[u8],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>, CryptoError> {
    if passphrase.is_empty() {
        return Err(CryptoError::KeyDerivation("passphrase is empty".to_string()));
    }
    if salt.is_empty() {
        return Err(CryptoError::KeyDerivation("salt is empty".to_string()));
    }
    if iterations == 0 {
        return Err(CryptoError::KeyDerivation(
            "iteration count must be positive".to_string(),
        ));
    }
    if iterations > MAX_PBKDF2_ITERATIONS {
        return Err(CryptoError::KeyDerivation(format!(
            "iteration count {} exceeds the limit of {}",
            iterations, MAX_PBKDF2_ITERATIONS
        )));
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, iterations, key.as_mut_slice());
    Ok(key)
}

fn cipher_for(key: &[u8; KEY_LEN]) -> Result<Aes256Gcm, CryptoError> {
    Aes256Gcm::new_from_slice(key)
        .map_err(|_| CryptoError::KeyDerivation("derived key has the wrong length".to_string()))
}

/// Seals `plaintext` under a key derived from `passphrase`.
///
/// A fresh salt and nonce are drawn from the OS RNG on every call, so two
/// encryptions of the same input never produce the same envelope.
///
/// # Errors
///
/// Returns `CryptoError::KeyDerivation` for an empty passphrase.
pub fn encrypt_export(plaintext: &[u8], passphrase: &str, format: &str) -> AppResult<EncryptedExport> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce);

    let key = derive_key(passphrase, &salt, PBKDF2_ITERATIONS)?;
    let ciphertext = cipher_for(&key)?
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    debug!(
        "Encrypted {} bytes of {} export",
        plaintext.len(),
        format
    );

    Ok(EncryptedExport {
        algorithm: ENVELOPE_ALGORITHM.to_string(),
        kdf: ENVELOPE_KDF.to_string(),
        iterations: PBKDF2_ITERATIONS,
        salt: STANDARD.encode(salt),
        iv: STANDARD.encode(nonce),
        ciphertext: STANDARD.encode(ciphertext),
        format: format.to_string(),
    })
}

/// Opens an envelope produced by [`encrypt_export`].
///
/// # Errors
///
/// - `CryptoError::UnsupportedFormat` for an unknown algorithm or KDF tag
/// - `CryptoError::MalformedEnvelope` for bad base64 or a wrong salt or nonce length
/// - `CryptoError::KeyDerivation` for an empty passphrase or an out-of-range iteration count
/// - `CryptoError::AuthenticationFailed` for a wrong passphrase or tampered data
pub fn decrypt_export(envelope: &EncryptedExport, passphrase: &str) -> AppResult<Vec<u8>> {
    if envelope.algorithm != ENVELOPE_ALGORITHM {
        return Err(CryptoError::UnsupportedFormat(envelope.algorithm.clone()).into());
    }
    if envelope.kdf != ENVELOPE_KDF {
        return Err(CryptoError::UnsupportedFormat(envelope.kdf.clone()).into());
    }

    let salt = decode_field("salt", &envelope.salt)?;
    let nonce = decode_field("iv", &envelope.iv)?;
    let ciphertext = decode_field("ciphertext", &envelope.ciphertext)?;
    if salt.len() != SALT_LEN {
        return Err(CryptoError::MalformedEnvelope(format!(
            "salt must be {} bytes, got {}",
            SALT_LEN,
            salt.len()
        ))
        .into());
    }
    if nonce.len() != NONCE_LEN {
        return Err(CryptoError::MalformedEnvelope(format!(
            "iv must be {} bytes, got {}",
            NONCE_LEN,
            nonce.len()
        ))
        .into());
    }

    let key = derive_key(passphrase, &salt, envelope.iterations)?;
    let plaintext = cipher_for(&key)?
        .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
        .map_err(|_| CryptoError::AuthenticationFailed)?;

    debug!("Decrypted {} export ({} bytes)", envelope.format, plaintext.len());
    Ok(plaintext)
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD
        .decode(value)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("{} is not valid base64: {}", name, e)))
}
