//! Export operations: render the stored journal, write it out, and open
//! encrypted exports again.

use crate::config::write_private_file;
use crate::crypto::{decrypt_export, EncryptedExport};
use crate::db::Database;
use crate::errors::{AppResult, CryptoError, ValidationError};
use crate::export::{
    export_entries, preview_export, select_entries, ExportOptions, ExportOutput,
};
use crate::ops::entries::timeline;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tracing::info;

/// Exports the stored journal with `options`.
///
/// `today` names the output file.
pub fn export_journal(
    db: &Database,
    options: &ExportOptions,
    today: NaiveDate,
) -> AppResult<ExportOutput> {
    let entries = timeline(db)?;
    export_entries(&entries, options, today)
}

/// Counts the stored entries that `options` selects.
///
/// Lets callers reject an empty selection before asking for a passphrase.
///
/// # Errors
///
/// Returns `ValidationError::EmptySelection` when nothing matches.
pub fn count_selected(db: &Database, options: &ExportOptions) -> AppResult<usize> {
    let entries = timeline(db)?;
    match select_entries(&entries, options).len() {
        0 => Err(ValidationError::EmptySelection.into()),
        count => Ok(count),
    }
}

/// Renders a short preview of what [`export_journal`] would produce.
pub fn preview_journal(db: &Database, options: &ExportOptions) -> AppResult<String> {
    let entries = timeline(db)?;
    preview_export(&entries, options)
}

/// Writes an export to `path`, owner-only on Unix.
pub fn write_export(output: &ExportOutput, path: &Path) -> AppResult<()> {
    write_private_file(path, output.content.as_bytes())?;
    info!("Wrote export to {:?}", path);
    Ok(())
}

/// The plaintext recovered from an encrypted export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedExport {
    /// Format tag recorded in the envelope.
    pub format: String,
    pub content: String,
}

/// Reads an encrypted export file and decrypts it.
///
/// # Errors
///
/// Returns `CryptoError::MalformedEnvelope` for anything that is not an
/// envelope and `CryptoError::AuthenticationFailed` for a wrong passphrase
/// or a tampered file.
pub fn decrypt_export_file(path: &Path, passphrase: &str) -> AppResult<DecryptedExport> {
    let raw = fs::read_to_string(path)?;
    let envelope = EncryptedExport::from_json(&raw)?;
    let plaintext = decrypt_export(&envelope, passphrase)?;
    let content = String::from_utf8(plaintext)
        .map_err(|_| CryptoError::MalformedEnvelope("plaintext is not UTF-8".to_string()))?;

    info!("Decrypted {} export from {:?}", envelope.format, path);
    Ok(DecryptedExport {
        format: envelope.format,
        content,
    })
}

/// Writes decrypted plaintext to `path`, owner-only on Unix.
pub fn write_decrypted(decrypted: &DecryptedExport, path: &Path) -> AppResult<()> {
    write_private_file(path, decrypted.content.as_bytes())?;
    info!("Wrote decrypted {} export to {:?}", decrypted.format, path);
    Ok(())
}
