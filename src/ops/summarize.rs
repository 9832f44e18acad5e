//! AI summary operations: per-entry summaries and the weekly digest.
//!
//! Summaries are stored on the entry itself; digests are returned to the
//! caller and never persisted.

use crate::ai::Summarizer;
use crate::constants::DIGEST_WINDOW_DAYS;
use crate::db::{entries as store, Database};
use crate::errors::{AppResult, DatabaseError, ValidationError};
use crate::journal::JournalEntry;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

/// Generates a structured summary for one entry and stores it.
///
/// The text sent for analysis is the entry content followed by its
/// transcript, when one exists.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` for an unknown id, or the summarizer's
/// error. On failure the stored entry is left untouched.
pub fn summarize_entry<S>(db: &Database, summarizer: &S, id: &str) -> AppResult<JournalEntry>
where
    S: Summarizer + ?Sized,
{
    let conn = db.get_conn()?;
    let mut entry = store::get_entry_by_id(&conn, id)?
        .ok_or_else(|| DatabaseError::NotFound(id.to_string()))?;

    let text = entry.text_for_analysis();
    debug!("Summarizing entry {} ({} chars)", entry.id, text.len());
    let summary = summarizer.summarize(&text)?;

    entry.summary = Some(summary);
    store::save_entry(&conn, &entry)?;

    info!("Stored summary for entry {}", entry.id);
    Ok(entry)
}

/// Compiles a narrative digest of the entries from the last seven days.
///
/// # Errors
///
/// Returns `ValidationError::NothingToDigest` when no entry falls inside
/// the window.
pub fn weekly_digest<S>(db: &Database, summarizer: &S, now: DateTime<Utc>) -> AppResult<String>
where
    S: Summarizer + ?Sized,
{
    let start = now - Duration::days(DIGEST_WINDOW_DAYS);
    // The range is half-open; nudge the end so an entry stamped `now` counts.
    let end = now + Duration::milliseconds(1);

    let conn = db.get_conn()?;
    let entries = store::get_entries_between(&conn, start, end)?;
    if entries.is_empty() {
        return Err(ValidationError::NothingToDigest(DIGEST_WINDOW_DAYS).into());
    }

    debug!("Compiling digest over {} entries", entries.len());
    let digest = summarizer.compile_digest(&entries)?;

    info!("Compiled weekly digest over {} entries", entries.len());
    Ok(digest)
}
