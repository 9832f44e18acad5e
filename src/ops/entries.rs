//! Entry lifecycle operations: create, edit, delete, list and stats.

use crate::db::{entries as store, Database};
use crate::errors::{AppResult, DatabaseError};
use crate::journal::{EntryDraft, EntryEdit, JournalEntry, JournalStats};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Creates and stores a new entry.
///
/// # Errors
///
/// Returns `ValidationError::EmptyEntry` when the draft has neither text nor
/// audio, or a database error if the write fails.
pub fn create_entry(db: &Database, draft: EntryDraft, now: DateTime<Utc>) -> AppResult<JournalEntry> {
    let entry = JournalEntry::create(draft, now)?;
    let conn = db.get_conn()?;
    store::save_entry(&conn, &entry)?;

    info!("Created entry {}", entry.id);
    Ok(entry)
}

/// Loads one entry, failing when it does not exist.
pub fn show_entry(db: &Database, id: &str) -> AppResult<JournalEntry> {
    let conn = db.get_conn()?;
    store::get_entry_by_id(&conn, id)?.ok_or_else(|| DatabaseError::NotFound(id.to_string()).into())
}

/// Applies an edit to an existing entry and stores the result.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` for an unknown id. A rejected edit
/// leaves the stored entry unchanged.
pub fn edit_entry(
    db: &Database,
    id: &str,
    edit: EntryEdit,
    now: DateTime<Utc>,
) -> AppResult<JournalEntry> {
    let conn = db.get_conn()?;
    let mut entry = store::get_entry_by_id(&conn, id)?
        .ok_or_else(|| DatabaseError::NotFound(id.to_string()))?;

    entry.apply_edit(edit, now)?;
    store::save_entry(&conn, &entry)?;

    info!("Updated entry {}", entry.id);
    Ok(entry)
}

/// Deletes an entry. Returns whether anything was removed.
pub fn delete_entry(db: &Database, id: &str) -> AppResult<bool> {
    let conn = db.get_conn()?;
    let removed = store::delete_entry(&conn, id)?;
    if removed {
        info!("Deleted entry {}", id);
    } else {
        debug!("No entry {} to delete", id);
    }
    Ok(removed)
}

/// Removes every entry. Returns how many were removed.
pub fn clear_journal(db: &Database) -> AppResult<usize> {
    let conn = db.get_conn()?;
    let removed = store::clear_entries(&conn)?;
    info!("Cleared journal ({} entries removed)", removed);
    Ok(removed)
}

/// All entries, newest first.
pub fn timeline(db: &Database) -> AppResult<Vec<JournalEntry>> {
    let conn = db.get_conn()?;
    store::get_all_entries(&conn)
}

pub fn journal_stats(db: &Database) -> AppResult<JournalStats> {
    let conn = db.get_conn()?;
    store::get_stats(&conn)
}
