//! Entry CRUD operations.
//!
//! This module provides functions for saving, reading, deleting and
//! aggregating journal entries in the database. Every write runs inside its
//! own transaction so a failed call leaves no partial state behind.

use crate::errors::{AppResult, DatabaseError};
use crate::journal::{AudioClip, EntrySummary, JournalEntry, JournalStats};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

const SELECT_COLUMNS: &str = "id, content, tags, created_at, updated_at, timestamp, \
                              audio, audio_mime, transcript, summary";

/// Column values as stored, before JSON and timestamp decoding.
struct StoredEntry {
    id: String,
    content: String,
    tags: String,
    created_at: i64,
    updated_at: i64,
    timestamp: i64,
    audio: Option<Vec<u8>>,
    audio_mime: Option<String>,
    transcript: Option<String>,
    summary: Option<String>,
}

impl StoredEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(StoredEntry {
            id: row.get(0)?,
            content: row.get(1)?,
            tags: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
            timestamp: row.get(5)?,
            audio: row.get(6)?,
            audio_mime: row.get(7)?,
            transcript: row.get(8)?,
            summary: row.get(9)?,
        })
    }

    fn into_entry(self) -> AppResult<JournalEntry> {
        let corrupt = |message: String| DatabaseError::CorruptRecord {
            id: self.id.clone(),
            message,
        };

        let tags: Vec<String> = serde_json::from_str(&self.tags)
            .map_err(|e| corrupt(format!("invalid tags: {}", e)))?;
        let summary = match &self.summary {
            Some(raw) => Some(
                serde_json::from_str::<EntrySummary>(raw)
                    .map_err(|e| corrupt(format!("invalid summary: {}", e)))?,
            ),
            None => None,
        };
        let created_at = from_millis(self.created_at).ok_or_else(|| corrupt("created_at".into()))?;
        let updated_at = from_millis(self.updated_at).ok_or_else(|| corrupt("updated_at".into()))?;
        let timestamp = from_millis(self.timestamp).ok_or_else(|| corrupt("timestamp".into()))?;
        let audio = self.audio.map(|data| {
            AudioClip::new(
                self.audio_mime
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
                data,
            )
        });

        Ok(JournalEntry {
            id: self.id,
            content: self.content,
            tags,
            created_at,
            updated_at,
            timestamp,
            audio,
            transcript: self.transcript,
            summary,
        })
    }
}

fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

fn encode_json<T: serde::Serialize>(id: &str, value: &T) -> AppResult<String> {
    serde_json::to_string(value).map_err(|e| {
        DatabaseError::CorruptRecord {
            id: id.to_string(),
            message: format!("failed to encode: {}", e),
        }
        .into()
    })
}

/// Inserts an entry, or overwrites the stored entry with the same id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn save_entry(conn: &Connection, entry: &JournalEntry) -> AppResult<()> {
    debug!("Saving entry {}", entry.id);

    let tags = encode_json(&entry.id, &entry.tags)?;
    let summary = entry
        .summary
        .as_ref()
        .map(|s| encode_json(&entry.id, s))
        .transpose()?;

    let tx = conn
        .unchecked_transaction()
        .map_err(DatabaseError::Sqlite)?;
    tx.execute(
        r#"
        INSERT INTO entries (id, content, tags, created_at, updated_at, timestamp,
                             audio, audio_mime, transcript, summary)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ON CONFLICT(id) DO UPDATE SET
            content = excluded.content,
            tags = excluded.tags,
            created_at = excluded.created_at,
            updated_at = excluded.updated_at,
            timestamp = excluded.timestamp,
            audio = excluded.audio,
            audio_mime = excluded.audio_mime,
            transcript = excluded.transcript,
            summary = excluded.summary
        "#,
        params![
            entry.id,
            entry.content,
            tags,
            entry.created_at.timestamp_millis(),
            entry.updated_at.timestamp_millis(),
            entry.timestamp.timestamp_millis(),
            entry.audio.as_ref().map(|a| a.data.as_slice()),
            entry.audio.as_ref().map(|a| a.mime_type.as_str()),
            entry.transcript,
            summary,
        ],
    )
    .map_err(DatabaseError::Sqlite)?;
    tx.commit().map_err(DatabaseError::Sqlite)?;

    Ok(())
}

/// Retrieves an entry by id.
///
/// # Errors
///
/// Returns an error if the database operation fails or the stored record
/// cannot be decoded. Returns `Ok(None)` if no entry has the given id.
pub fn get_entry_by_id(conn: &Connection, id: &str) -> AppResult<Option<JournalEntry>> {
    debug!("Getting entry {}", id);

    let stored = conn
        .query_row(
            &format!("SELECT {} FROM entries WHERE id = ?1", SELECT_COLUMNS),
            params![id],
            StoredEntry::from_row,
        )
        .optional()
        .map_err(DatabaseError::Sqlite)?;

    stored.map(StoredEntry::into_entry).transpose()
}

/// Retrieves all entries, newest display timestamp first.
///
/// Entries sharing a display timestamp are ordered by id so the result is
/// deterministic.
pub fn get_all_entries(conn: &Connection) -> AppResult<Vec<JournalEntry>> {
    debug!("Getting all entries");
    query_entries(
        conn,
        &format!(
            "SELECT {} FROM entries ORDER BY timestamp DESC, id ASC",
            SELECT_COLUMNS
        ),
        params![],
    )
}

/// Retrieves entries whose display timestamp falls in `[start, end)`, newest first.
pub fn get_entries_between(
    conn: &Connection,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> AppResult<Vec<JournalEntry>> {
    debug!("Getting entries between {} and {}", start, end);
    query_entries(
        conn,
        &format!(
            "SELECT {} FROM entries WHERE timestamp >= ?1 AND timestamp < ?2 \
             ORDER BY timestamp DESC, id ASC",
            SELECT_COLUMNS
        ),
        params![start.timestamp_millis(), end.timestamp_millis()],
    )
}

fn query_entries(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> AppResult<Vec<JournalEntry>> {
    let mut stmt = conn.prepare(sql).map_err(DatabaseError::Sqlite)?;
    let rows = stmt
        .query_map(params, StoredEntry::from_row)
        .map_err(DatabaseError::Sqlite)?;

    let mut entries = Vec::new();
    for row in rows {
        let stored = row.map_err(DatabaseError::Sqlite)?;
        entries.push(stored.into_entry()?);
    }
    Ok(entries)
}

/// Deletes an entry by id. Deleting a missing id is a no-op.
///
/// Returns whether a row was removed.
pub fn delete_entry(conn: &Connection, id: &str) -> AppResult<bool> {
    debug!("Deleting entry {}", id);

    let tx = conn
        .unchecked_transaction()
        .map_err(DatabaseError::Sqlite)?;
    let removed = tx
        .execute("DELETE FROM entries WHERE id = ?1", params![id])
        .map_err(DatabaseError::Sqlite)?;
    tx.commit().map_err(DatabaseError::Sqlite)?;

    Ok(removed > 0)
}

/// Removes every entry. Returns the number of entries removed.
pub fn clear_entries(conn: &Connection) -> AppResult<usize> {
    debug!("Clearing all entries");

    let tx = conn
        .unchecked_transaction()
        .map_err(DatabaseError::Sqlite)?;
    let removed = tx
        .execute("DELETE FROM entries", [])
        .map_err(DatabaseError::Sqlite)?;
    tx.commit().map_err(DatabaseError::Sqlite)?;

    Ok(removed)
}

/// Computes aggregate statistics over the stored entries.
pub fn get_stats(conn: &Connection) -> AppResult<JournalStats> {
    let entries = get_all_entries(conn)?;
    Ok(JournalStats::from_entries(&entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::journal::{EntryDraft, EntryEdit};
    use rusqlite::Connection;

    fn setup_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::schema::create_tables(&conn).unwrap();
        conn
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn entry_at(content: &str, timestamp: DateTime<Utc>) -> JournalEntry {
        JournalEntry::create(
            EntryDraft {
                content: content.to_string(),
                timestamp: Some(timestamp),
                ..EntryDraft::default()
            },
            timestamp,
        )
        .unwrap()
    }

    #[test]
    fn test_save_and_get_roundtrip() {
        let conn = setup_test_db();
        let mut entry = JournalEntry::create(
            EntryDraft {
                content: "Hello world. Second sentence.".to_string(),
                tags: vec!["Work".to_string(), "Ideas".to_string()],
                audio: Some(AudioClip::new("audio/webm", vec![7, 8, 9])),
                transcript: Some("hello world".to_string()),
                timestamp: None,
            },
            Utc.timestamp_millis_opt(1_705_314_600_123).unwrap(),
        )
        .unwrap();
        entry.summary = Some(EntrySummary {
            highlights: vec!["greeting".to_string()],
            mood: "calm".to_string(),
            ..EntrySummary::default()
        });

        save_entry(&conn, &entry).unwrap();
        let loaded = get_entry_by_id(&conn, &entry.id).unwrap().unwrap();

        assert_eq!(loaded, entry);
    }

    #[test]
    fn test_get_entry_by_id_not_found() {
        let conn = setup_test_db();
        assert!(get_entry_by_id(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_by_id() {
        let conn = setup_test_db();
        let mut entry = entry_at("draft", at(1, 9));
        save_entry(&conn, &entry).unwrap();

        entry
            .apply_edit(
                EntryEdit {
                    content: Some("final".to_string()),
                    ..EntryEdit::default()
                },
                at(1, 10),
            )
            .unwrap();
        save_entry(&conn, &entry).unwrap();

        let all = get_all_entries(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content, "final");
        assert_eq!(all[0].updated_at, at(1, 10));
    }

    #[test]
    fn test_get_all_sorted_by_display_timestamp_desc() {
        let conn = setup_test_db();
        for (content, ts) in [("mid", at(2, 9)), ("old", at(1, 9)), ("new", at(3, 9))] {
            save_entry(&conn, &entry_at(content, ts)).unwrap();
        }

        let contents: Vec<String> = get_all_entries(&conn)
            .unwrap()
            .into_iter()
            .map(|e| e.content)
            .collect();
        assert_eq!(contents, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_get_entries_between_is_half_open() {
        let conn = setup_test_db();
        save_entry(&conn, &entry_at("before", at(1, 0))).unwrap();
        save_entry(&conn, &entry_at("inside", at(2, 12))).unwrap();
        save_entry(&conn, &entry_at("boundary", at(3, 0))).unwrap();

        let entries = get_entries_between(&conn, at(2, 0), at(3, 0)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "inside");
    }

    #[test]
    fn test_delete_entry_and_missing_is_noop() {
        let conn = setup_test_db();
        let entry = entry_at("to delete", at(1, 9));
        save_entry(&conn, &entry).unwrap();

        assert!(delete_entry(&conn, &entry.id).unwrap());
        assert!(!delete_entry(&conn, &entry.id).unwrap());
        assert!(get_entry_by_id(&conn, &entry.id).unwrap().is_none());
    }

    #[test]
    fn test_stats_after_delete() {
        let conn = setup_test_db();
        let entries: Vec<_> = (1..=4).map(|d| entry_at("x", at(d, 9))).collect();
        for entry in &entries {
            save_entry(&conn, entry).unwrap();
        }
        delete_entry(&conn, &entries[0].id).unwrap();

        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.oldest_entry, Some(at(2, 9)));
        assert_eq!(stats.newest_entry, Some(at(4, 9)));
    }

    #[test]
    fn test_clear_entries() {
        let conn = setup_test_db();
        save_entry(&conn, &entry_at("a", at(1, 9))).unwrap();
        save_entry(&conn, &entry_at("b", at(2, 9))).unwrap();

        assert_eq!(clear_entries(&conn).unwrap(), 2);
        assert_eq!(get_stats(&conn).unwrap(), JournalStats::default());
    }

    #[test]
    fn test_corrupt_tags_reported() {
        let conn = setup_test_db();
        let entry = entry_at("a", at(1, 9));
        save_entry(&conn, &entry).unwrap();
        conn.execute("UPDATE entries SET tags = 'not json'", [])
            .unwrap();

        let result = get_entry_by_id(&conn, &entry.id);
        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::CorruptRecord { .. }))
        ));
    }
}
