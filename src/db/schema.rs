//! Database schema definitions and initialization.
//!
//! A single `entries` table holds every journal record, keyed by its opaque
//! id, with an index on the display timestamp for sorted retrieval.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::Connection;
use tracing::{debug, info};

/// Current schema version.
///
/// Increment this whenever schema changes are made to support future migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Creates all database tables and indexes.
///
/// This function is idempotent - it uses `CREATE TABLE IF NOT EXISTS`
/// so it's safe to call multiple times.
///
/// # Tables
///
/// - `entries`: Journal entries, timestamps in Unix milliseconds
/// - `schema_version`: Singleton recording the schema version
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
pub fn create_tables(conn: &Connection) -> AppResult<()> {
    debug!("Creating database tables");

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id TEXT PRIMARY KEY NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            tags TEXT NOT NULL DEFAULT '[]',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            timestamp INTEGER NOT NULL,
            audio BLOB,
            audio_mime TEXT,
            transcript TEXT,
            summary TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_entries_timestamp ON entries(timestamp DESC);
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (id, version) VALUES (1, ?1)",
        [SCHEMA_VERSION],
    )
    .map_err(DatabaseError::Sqlite)?;

    info!("Database tables created (schema v{})", SCHEMA_VERSION);
    Ok(())
}

/// Reads the stored schema version.
pub fn schema_version(conn: &Connection) -> AppResult<i32> {
    let version = conn
        .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| {
            row.get(0)
        })
        .map_err(DatabaseError::Sqlite)?;
    Ok(version)
}
