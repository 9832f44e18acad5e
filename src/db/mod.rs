//! Record store for journal entries.
//!
//! This module provides SQLite database operations for storing journal
//! entries, including their audio recordings and AI summaries. It uses
//! connection pooling via r2d2.
//!
//! # Module Structure
//!
//! - `schema`: Table definitions and schema initialization
//! - `entries`: Entry CRUD operations and statistics
//!
//! # Example
//!
//! ```no_run
//! use vocalog::db::Database;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/vocalog.db"))?;
//! db.initialize_schema()?;
//! let conn = db.get_conn()?;
//! let entries = vocalog::db::entries::get_all_entries(&conn)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod entries;
pub mod schema;

use crate::errors::{AppResult, DatabaseError};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database handle with connection pooling.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Opens or creates the journal database.
    ///
    /// If the database file doesn't exist, it will be created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database file cannot be opened or the
    /// connection pool cannot be initialized.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        debug!("Opening database at: {:?}", db_path);

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(4)
            .connection_customizer(Box::new(ConnectionPragmas {
                busy_timeout: Duration::from_secs(5),
            }))
            .build(manager)
            .map_err(DatabaseError::Pool)?;

        // Test the connection
        let conn = pool.get().map_err(DatabaseError::Pool)?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
            .map_err(DatabaseError::Sqlite)?;
        drop(conn);

        info!("Database opened successfully");
        Ok(Database { pool })
    }

    /// Gets a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the pool is exhausted.
    pub fn get_conn(&self) -> AppResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| DatabaseError::Pool(e).into())
    }

    /// Initializes the database schema.
    ///
    /// Creates all necessary tables and indexes if they don't exist.
    /// This is idempotent and safe to call multiple times.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::UnsupportedSchema` when the file was written by
    /// a newer schema version.
    pub fn initialize_schema(&self) -> AppResult<()> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;

        let version = schema::schema_version(&conn)?;
        if version > schema::SCHEMA_VERSION {
            return Err(DatabaseError::UnsupportedSchema {
                found: version,
                supported: schema::SCHEMA_VERSION,
            }
            .into());
        }
        info!("Database schema initialized");
        Ok(())
    }
}

/// Connection customizer applying per-connection pragmas.
#[derive(Debug)]
struct ConnectionPragmas {
    busy_timeout: Duration,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.busy_timeout(self.busy_timeout)?;
        Ok(())
    }

    fn on_release(&self, _conn: Connection) {}
}
