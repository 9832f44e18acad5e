/*!
# vocalog

vocalog is a personal voice and text journal. Entries combine free text, tags,
an optional voice recording and, once analysed, a transcript and a structured
AI summary. Entries live in a local SQLite database and can be exported as
JSON, Markdown or plain text, optionally sealed with a passphrase.

## Core Features

- Write, edit, list and delete entries on a timeline ordered by display time
- Attach voice recordings and transcribe them
- Structured AI summaries per entry and a weekly narrative digest
- Filtered exports with highlights, previews and AES-256-GCM encryption

## Architecture

- `cli`: Command-line interface handling using clap
- `config`: Configuration loading, validation and persisted settings
- `errors`: Error handling infrastructure
- `journal`: Entry model, drafts, edits and statistics
- `db`: SQLite record store with connection pooling
- `export`: Export selection and JSON/Markdown/text rendering
- `crypto`: Password-based envelope for encrypted exports
- `ai`: Chat-completion and transcription client
- `ops`: User-facing operations tying the modules together

## Usage Example

```rust,no_run
use vocalog::db::Database;
use vocalog::journal::EntryDraft;
use vocalog::{ops, Config};

fn main() -> vocalog::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;
    config.ensure_data_dir()?;

    let db = Database::open(&config.db_path())?;
    db.initialize_schema()?;

    let draft = EntryDraft {
        content: "Walked along the river.".to_string(),
        tags: vec!["outside".to_string()],
        ..EntryDraft::default()
    };
    let entry = ops::create_entry(&db, draft, chrono::Utc::now())?;
    println!("{}", entry.id);
    Ok(())
}
```
*/

/// AI summaries, digests and transcription
pub mod ai;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Encrypted export envelopes
pub mod crypto;
/// SQLite record store
pub mod db;
/// Error types and utilities for error handling
pub mod errors;
/// Export selection and rendering
pub mod export;
/// Journal entry model
pub mod journal;
/// High-level operations
pub mod ops;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use journal::{EntryDraft, EntryEdit, JournalEntry};
