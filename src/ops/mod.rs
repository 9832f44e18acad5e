//! High-level operations for the voice journal.
//!
//! This module provides user-facing operations that orchestrate the core
//! functionality: writing and editing entries, AI summaries, transcription,
//! weekly digests and exports. Every operation takes the database handle and
//! any AI capability explicitly.

pub mod entries;
pub mod export;
pub mod summarize;
pub mod transcribe;

// Re-export commonly used functions
pub use entries::{
    clear_journal, create_entry, delete_entry, edit_entry, journal_stats, show_entry, timeline,
};
pub use export::{
    count_selected, decrypt_export_file, export_journal, preview_journal, write_decrypted,
    write_export, DecryptedExport,
};
pub use summarize::{summarize_entry, weekly_digest};
pub use transcribe::transcribe_entry;
