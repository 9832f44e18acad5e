//! Transcription of an entry's voice recording.

use crate::ai::Transcriber;
use crate::db::{entries as store, Database};
use crate::errors::{AppResult, DatabaseError, ValidationError};
use crate::journal::JournalEntry;
use tracing::{debug, info, warn};

/// Transcribes the entry's audio and stores the transcript on the entry.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` for an unknown id and
/// `ValidationError::NoAudio` when the entry has no recording.
pub fn transcribe_entry<T>(db: &Database, transcriber: &T, id: &str) -> AppResult<JournalEntry>
where
    T: Transcriber + ?Sized,
{
    let conn = db.get_conn()?;
    let mut entry = store::get_entry_by_id(&conn, id)?
        .ok_or_else(|| DatabaseError::NotFound(id.to_string()))?;

    let clip = entry
        .audio
        .as_ref()
        .ok_or_else(|| ValidationError::NoAudio(id.to_string()))?;
    debug!("Transcribing {} bytes of {}", clip.data.len(), clip.mime_type);

    let transcript = transcriber.transcribe(clip)?;
    let transcript = transcript.trim();
    if transcript.is_empty() {
        warn!("Transcription of entry {} came back empty", entry.id);
        entry.transcript = None;
    } else {
        entry.transcript = Some(transcript.to_string());
    }
    store::save_entry(&conn, &entry)?;

    info!("Stored transcript for entry {}", entry.id);
    Ok(entry)
}
