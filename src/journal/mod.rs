//! Journal data model.
//!
//! This module defines the journal entry record, its optional audio
//! recording and AI summary, the draft/edit values used to create and change
//! entries, and the aggregate statistics computed over a set of entries.
//!
//! Validation lives here so every caller (CLI, ops, tests) gets the same
//! rules: an entry needs text or audio, tags are trimmed and de-duplicated,
//! and the id and creation time never change after creation.


use crate::constants::DEFAULT_MOOD;
use crate::errors::{AppResult, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// A recorded voice note attached to an entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioClip {
    /// MIME type of the recording, e.g. `audio/webm`
    pub mime_type: String,
    /// Raw recording bytes
    pub data: Vec<u8>,
}

impl std::fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl AudioClip {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Reads a recording from disk, guessing its MIME type from the extension.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let data = std::fs::read(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Ok(Self::new(mime_type_for_extension(extension), data))
    }

    /// File extension matching the MIME type, used for multipart uploads.
    pub fn file_extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "audio/webm" => "webm",
            "audio/ogg" => "ogg",
            "audio/wav" => "wav",
            "audio/mpeg" => "mp3",
            "audio/mp4" => "m4a",
            _ => "bin",
        }
    }
}

/// Maps a file extension to the MIME type recorded with the audio.
pub fn mime_type_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "webm" => "audio/webm",
        "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "m4a" | "mp4" => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// Structured AI summary of a single entry.
///
/// Every field has a neutral default so a partially filled summary from the
/// AI service still deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntrySummary {
    pub highlights: Vec<String>,
    pub decisions: Vec<String>,
    pub actions: Vec<String>,
    pub risks: Vec<String>,
    pub mood: String,
}

impl Default for EntrySummary {
    fn default() -> Self {
        Self {
            highlights: Vec::new(),
            decisions: Vec::new(),
            actions: Vec::new(),
            risks: Vec::new(),
            mood: DEFAULT_MOOD.to_string(),
        }
    }
}

/// One journal record.
///
/// `timestamp` is the user-facing display time used for timeline ordering;
/// `created_at` and `updated_at` track the record's own lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioClip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<EntrySummary>,
}

/// Input for a new entry.
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub content: String,
    pub tags: Vec<String>,
    pub audio: Option<AudioClip>,
    pub transcript: Option<String>,
    /// Display time; defaults to the creation time.
    pub timestamp: Option<DateTime<Utc>>,
}

/// A partial update to an existing entry. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct EntryEdit {
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    /// `Some(None)` removes the recording, `Some(Some(..))` replaces it.
    pub audio: Option<Option<AudioClip>>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl JournalEntry {
    /// Builds a new entry from a draft, assigning a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyEntry` when the draft has neither text
    /// nor audio.
    pub fn create(draft: EntryDraft, now: DateTime<Utc>) -> AppResult<Self> {
        ensure_not_empty(&draft.content, draft.audio.as_ref())?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            content: draft.content,
            tags: normalize_tags(draft.tags),
            created_at: now,
            updated_at: now,
            timestamp: draft.timestamp.unwrap_or(now),
            audio: draft.audio,
            transcript: draft.transcript.filter(|t| !t.trim().is_empty()),
            summary: None,
        })
    }

    /// Applies an edit, refreshing `updated_at`.
    ///
    /// The edit is validated against the resulting entry before anything is
    /// changed, so a rejected edit leaves `self` untouched.
    pub fn apply_edit(&mut self, edit: EntryEdit, now: DateTime<Utc>) -> AppResult<()> {
        let content = edit.content.as_deref().unwrap_or(&self.content);
        let audio = match &edit.audio {
            Some(replacement) => replacement.as_ref(),
            None => self.audio.as_ref(),
        };
        ensure_not_empty(content, audio)?;

        if let Some(content) = edit.content {
            self.content = content;
        }
        if let Some(tags) = edit.tags {
            self.tags = normalize_tags(tags);
        }
        if let Some(audio) = edit.audio {
            // A new or removed recording invalidates the old transcript.
            self.audio = audio;
            self.transcript = None;
        }
        if let Some(timestamp) = edit.timestamp {
            self.timestamp = timestamp;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Calendar date of the display timestamp (UTC).
    pub fn display_date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// Text handed to the AI service: the content followed by the transcript.
    pub fn text_for_analysis(&self) -> String {
        match &self.transcript {
            Some(transcript) if !self.content.trim().is_empty() => {
                format!("{}\n\nTranscript:\n{}", self.content, transcript)
            }
            Some(transcript) => transcript.clone(),
            None => self.content.clone(),
        }
    }

    /// Approximate storage footprint: the JSON record without audio, plus the audio bytes.
    pub fn storage_size(&self) -> u64 {
        let audio_len = self.audio.as_ref().map_or(0, |a| a.data.len() as u64);
        let record_len = serde_json::to_vec(&RecordWithoutAudio(self))
            .map(|bytes| bytes.len() as u64)
            .unwrap_or(0);
        record_len + audio_len
    }
}

struct RecordWithoutAudio<'a>(&'a JournalEntry);

impl Serialize for RecordWithoutAudio<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entry = self.0.clone();
        entry.audio = None;
        entry.serialize(serializer)
    }
}

fn ensure_not_empty(content: &str, audio: Option<&AudioClip>) -> AppResult<()> {
    if content.trim().is_empty() && audio.is_none() {
        return Err(ValidationError::EmptyEntry.into());
    }
    Ok(())
}

/// Trims tags, drops empty ones and removes duplicates keeping the first occurrence.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !normalized.iter().any(|existing| existing == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}

/// Aggregate statistics over the current entry set. Derived, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalStats {
    pub total_entries: usize,
    pub total_size: u64,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

impl JournalStats {
    /// Computes statistics over a set of entries.
    pub fn from_entries(entries: &[JournalEntry]) -> Self {
        Self {
            total_entries: entries.len(),
            total_size: entries.iter().map(JournalEntry::storage_size).sum(),
            oldest_entry: entries.iter().map(|e| e.created_at).min(),
            newest_entry: entries.iter().map(|e| e.created_at).max(),
        }
    }
}
