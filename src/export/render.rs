//! Per-entry export records and the three text renderers.
//!
//! The renderers are pure functions of their input: the same records always
//! produce byte-identical output, and nothing here reads the clock.

use crate::constants::{AUDIO_MARKER, DATE_FORMAT_ISO};
use crate::errors::{AppError, AppResult};
use crate::journal::{EntrySummary, JournalEntry};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::SecondsFormat;
use serde::Serialize;

/// Leading sentence fragments of `content`.
///
/// Splits on `.`, trims each fragment, drops empty ones and keeps at most
/// `limit`. Abbreviations and decimals split too.
pub fn highlights(content: &str, limit: usize) -> Vec<String> {
    content
        .split('.')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// One entry as it appears in an export.
///
/// Field order is the key order of the JSON rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub date: String,
    pub highlights: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub entry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<EntrySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    pub timestamp: String,
}

impl ExportRecord {
    pub fn from_entry(
        entry: &JournalEntry,
        include_tags: bool,
        include_audio: bool,
        highlight_limit: usize,
    ) -> Self {
        ExportRecord {
            date: entry.display_date().format(DATE_FORMAT_ISO).to_string(),
            highlights: highlights(&entry.content, highlight_limit),
            tags: include_tags.then(|| entry.tags.clone()),
            entry: entry.content.clone(),
            transcript: entry.transcript.clone(),
            summary: entry.summary.clone(),
            audio: if include_audio {
                entry.audio.as_ref().map(|clip| STANDARD.encode(&clip.data))
            } else {
                None
            },
            timestamp: entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    fn visible_tags(&self) -> Option<String> {
        self.tags
            .as_ref()
            .filter(|tags| !tags.is_empty())
            .map(|tags| tags.join(", "))
    }
}

/// Pretty-printed JSON array, 2-space indentation.
pub fn render_json(records: &[ExportRecord]) -> AppResult<String> {
    serde_json::to_string_pretty(records)
        .map_err(|e| AppError::Journal(format!("Failed to serialize export: {}", e)))
}

/// Markdown document, one level-1 section per entry separated by rules.
pub fn render_markdown(records: &[ExportRecord]) -> String {
    records
        .iter()
        .map(markdown_section)
        .collect::<Vec<_>>()
        .join("\n---\n\n")
}

fn markdown_section(record: &ExportRecord) -> String {
    let mut out = format!("# {}\n\n", record.date);

    if let Some(tags) = record.visible_tags() {
        out.push_str(&format!("**Tags:** {}\n\n", tags));
    }

    out.push_str(&record.entry);
    out.push('\n');

    if let Some(transcript) = &record.transcript {
        out.push_str("\n**Transcript:**\n");
        for line in transcript.lines() {
            out.push_str(&format!("> {}\n", line));
        }
    }

    if let Some(summary) = &record.summary {
        out.push_str("\n### AI Summary\n\n");
        if !summary.highlights.is_empty() {
            out.push_str("**Highlights:**\n");
            for highlight in &summary.highlights {
                out.push_str(&format!("- {}\n", highlight));
            }
            out.push('\n');
        }
        out.push_str(&format!("**Mood:** {}\n", summary.mood));
        if !summary.actions.is_empty() {
            out.push_str("\n**Actions:**\n");
            for action in &summary.actions {
                out.push_str(&format!("- {}\n", action));
            }
        }
    }

    if record.audio.is_some() {
        out.push_str(&format!("\n*{}*\n", AUDIO_MARKER));
    }

    out
}

/// Plain text, one labelled block per entry separated by a blank line.
pub fn render_text(records: &[ExportRecord]) -> AppResult<String> {
    let mut blocks = Vec::with_capacity(records.len());

    for record in records {
        let mut lines = vec![format!("Date: {}", record.date)];
        if let Some(tags) = record.visible_tags() {
            lines.push(format!("Tags: {}", tags));
        }
        lines.push(format!("Content: {}", record.entry));
        if let Some(transcript) = &record.transcript {
            lines.push(format!("Transcript: {}", transcript));
        }
        if let Some(summary) = &record.summary {
            let dump = serde_json::to_string(summary)
                .map_err(|e| AppError::Journal(format!("Failed to serialize summary: {}", e)))?;
            lines.push(format!("Summary: {}", dump));
        }
        if record.audio.is_some() {
            lines.push(format!("Audio: {}", AUDIO_MARKER));
        }
        blocks.push(lines.join("\n"));
    }

    Ok(blocks.join("\n\n"))
}
