//! Export pipeline for journal entries.
//!
//! An export selects entries (by id and/or date range), renders them to one
//! of three text formats and optionally seals the result in an encrypted
//! envelope. The output carries a suggested filename and content type so
//! callers can write it to disk or print it.
//!
//! # Module Structure
//!
//! - `render`: per-entry records, highlights and the JSON/Markdown/text renderers
//!
//! # Example
//!
//! ```
//! use vocalog::export::{export_entries, ExportFormat, ExportOptions};
//! use vocalog::journal::{EntryDraft, JournalEntry};
//! use chrono::{NaiveDate, Utc};
//!
//! let entry = JournalEntry::create(
//!     EntryDraft { content: "Hello world.".into(), ..Default::default() },
//!     Utc::now(),
//! )?;
//! let options = ExportOptions { format: ExportFormat::Markdown, ..Default::default() };
//! let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let output = export_entries(&[entry], &options, today)?;
//! assert_eq!(output.filename, "journal-export-2024-01-15.md");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod render;

pub use self::render::{highlights, ExportRecord};

use crate::constants::{
    DATE_FORMAT_ISO, ENCRYPTED_EXPORT_SUFFIX, EXPORT_FILE_STEM, EXPORT_HIGHLIGHTS,
    PREVIEW_ENTRIES, PREVIEW_HIGHLIGHTS, REDACTED_PLACEHOLDER,
};
use crate::crypto::encrypt_export;
use crate::errors::{AppResult, ValidationError};
use crate::journal::JournalEntry;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Markdown,
    Text,
}

impl ExportFormat {
    /// Tag recorded in encrypted envelopes.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "markdown",
            ExportFormat::Text => "text",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Text => "text/plain",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "text" | "txt" | "plain" => Ok(ExportFormat::Text),
            _ => Err(ValidationError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive range of calendar dates, compared against display dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDate` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if start > end {
            return Err(ValidationError::InvalidDate(format!(
                "range start {} is after end {}",
                start, end
            ))
            .into());
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// What to export and how.
#[derive(Clone)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub include_tags: bool,
    pub include_audio: bool,
    /// Restrict the export to these ids; `None` selects everything.
    pub entry_ids: Option<Vec<String>>,
    pub encrypt: bool,
    pub passphrase: Option<Zeroizing<String>>,
    pub date_range: Option<DateRange>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Json,
            include_tags: true,
            include_audio: false,
            entry_ids: None,
            encrypt: false,
            passphrase: None,
            date_range: None,
        }
    }
}

impl fmt::Debug for ExportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportOptions")
            .field("format", &self.format)
            .field("include_tags", &self.include_tags)
            .field("include_audio", &self.include_audio)
            .field("entry_ids", &self.entry_ids)
            .field("encrypt", &self.encrypt)
            .field(
                "passphrase",
                &self.passphrase.as_ref().map(|_| REDACTED_PLACEHOLDER),
            )
            .field("date_range", &self.date_range)
            .finish()
    }
}

/// A rendered export ready to be written or printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutput {
    pub content: String,
    pub filename: String,
    pub content_type: &'static str,
    pub encrypted: bool,
}

/// Applies the id and date-range filters, keeping input order.
pub fn select_entries<'a>(
    entries: &'a [JournalEntry],
    options: &ExportOptions,
) -> Vec<&'a JournalEntry> {
    entries
        .iter()
        .filter(|entry| {
            options
                .entry_ids
                .as_ref()
                .map_or(true, |ids| ids.iter().any(|id| id == &entry.id))
        })
        .filter(|entry| {
            options
                .date_range
                .map_or(true, |range| range.contains(entry.display_date()))
        })
        .collect()
}

fn render(
    selected: &[&JournalEntry],
    options: &ExportOptions,
    highlight_limit: usize,
) -> AppResult<String> {
    let records: Vec<ExportRecord> = selected
        .iter()
        .map(|entry| {
            ExportRecord::from_entry(
                entry,
                options.include_tags,
                options.include_audio,
                highlight_limit,
            )
        })
        .collect();

    match options.format {
        ExportFormat::Json => render::render_json(&records),
        ExportFormat::Markdown => Ok(render::render_markdown(&records)),
        ExportFormat::Text => render::render_text(&records),
    }
}

/// Exports the selected entries.
///
/// `today` only feeds the suggested filename; the content depends solely on
/// `entries` and `options`.
///
/// # Errors
///
/// - `ValidationError::EmptySelection` when no entry survives selection
/// - `ValidationError::MissingPassphrase` when encryption is requested without one
/// - encryption errors from the envelope
pub fn export_entries(
    entries: &[JournalEntry],
    options: &ExportOptions,
    today: NaiveDate,
) -> AppResult<ExportOutput> {
    let selected = select_entries(entries, options);
    if selected.is_empty() {
        return Err(ValidationError::EmptySelection.into());
    }
    let passphrase = if options.encrypt {
        match options.passphrase.as_ref().filter(|p| !p.is_empty()) {
            Some(passphrase) => Some(passphrase),
            None => return Err(ValidationError::MissingPassphrase.into()),
        }
    } else {
        None
    };

    debug!(
        "Exporting {} of {} entries as {}",
        selected.len(),
        entries.len(),
        options.format
    );
    let content = render(&selected, options, EXPORT_HIGHLIGHTS)?;
    let stem = format!("{}-{}", EXPORT_FILE_STEM, today.format(DATE_FORMAT_ISO));

    let output = match passphrase {
        Some(passphrase) => {
            let envelope = encrypt_export(content.as_bytes(), passphrase, options.format.as_str())?;
            ExportOutput {
                content: envelope.to_json()?,
                filename: format!("{}.{}", stem, ENCRYPTED_EXPORT_SUFFIX),
                content_type: ExportFormat::Json.content_type(),
                encrypted: true,
            }
        }
        None => ExportOutput {
            content,
            filename: format!("{}.{}", stem, options.format.extension()),
            content_type: options.format.content_type(),
            encrypted: false,
        },
    };

    info!(
        "Export ready: {} entries, {} bytes{}",
        selected.len(),
        output.content.len(),
        if output.encrypted { ", encrypted" } else { "" }
    );
    Ok(output)
}

/// Renders a short preview: the first three selected entries with three
/// highlights each, followed by a count of the omitted entries.
///
/// Previews are never encrypted.
pub fn preview_export(entries: &[JournalEntry], options: &ExportOptions) -> AppResult<String> {
    let selected = select_entries(entries, options);
    if selected.is_empty() {
        return Err(ValidationError::EmptySelection.into());
    }

    let shown = selected.len().min(PREVIEW_ENTRIES);
    let mut preview = render(&selected[..shown], options, PREVIEW_HIGHLIGHTS)?;
    let omitted = selected.len() - shown;
    if omitted > 0 {
        preview.push_str(&format!("\n\n...and {} more entries", omitted));
    }
    Ok(preview)
}
