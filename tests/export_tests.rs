//! Integration tests for exports: format coverage, byte-stable output,
//! the empty-selection guard and encrypted exports.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use vocalog::crypto::{decrypt_export, EncryptedExport};
use vocalog::errors::{AppError, ValidationError};
use vocalog::export::{export_entries, preview_export, DateRange, ExportFormat, ExportOptions};
use vocalog::journal::{AudioClip, EntryDraft, EntrySummary, JournalEntry};
use zeroize::Zeroizing;

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 10, 30, 0).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
}

fn work_entry() -> JournalEntry {
    JournalEntry::create(
        EntryDraft {
            content: "Hello world. Second sentence.".to_string(),
            tags: vec!["Work".to_string()],
            timestamp: Some(at(15)),
            ..EntryDraft::default()
        },
        at(15),
    )
    .unwrap()
}

fn options(format: ExportFormat) -> ExportOptions {
    ExportOptions {
        format,
        ..ExportOptions::default()
    }
}

#[test]
fn test_json_export_of_single_entry() {
    let output = export_entries(&[work_entry()], &options(ExportFormat::Json), today()).unwrap();
    assert_eq!(output.content_type, "application/json");
    assert_eq!(output.filename, "journal-export-2024-01-31.json");
    assert!(!output.encrypted);

    let parsed: Value = serde_json::from_str(&output.content).unwrap();
    let records = parsed.as_array().expect("array of records");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["date"], "2024-01-15");
    assert_eq!(
        record["highlights"],
        serde_json::json!(["Hello world", "Second sentence"])
    );
    assert_eq!(record["tags"], serde_json::json!(["Work"]));
    assert_eq!(record["entry"], "Hello world. Second sentence.");
    assert_eq!(record["timestamp"], "2024-01-15T10:30:00.000Z");
    assert!(record.get("audio").is_none());
    assert!(record.get("summary").is_none());
}

#[test]
fn test_json_keys_keep_declared_order() {
    let mut entry = work_entry();
    entry.transcript = Some("spoken".to_string());
    entry.summary = Some(EntrySummary::default());
    entry.audio = Some(AudioClip::new("audio/webm", vec![1, 2, 3]));
    let opts = ExportOptions {
        include_audio: true,
        ..ExportOptions::default()
    };

    let content = export_entries(&[entry], &opts, today()).unwrap().content;
    let positions: Vec<usize> = [
        "\"date\"",
        "\"highlights\"",
        "\"tags\"",
        "\"entry\"",
        "\"transcript\"",
        "\"summary\"",
        "\"audio\"",
        "\"timestamp\"",
    ]
    .iter()
    .map(|key| content.find(key).unwrap_or_else(|| panic!("missing {}", key)))
    .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(content.contains("\"audio\": \"AQID\""));
}

#[test]
fn test_markdown_and_text_tags_lines() {
    let markdown =
        export_entries(&[work_entry()], &options(ExportFormat::Markdown), today()).unwrap();
    assert_eq!(markdown.content_type, "text/markdown");
    assert!(markdown.filename.ends_with(".md"));
    assert!(markdown.content.lines().any(|line| line == "**Tags:** Work"));
    assert!(markdown.content.starts_with("# 2024-01-15\n"));

    let text = export_entries(&[work_entry()], &options(ExportFormat::Text), today()).unwrap();
    assert_eq!(text.content_type, "text/plain");
    assert!(text.filename.ends_with(".txt"));
    assert!(text.content.lines().any(|line| line == "Tags: Work"));
    assert!(text.content.lines().any(|line| line == "Date: 2024-01-15"));
}

#[test]
fn test_tags_can_be_excluded() {
    let opts = ExportOptions {
        format: ExportFormat::Markdown,
        include_tags: false,
        ..ExportOptions::default()
    };
    let output = export_entries(&[work_entry()], &opts, today()).unwrap();
    assert!(!output.content.contains("**Tags:**"));
}

#[test]
fn test_same_input_gives_identical_output() {
    let entries = vec![work_entry(), work_entry()];
    for format in [ExportFormat::Json, ExportFormat::Markdown, ExportFormat::Text] {
        let first = export_entries(&entries, &options(format), today()).unwrap();
        let second = export_entries(&entries, &options(format), today()).unwrap();
        assert_eq!(first, second, "{} export is not stable", format);
    }
}

#[test]
fn test_empty_selection_is_rejected() {
    let entries = vec![work_entry()];
    let by_id = ExportOptions {
        entry_ids: Some(vec!["no-such-id".to_string()]),
        ..ExportOptions::default()
    };
    assert!(matches!(
        export_entries(&entries, &by_id, today()),
        Err(AppError::Validation(ValidationError::EmptySelection))
    ));

    // Checked before the passphrase
    let encrypted_nothing = ExportOptions {
        encrypt: true,
        ..ExportOptions::default()
    };
    assert!(matches!(
        export_entries(&[], &encrypted_nothing, today()),
        Err(AppError::Validation(ValidationError::EmptySelection))
    ));
    assert!(preview_export(&[], &ExportOptions::default()).is_err());
}

#[test]
fn test_date_range_selection() {
    let make = |day| {
        JournalEntry::create(
            EntryDraft {
                content: format!("Day {}.", day),
                timestamp: Some(at(day)),
                ..EntryDraft::default()
            },
            at(day),
        )
        .unwrap()
    };
    let entries = vec![make(20), make(10), make(5)];
    let opts = ExportOptions {
        format: ExportFormat::Text,
        date_range: Some(
            DateRange::new(
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            )
            .unwrap(),
        ),
        ..ExportOptions::default()
    };

    let content = export_entries(&entries, &opts, today()).unwrap().content;
    assert!(content.contains("Day 10."));
    assert!(content.contains("Day 5."));
    assert!(!content.contains("Day 20."));
    assert!(content.find("Day 10.").unwrap() < content.find("Day 5.").unwrap());
}

#[test]
fn test_encrypted_export_round_trip() {
    let opts = ExportOptions {
        format: ExportFormat::Markdown,
        encrypt: true,
        passphrase: Some(Zeroizing::new("hunter2".to_string())),
        ..ExportOptions::default()
    };
    let output = export_entries(&[work_entry()], &opts, today()).unwrap();
    assert!(output.encrypted);
    assert_eq!(output.content_type, "application/json");
    assert_eq!(output.filename, "journal-export-2024-01-31.encrypted.json");

    let envelope = EncryptedExport::from_json(&output.content).unwrap();
    assert_eq!(envelope.format, "markdown");
    let plaintext = decrypt_export(&envelope, "hunter2").unwrap();

    let plain = export_entries(&[work_entry()], &options(ExportFormat::Markdown), today()).unwrap();
    assert_eq!(String::from_utf8(plaintext).unwrap(), plain.content);
}

#[test]
fn test_encrypt_without_passphrase() {
    let opts = ExportOptions {
        encrypt: true,
        passphrase: Some(Zeroizing::new(String::new())),
        ..ExportOptions::default()
    };
    assert!(matches!(
        export_entries(&[work_entry()], &opts, today()),
        Err(AppError::Validation(ValidationError::MissingPassphrase))
    ));
}
