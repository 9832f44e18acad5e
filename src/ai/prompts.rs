//! System prompts and message builders for AI interactions.

use super::client::Message;
use crate::constants::DATE_FORMAT_ISO;
use crate::journal::JournalEntry;

/// System prompt shared by every journal request.
pub const SYSTEM_PROMPT: &str = r#"You are a thoughtful journal assistant. You read personal journal
entries and help their author see what mattered.

Guidelines:
- Be warm, concise and non-judgmental
- Only use what is written in the entries; never invent events
- Respect the private nature of the material"#;

/// Builds messages asking for a structured summary of one entry.
///
/// The reply is expected to be a single JSON object; see
/// [`parse_summary`](super::summary::parse_summary) for how it is read.
pub fn summary_prompt(entry_text: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            r#"Summarize this journal entry.

Entry:
---
{}
---

Reply with ONLY a JSON object of this shape:
{{"highlights": ["..."], "decisions": ["..."], "actions": ["..."], "risks": ["..."], "mood": "one or two words"}}

Use empty lists when nothing fits."#,
            entry_text
        )),
    ]
}

/// Builds messages asking for a narrative digest of a week of entries.
///
/// Entries are listed oldest first so the digest reads chronologically.
pub fn digest_prompt(entries: &[JournalEntry]) -> Vec<Message> {
    let listing = entries
        .iter()
        .rev()
        .map(|entry| {
            let mut block = format!("[{}]", entry.display_date().format(DATE_FORMAT_ISO));
            if !entry.tags.is_empty() {
                block.push_str(&format!(" (tags: {})", entry.tags.join(", ")));
            }
            block.push('\n');
            block.push_str(&entry.text_for_analysis());
            if let Some(summary) = &entry.summary {
                block.push_str(&format!("\nMood: {}", summary.mood));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(format!(
            r#"Write a weekly digest of these journal entries.

Entries:
---
{}
---

Cover:
1. The main themes of the week
2. Notable decisions and open actions
3. How the author's mood moved over the week

Keep it to three short paragraphs."#,
            listing
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::EntryDraft;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_summary_prompt_contains_entry_and_keys() {
        let messages = summary_prompt("Shipped the release.");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[1].content.contains("Shipped the release."));
        for key in ["highlights", "decisions", "actions", "risks", "mood"] {
            assert!(messages[1].content.contains(key));
        }
    }

    #[test]
    fn test_digest_prompt_lists_entries_oldest_first() {
        let make = |content: &str, day: u32| {
            let ts = Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap();
            JournalEntry::create(
                EntryDraft {
                    content: content.to_string(),
                    tags: vec!["Work".to_string()],
                    timestamp: Some(ts),
                    ..EntryDraft::default()
                },
                ts,
            )
            .unwrap()
        };
        // Newest first, as the store returns them
        let entries = vec![make("Friday notes", 5), make("Monday notes", 1)];

        let messages = digest_prompt(&entries);
        let body = &messages[1].content;
        assert!(body.find("Monday notes").unwrap() < body.find("Friday notes").unwrap());
        assert!(body.contains("[2024-01-01] (tags: Work)"));
    }
}
