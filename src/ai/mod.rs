//! AI operations for entry summaries, weekly digests and transcription.
//!
//! This module wraps an external chat-completion API. Callers depend on the
//! [`Summarizer`] and [`Transcriber`] capabilities rather than on the HTTP
//! client, so the rest of the crate can be exercised without a network.
//!
//! # Module Structure
//!
//! - `client`: HTTP client for chat completion and transcription
//! - `prompts`: System prompts and message builders
//! - `summary`: Lenient parsing of structured summaries
//!
//! # Example
//!
//! ```no_run
//! use vocalog::ai::{ChatClient, Summarizer};
//!
//! let client = ChatClient::new("https://api.openai.com/v1", "sk-...", "gpt-4o-mini", "whisper-1")?;
//! let summary = client.summarize("Long day. Shipped the release.")?;
//! println!("{}", summary.mood);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod client;
pub mod prompts;
pub mod summary;

pub use client::{ChatClient, Message};
pub use prompts::{digest_prompt, summary_prompt, SYSTEM_PROMPT};
pub use summary::parse_summary;

use crate::errors::AppResult;
use crate::journal::{AudioClip, EntrySummary, JournalEntry};

/// Produces structured summaries and narrative digests.
pub trait Summarizer {
    /// Summarizes one entry's text.
    fn summarize(&self, text: &str) -> AppResult<EntrySummary>;

    /// Writes a narrative digest over several entries.
    fn compile_digest(&self, entries: &[JournalEntry]) -> AppResult<String>;
}

/// Turns a voice recording into text.
pub trait Transcriber {
    fn transcribe(&self, clip: &AudioClip) -> AppResult<String>;
}

impl Summarizer for ChatClient {
    fn summarize(&self, text: &str) -> AppResult<EntrySummary> {
        let completion = self.chat(&summary_prompt(text))?;
        parse_summary(&completion)
    }

    fn compile_digest(&self, entries: &[JournalEntry]) -> AppResult<String> {
        let completion = self.chat(&digest_prompt(entries))?;
        Ok(completion.trim().to_string())
    }
}

impl Transcriber for ChatClient {
    fn transcribe(&self, clip: &AudioClip) -> AppResult<String> {
        ChatClient::transcribe(self, clip)
    }
}
