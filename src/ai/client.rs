//! HTTP client for the chat-completion and transcription API.
//!
//! Speaks the OpenAI-compatible `/chat/completions` and
//! `/audio/transcriptions` endpoints with a bearer token. Requests are sent
//! once: there is no retry and no client-side timeout.

use crate::errors::{AIError, AppResult};
use crate::journal::AudioClip;
use reqwest::blocking::{multipart, Client, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender (system or user)
    pub role: String,
    /// The content of the message
    pub content: String,
}

impl Message {
    /// Creates a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for chat completion.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

/// Response from chat completion.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Message,
}

/// Response from transcription.
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Client for the chat-completion and transcription API.
pub struct ChatClient {
    base_url: String,
    api_key: String,
    chat_model: String,
    transcription_model: String,
    client: Client,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.base_url)
            .field("api_key", &crate::constants::REDACTED_PLACEHOLDER)
            .field("chat_model", &self.chat_model)
            .field("transcription_model", &self.transcription_model)
            .finish()
    }
}

impl ChatClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API base URL without trailing slash (e.g. "https://api.openai.com/v1")
    /// * `api_key` - Bearer credential
    /// * `chat_model` - Model used for summaries and digests
    /// * `transcription_model` - Model used for speech-to-text
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        chat_model: impl Into<String>,
        transcription_model: impl Into<String>,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(AIError::Unreachable)?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            chat_model: chat_model.into(),
            transcription_model: transcription_model.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a chat completion request and returns the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The API is not reachable
    /// - The credential is rejected
    /// - The API returns an error status or an unexpected body
    pub fn chat(&self, messages: &[Message]) -> AppResult<String> {
        debug!(
            "Sending chat request with model {} ({} messages)",
            self.chat_model,
            messages.len()
        );

        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.chat_model,
            messages,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(AIError::Unreachable)?;
        let response = check_status(response)?;

        let chat_response: ChatResponse = response.json().map_err(|e| {
            AIError::InvalidResponse(format!("Failed to parse chat response: {}", e))
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AIError::InvalidResponse("Chat response had no choices".to_string()))?;

        debug!("Received chat response ({} chars)", content.len());
        Ok(content)
    }

    /// Uploads a recording for speech-to-text and returns the transcript.
    pub fn transcribe(&self, clip: &AudioClip) -> AppResult<String> {
        debug!(
            "Sending transcription request with model {} ({} bytes)",
            self.transcription_model,
            clip.data.len()
        );

        let url = format!("{}/audio/transcriptions", self.base_url);
        let file = multipart::Part::bytes(clip.data.clone())
            .file_name(format!("recording.{}", clip.file_extension()))
            .mime_str(&clip.mime_type)
            .map_err(|e| AIError::InvalidResponse(format!("Invalid audio MIME type: {}", e)))?;
        let form = multipart::Form::new()
            .text("model", self.transcription_model.clone())
            .part("file", file);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .map_err(AIError::Unreachable)?;
        let response = check_status(response)?;

        let transcription: TranscriptionResponse = response.json().map_err(|e| {
            AIError::InvalidResponse(format!("Failed to parse transcription response: {}", e))
        })?;

        debug!("Received transcript ({} chars)", transcription.text.len());
        Ok(transcription.text)
    }
}

fn check_status(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status.as_u16() == 401 || status.as_u16() == 403 {
        return Err(AIError::Unauthorized(status.as_u16()).into());
    }

    let error_text = response.text().unwrap_or_default();
    Err(AIError::InvalidResponse(format!("HTTP {}: {}", status, error_text)).into())
}
