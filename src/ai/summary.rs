//! Lenient parsing of structured summaries returned by the chat model.
//!
//! Models wrap JSON in prose or code fences and drop or mistype keys. The
//! parser takes the outermost `{...}` span, and any field that is missing
//! or has the wrong shape falls back to its neutral default.

use crate::constants::DEFAULT_MOOD;
use crate::errors::{AIError, AppResult};
use crate::journal::EntrySummary;
use serde_json::{Map, Value};

/// Reads an [`EntrySummary`] out of a chat completion.
///
/// # Errors
///
/// Returns `AIError::InvalidResponse` only when the completion contains no
/// parsable JSON object.
pub fn parse_summary(raw: &str) -> AppResult<EntrySummary> {
    let object = extract_object(raw)?;

    Ok(EntrySummary {
        highlights: string_list(&object, "highlights"),
        decisions: string_list(&object, "decisions"),
        actions: string_list(&object, "actions"),
        risks: string_list(&object, "risks"),
        mood: object
            .get("mood")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|mood| !mood.is_empty())
            .unwrap_or(DEFAULT_MOOD)
            .to_string(),
    })
}

fn extract_object(raw: &str) -> AppResult<Map<String, Value>> {
    let span = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => {
            return Err(
                AIError::InvalidResponse("Summary response contains no JSON object".into()).into(),
            )
        }
    };

    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(AIError::InvalidResponse("Summary response is not a JSON object".into()).into()),
        Err(e) => Err(AIError::InvalidResponse(format!("Summary response is not valid JSON: {}", e)).into()),
    }
}

fn string_list(object: &Map<String, Value>, key: &str) -> Vec<String> {
    let items: Vec<&Value> = match object.get(key) {
        Some(Value::Array(items)) => items.iter().collect(),
        // A lone string is treated as a one-item list
        Some(value @ Value::String(_)) => vec![value],
        _ => return Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}
