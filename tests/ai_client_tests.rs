//! Integration tests for the AI client against a mock chat-completion API.

use mockito::Matcher;
use vocalog::ai::{ChatClient, Message, Summarizer, Transcriber};
use vocalog::errors::{AIError, AppError};
use vocalog::journal::{AudioClip, EntryDraft, JournalEntry};

fn client_for(server: &mockito::Server) -> ChatClient {
    ChatClient::new(server.url(), "test-key", "test-chat", "test-whisper").unwrap()
}

fn completion(content: &str) -> String {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
    .to_string()
}

#[test]
fn test_chat_sends_model_messages_and_bearer() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(serde_json::json!({ "model": "test-chat" })),
            Matcher::Regex(r#""role":"user","content":"ping""#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion("pong"))
        .create();

    let reply = client_for(&server).chat(&[Message::user("ping")]).unwrap();
    assert_eq!(reply, "pong");
    mock.assert();
}

#[test]
fn test_summarize_parses_structured_reply() {
    let mut server = mockito::Server::new();
    let reply = "```json\n{\"highlights\": [\"Shipped\"], \"actions\": \"Rest\", \"mood\": \"proud\"}\n```";
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(reply))
        .create();

    let summary = client_for(&server).summarize("Shipped the release.").unwrap();
    assert_eq!(summary.highlights, vec!["Shipped"]);
    assert_eq!(summary.actions, vec!["Rest"]);
    assert!(summary.decisions.is_empty());
    assert!(summary.risks.is_empty());
    assert_eq!(summary.mood, "proud");
    mock.assert();
}

#[test]
fn test_digest_returns_trimmed_text() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("Walked by the sea".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion("\n  A calm week.  \n"))
        .create();

    let entry = JournalEntry::create(
        EntryDraft {
            content: "Walked by the sea.".to_string(),
            ..EntryDraft::default()
        },
        chrono::Utc::now(),
    )
    .unwrap();
    let digest = client_for(&server).compile_digest(&[entry]).unwrap();
    assert_eq!(digest, "A calm week.");
    mock.assert();
}

#[test]
fn test_unauthorized_key() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": {"message": "Incorrect API key"}}"#)
        .create();

    let result = client_for(&server).chat(&[Message::user("hi")]);
    match result {
        Err(AppError::AI(AIError::Unauthorized(401))) => {}
        other => panic!("Expected Unauthorized error, got {:?}", other),
    }
}

#[test]
fn test_server_error_is_surfaced_without_retry() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("overloaded")
        .expect(1)
        .create();

    let result = client_for(&server).chat(&[Message::user("hi")]);
    match result {
        Err(AppError::AI(AIError::InvalidResponse(message))) => {
            assert!(message.contains("500"));
            assert!(message.contains("overloaded"));
        }
        other => panic!("Expected InvalidResponse error, got {:?}", other),
    }
    mock.assert();
}

#[test]
fn test_summary_without_json_is_invalid_response() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion("Sorry, I cannot help with that."))
        .create();

    assert!(matches!(
        client_for(&server).summarize("text"),
        Err(AppError::AI(AIError::InvalidResponse(_)))
    ));
}

#[test]
fn test_transcription_uploads_multipart() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/audio/transcriptions")
        .match_header("authorization", "Bearer test-key")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("test-whisper".to_string()),
            Matcher::Regex("recording.webm".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"text": "hello from the car"}"#)
        .create();

    let clip = AudioClip::new("audio/webm", b"fake audio bytes".to_vec());
    let transcript = Transcriber::transcribe(&client_for(&server), &clip).unwrap();
    assert_eq!(transcript, "hello from the car");
    mock.assert();
}

#[test]
fn test_unreachable_service() {
    // Nothing listens on the discard port
    let client = ChatClient::new("http://127.0.0.1:9", "k", "m", "t").unwrap();
    assert!(matches!(
        client.chat(&[Message::user("hi")]),
        Err(AppError::AI(AIError::Unreachable(_)))
    ));
}
