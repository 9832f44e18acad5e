//! Tests for log output of the `vocalog` binary.


use tempfile::tempdir;
use test_helpers::base_vocalog_command;

#[test]
fn test_json_log_format_emits_json_lines() {
    let dir = tempdir().unwrap();
    let output = base_vocalog_command(dir.path())
        .args(["--log-format", "json", "new", "Logged entry."])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    assert!(!lines.is_empty(), "expected log output on stderr");
    for line in &lines {
        let value: serde_json::Value = serde_json::from_str(line)
            .unwrap_or_else(|e| panic!("log line is not JSON ({}): {}", e, line));
        assert!(value.get("level").is_some());
    }
    assert!(stderr.contains("Created entry"));
}

#[test]
fn test_entry_content_is_not_logged() {
    let dir = tempdir().unwrap();
    let output = base_vocalog_command(dir.path())
        .args(["-v", "new", "A very private sentence."])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("DEBUG"));
    assert!(!stderr.contains("A very private sentence."));
}

#[test]
fn test_errors_are_logged_once_and_printed() {
    let dir = tempdir().unwrap();
    let output = base_vocalog_command(dir.path())
        .args(["--log-format", "json", "show", "missing-id"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let logged_errors = stderr
        .lines()
        .filter(|line| line.contains("\"level\":\"ERROR\""))
        .count();
    assert_eq!(logged_errors, 1);
    assert!(stderr.contains("Error: Storage error: Entry not found: missing-id"));
}
