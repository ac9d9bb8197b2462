use assert_cmd::Command;
use predicates::prelude::*;

fn fetcher() -> Command {
    let mut cmd = Command::cargo_bin("transcript-fetcher").unwrap();
    // Keep the user's own config out of the way
    cmd.env_remove("TRANSCRIPT_FETCHER_CONFIG")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("transcript-fetcher-tests"))
        .current_dir(std::env::temp_dir());
    cmd
}

#[test]
fn test_help_exits_zero() {
    fetcher()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--list-only"))
        .stdout(predicate::str::contains("--languages"));
}

#[test]
fn test_missing_video_id_exits_one() {
    fetcher()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("VIDEO_ID_OR_URL"));
}

#[test]
fn test_unknown_format_exits_one() {
    fetcher()
        .args(["dQw4w9WgXcQ", "--format", "xml"])
        .assert()
        .code(1);
}

#[test]
fn test_invalid_video_id_envelope() {
    let output = fetcher()
        .args(["https://vimeo.com/12345", "-q"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["success"], false);
    assert_eq!(response["error_type"], "invalid_video_id");
    assert!(response.get("transcript").is_none());
}

#[test]
fn test_invalid_video_id_text_format() {
    fetcher()
        .args(["not a video", "--format", "text", "-q"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Error: Not a valid YouTube video id"));
}

#[test]
fn test_bad_config_file_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "http:\n  timeout_secs: 0\n").unwrap();

    fetcher()
        .args(["dQw4w9WgXcQ", "-q", "--config"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("timeout"));
}

#[test]
fn test_unbuildable_http_client_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "http:\n  user_agent: \"bad\\nagent\"\n").unwrap();

    let output = fetcher()
        .args(["dQw4w9WgXcQ", "-q", "--config"])
        .arg(&path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["success"], false);
    assert_eq!(response["error_type"], "dependency_missing");
    assert_eq!(response["video_id"], "dQw4w9WgXcQ");
}

#[test]
fn test_bad_accept_language_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "http:\n  accept_language: \"en\\nX: 1\"\n").unwrap();

    fetcher()
        .args(["dQw4w9WgXcQ", "-q", "--config"])
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Accept-Language"));
}
