use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test utilities for running the binary in isolation
mod test_utils {
    use super::*;

    /// Binary started in an empty directory with no configuration leaking in
    pub fn skipcut(dir: &TempDir) -> Command {
        let mut cmd = Command::cargo_bin("skipcut").unwrap();
        cmd.current_dir(dir.path()).env("RUST_LOG", "warn");
        for key in [
            "SKIPCUT_CONFIG",
            "VIDEOS_FOLDER",
            "TMP_DOWNLOAD_FOLDER",
            "YOUTUBE_COOKIES_FILE_PATH",
            "COOKIES_FROM_BROWSER",
            "SUBTITLES_CHOICES",
            "SPONSORBLOCK_API",
            "ON_DOWNLOAD_START",
            "ON_DOWNLOAD_SUCCESS",
            "ON_DOWNLOAD_FAILURE",
        ] {
            cmd.env_remove(key);
        }
        cmd
    }

    pub fn write(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path.display().to_string()
    }
}

use test_utils::{skipcut, write};

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    skipcut(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("download"))
        .stdout(predicate::str::contains("segments"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("remap"));
}

#[test]
fn test_plan_adjusts_and_snaps() {
    let dir = TempDir::new().unwrap();
    let segments = write(
        &dir,
        "segments.json",
        r#"[{"start": 10, "end": 20, "category": "sponsor"}]"#,
    );
    let keyframes = write(&dir, "kf.txt", "0 5 10 15 20 25\n");

    skipcut(&dir)
        .args(["plan", "--segments-file", &segments, "--start", "0", "--end", "30"])
        .args(["--keyframes-file", &keyframes])
        .assert()
        .success()
        .stdout(predicate::str::contains("Strategy: Copy"))
        .stdout(predicate::str::contains("Final window: 0.000s → 20.000s"));
}

#[test]
fn test_plan_keeps_exact_window_when_sponsors_disabled() {
    let dir = TempDir::new().unwrap();
    let segments = write(
        &dir,
        "segments.json",
        r#"[{"start": 10, "end": 20, "category": "sponsor"}]"#,
    );

    skipcut(&dir)
        .args(["plan", "--segments-file", &segments, "-s", "0:05", "-e", "0:40"])
        .args(["--mode", "precise", "--sponsorblock", "disabled"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Strategy: Reencode"))
        .stdout(predicate::str::contains("Final window: 5.000s → 40.000s"));
}

#[test]
fn test_plan_consumed_window_fails() {
    let dir = TempDir::new().unwrap();
    let segments = write(
        &dir,
        "segments.json",
        r#"[{"start": 0, "end": 18, "category": "sponsor"},
            {"start": 15, "end": 30, "category": "selfpromo"}]"#,
    );

    skipcut(&dir)
        .args(["plan", "--segments-file", &segments, "--start", "0", "--end", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Planning failed"));
}

#[test]
fn test_plan_rejects_bad_time() {
    let dir = TempDir::new().unwrap();
    let segments = write(&dir, "segments.json", "[]");

    skipcut(&dir)
        .args(["plan", "--segments-file", &segments, "--start", "1:99", "--end", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time format"));
}

#[test]
fn test_plan_requires_one_segment_source() {
    let dir = TempDir::new().unwrap();
    skipcut(&dir)
        .args(["plan", "--start", "0", "--end", "30"])
        .assert()
        .failure();
}

#[test]
fn test_remap_json() {
    let dir = TempDir::new().unwrap();
    let segments = write(
        &dir,
        "segments.json",
        r#"[{"segment": [10.0, 20.0], "category": "sponsor"},
            {"segment": [50.0, 55.0], "category": "music_offtopic"}]"#,
    );

    let output = skipcut(&dir)
        .args(["remap", "--segments-file", &segments, "--duration", "60"])
        .args(["--start", "25", "--end", "40", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // music_offtopic is not removed under the default policy
    assert_eq!(value["kept"].as_array().unwrap().len(), 2);
    assert_eq!(value["total_kept"], json!(50.0));
    assert_eq!(value["new_start"], json!(15.0));
    assert_eq!(value["new_end"], json!(30.0));
}

#[tokio::test]
async fn test_segments_from_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/skipSegments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"segment": [0.0, 12.0], "category": "intro"},
            {"segment": [11.0, 30.0], "category": "sponsor"}
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = skipcut(&dir)
        .env("SPONSORBLOCK_API", server.uri())
        .args(["segments", "dQw4w9WgXcQ", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["segments"].as_array().unwrap().len(), 2);
    let merged = value["merged"].as_array().unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0]["end"], json!(30.0));
}

#[tokio::test]
async fn test_download_dry_run_prints_plan() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/skipSegments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"segment": [70.0, 80.0], "category": "sponsor"}
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let videos = dir.path().join("videos");
    skipcut(&dir)
        .env("SPONSORBLOCK_API", server.uri())
        .args(["--videos-folder", &videos.display().to_string()])
        .args(["download", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"])
        .args(["--start", "1:00", "--end", "1:50", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("yt-dlp"))
        .stdout(predicate::str::contains("Cut window: 60.000s → 100.000s"));

    // a dry run touches nothing on disk
    assert!(!videos.exists());
}
