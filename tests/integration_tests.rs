use std::fs;
use std::path::Path;
use std::process::{Command as StdCommand, Output};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Test utilities for the framecat binary
mod test_utils {
    use super::*;

    /// The binary, run inside `dir` with no ambient configuration
    pub fn framecat_cmd(dir: &Path) -> Command {
        let mut cmd = Command::cargo_bin("framecat").unwrap();
        cmd.current_dir(dir)
            .env_remove("FRAMECAT_CONFIG")
            .env_remove("FRAMECAT_LOG_LEVEL")
            .env_remove("FRAMECAT_LOG_FORMAT")
            .env_remove("FRAMECAT_OVERWRITE")
            .env_remove("FRAMECAT_MAX_LINE_LENGTH")
            .env_remove("FRAMECAT_TRACKS")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn framecat(dir: &Path, args: &[&str]) -> Output {
        framecat_cmd(dir).args(args).output().unwrap()
    }

    pub fn stdout(output: &Output) -> String {
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    pub fn stderr(output: &Output) -> String {
        String::from_utf8_lossy(&output.stderr).into_owned()
    }

    pub fn ffmpeg_available() -> bool {
        StdCommand::new("ffmpeg")
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Create a test clip with one video and one audio track using FFmpeg
    pub fn create_test_video(output_path: &Path, duration: f64) -> bool {
        let duration = duration.to_string();
        let status = StdCommand::new("ffmpeg")
            .args([
                "-f",
                "lavfi",
                "-i",
                "testsrc=size=320x240:rate=30",
                "-f",
                "lavfi",
                "-i",
                "sine=frequency=1000:sample_rate=48000",
                "-c:v",
                "mpeg4",
                "-bf",
                "0",
                "-c:a",
                "aac",
                "-t",
                &duration,
                "-y",
            ])
            .arg(output_path)
            .output();

        matches!(status, Ok(o) if o.status.success())
    }
}

use test_utils::*;

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    framecat_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("concat").and(predicate::str::contains("list")));
}

#[test]
fn test_missing_list_exits_with_status_one() {
    let dir = TempDir::new().unwrap();
    framecat_cmd(dir.path())
        .args(["concat", "missing.txt", "out.mp4"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Concatenation complete").not())
        .stderr(predicate::str::contains("Could not open input file list"));

    assert!(!dir.path().join("out.mp4").exists());
}

#[test]
fn test_missing_input_exits_with_status_one() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("list.txt"), "does-not-exist.mp4\n").unwrap();

    framecat_cmd(dir.path())
        .args(["concat", "list.txt", "out.mp4"])
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("Could not open input file")
                .and(predicate::str::contains("does-not-exist.mp4")),
        );
}

#[test]
fn test_existing_output_refused() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("list.txt"), "a.mp4\n").unwrap();
    fs::write(dir.path().join("out.mp4"), b"keep me").unwrap();

    framecat_cmd(dir.path())
        .args(["concat", "list.txt", "out.mp4", "--overwrite", "never"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("overwrite is disabled"));

    assert_eq!(fs::read(dir.path().join("out.mp4")).unwrap(), b"keep me");
}

#[test]
fn test_invalid_option_values_rejected() {
    let dir = TempDir::new().unwrap();

    framecat_cmd(dir.path())
        .args(["--log-format", "xml", "list", "."])
        .assert()
        .failure();

    framecat_cmd(dir.path())
        .args(["concat", "l.txt", "o.mp4", "--tracks", "video,bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown track kind"));
}

#[test]
fn test_config_file_is_validated() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("framecat.toml"), "[list]\nmax_line_length = 1\n").unwrap();

    framecat_cmd(dir.path())
        .args(["list", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_environment_overrides_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("framecat.toml"), "[output]\noverwrite = \"always\"\n").unwrap();
    fs::write(dir.path().join("list.txt"), "a.mp4\n").unwrap();
    fs::write(dir.path().join("out.mp4"), b"keep me").unwrap();

    framecat_cmd(dir.path())
        .env("FRAMECAT_OVERWRITE", "never")
        .args(["concat", "list.txt", "out.mp4"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("overwrite is disabled"));
}

#[test]
fn test_command_line_overrides_invalid_environment() {
    let dir = TempDir::new().unwrap();

    framecat_cmd(dir.path())
        .env("FRAMECAT_MAX_LINE_LENGTH", "1")
        .args(["concat", "missing.txt", "out.mp4", "--max-line-length", "256"])
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("Could not open input file list")
                .and(predicate::str::contains("Configuration error").not()),
        );

    framecat_cmd(dir.path())
        .env("FRAMECAT_MAX_LINE_LENGTH", "1")
        .args(["concat", "missing.txt", "out.mp4"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("max_line_length"));
}

#[test]
fn test_list_command_sorts_naturally() {
    let dir = TempDir::new().unwrap();
    let segments = dir.path().join("segments");
    fs::create_dir(&segments).unwrap();
    for name in ["clip10.ts", "clip2.ts", "clip1.ts", "notes.txt"] {
        fs::write(segments.join(name), b"").unwrap();
    }

    let output = framecat(dir.path(), &["list", "segments", "--ext", "ts"]);

    assert!(output.status.success());
    let names: Vec<String> = stdout(&output)
        .lines()
        .map(|line| {
            Path::new(line)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    assert_eq!(names, vec!["clip1.ts", "clip2.ts", "clip10.ts"]);
}

#[test]
fn test_list_command_writes_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.mp4"), b"").unwrap();
    fs::write(dir.path().join("b.MP4"), b"").unwrap();

    let output = framecat(dir.path(), &["list", ".", "-o", "list.txt"]);

    assert!(output.status.success());
    let content = fs::read_to_string(dir.path().join("list.txt")).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.ends_with('\n'));
}

#[test]
fn test_concatenate_real_clips() {
    if !ffmpeg_available() {
        println!("Skipping real media test - ffmpeg not found");
        return;
    }

    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.mp4");
    let second = dir.path().join("second.mp4");
    if !create_test_video(&first, 2.0) || !create_test_video(&second, 1.0) {
        println!("Skipping real media test - could not create clips");
        return;
    }
    fs::write(dir.path().join("list.txt"), "first.mp4\nsecond.mp4\n").unwrap();

    let output = framecat(dir.path(), &["concat", "list.txt", "joined.mp4", "--json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["files_processed"], 2);
    assert!(stderr(&output).contains("Concatenation complete. Output saved to joined.mp4"));

    let tracks = report["tracks"].as_array().unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0]["kind"], "video");
    assert_eq!(tracks[1]["kind"], "audio");
    assert_eq!(tracks[0]["packets_written"], 90);

    let video_seconds = tracks[0]["duration_seconds"].as_f64().unwrap();
    assert!((video_seconds - 3.0).abs() < 0.1, "video duration {}", video_seconds);

    let joined = dir.path().join("joined.mp4");
    assert!(fs::metadata(&joined).unwrap().len() > 1000);
}

#[test]
fn test_success_line() {
    let dir = TempDir::new().unwrap();
    if !ffmpeg_available() {
        println!("Skipping real media test - ffmpeg not found");
        return;
    }
    let clip = dir.path().join("clip.mp4");
    if !create_test_video(&clip, 1.0) {
        println!("Skipping real media test - could not create clip");
        return;
    }
    fs::write(dir.path().join("list.txt"), "clip.mp4\n").unwrap();

    let output = framecat(dir.path(), &["concat", "list.txt", "out.mkv"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output).trim_end(),
        "Concatenation complete. Output saved to out.mkv"
    );
}
