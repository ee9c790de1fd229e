use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../rollcall-parser/tests/data")
        .join(name)
}

fn rollcall(workdir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rollcall"))
        .current_dir(workdir)
        .env_remove("ROLLCALL_OUTPUT_DIR")
        .env_remove("ROLLCALL_LOG_FORMAT")
        .args(args)
        .output()
        .expect("failed to launch rollcall")
}

#[test]
fn run_prints_path_of_validated_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let output = rollcall(
        dir.path(),
        &[
            "run",
            "--threshold",
            "60",
            "--output-dir",
            "results",
            fixture("header_junk.csv").to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let artifact = dir.path().join(stdout.trim());
    let contents = std::fs::read_to_string(&artifact).unwrap();
    assert_eq!(contents, "Enrollment No.,Name,Average %\nE002,Bob,55.0\n");

    let check = rollcall(
        dir.path(),
        &["validate", "--threshold", "60", artifact.to_str().unwrap()],
    );
    assert!(check.status.success());
}

#[test]
fn invalid_threshold_is_rejected_before_processing() {
    let dir = tempfile::tempdir().unwrap();
    let output = rollcall(
        dir.path(),
        &[
            "run",
            "--threshold",
            "sixty",
            fixture("header_junk.csv").to_str().unwrap(),
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid threshold value"));
    assert!(!dir.path().join("uploads").exists());
}

#[test]
fn malformed_export_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let output = rollcall(
        dir.path(),
        &[
            "run",
            "--threshold",
            "60",
            fixture("header_junk.csv").to_str().unwrap(),
            fixture("no_marker.csv").to_str().unwrap(),
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("S.No."));

    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("uploads"))
        .map(|entries| entries.collect())
        .unwrap_or_default();
    assert!(leftovers.is_empty());
}

#[test]
fn nan_threshold_is_rejected_with_reason() {
    let dir = tempfile::tempdir().unwrap();
    let output = rollcall(
        dir.path(),
        &[
            "run",
            "--threshold",
            "nan",
            fixture("header_junk.csv").to_str().unwrap(),
        ],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid threshold value 'nan'"));
    assert!(stderr.contains("other than NaN"));
    assert!(!dir.path().join("uploads").exists());
}

#[test]
fn preview_shows_averages_as_written() {
    let dir = tempfile::tempdir().unwrap();
    let output = rollcall(
        dir.path(),
        &[
            "run",
            "--threshold",
            "60",
            "--preview",
            fixture("header_junk.csv").to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("E002"));
    assert!(stdout.contains("55.0"));
    assert!(!stdout.contains("55.00"));
}
