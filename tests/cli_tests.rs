//! Command-line harness tests.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn globcopy() -> Command {
    Command::cargo_bin("globcopy").expect("binary should build")
}

#[test]
fn test_cli_copies_matching_files() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    fs::create_dir(src.path().join("sub")).expect("create sub");
    fs::write(src.path().join("a.bin"), b"aa").expect("write a.bin");
    fs::write(src.path().join("b.txt"), b"bb").expect("write b.txt");
    fs::write(src.path().join("sub/c.bin"), b"cc").expect("write c.bin");

    globcopy()
        .arg(src.path())
        .arg(dst.path())
        .args(["--glob", "**/*.bin", "--quiet"])
        .assert()
        .success();

    assert!(dst.path().join("a.bin").exists());
    assert!(dst.path().join("sub/c.bin").exists());
    assert!(!dst.path().join("b.txt").exists());
}

#[test]
fn test_cli_reports_missing_source() {
    let root = TempDir::new().expect("create tempdir");

    globcopy()
        .arg(root.path().join("missing"))
        .arg(root.path().join("out"))
        .arg("-q")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_requires_paths() {
    globcopy()
        .assert()
        .failure()
        .stderr(predicate::str::contains("SOURCE and DESTINATION are required"));
}

#[test]
fn test_cli_reads_config_file() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    fs::create_dir(src.path().join("deep")).expect("create deep");
    fs::write(src.path().join("x.bin"), b"x").expect("write x.bin");
    fs::write(src.path().join("deep/y.bin"), b"y").expect("write y.bin");

    let config_path = src.path().join("globcopy.toml");
    fs::write(
        &config_path,
        format!(
            "source = {:?}\ndestination = {:?}\npatterns = [\"**/*.bin\"]\n\n[options]\ndeep = 1\n",
            src.path().to_string_lossy(),
            dst.path().to_string_lossy()
        ),
    )
    .expect("write config");

    globcopy()
        .arg("--config")
        .arg(&config_path)
        .arg("-q")
        .assert()
        .success();

    assert!(dst.path().join("x.bin").exists());
    assert!(!dst.path().join("deep/y.bin").exists());
}

#[test]
fn test_cli_json_mode_succeeds() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    fs::write(src.path().join("small.txt"), b"tiny").expect("write file");

    let output = globcopy()
        .arg(src.path())
        .arg(dst.path())
        .arg("--json")
        .output()
        .expect("run globcopy");

    assert!(output.status.success());
    // Any snapshot lines that were emitted must be valid JSON
    for line in String::from_utf8_lossy(&output.stdout).lines() {
        let value: serde_json::Value = serde_json::from_str(line).expect("valid JSON line");
        assert!(value.get("percentage").is_some());
    }
    assert!(dst.path().join("small.txt").exists());
}
