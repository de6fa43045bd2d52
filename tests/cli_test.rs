#![cfg(unix)]

mod common;

use common::Sandbox;
use predicates::prelude::*;

const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

#[test]
fn no_arguments_prints_usage() {
    Sandbox::new()
        .cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("encrypt"));
}

#[test]
fn help_forms_exit_zero() {
    let sb = Sandbox::new();
    for arg in ["help", "--help", "-h"] {
        sb.cmd()
            .arg(arg)
            .assert()
            .success()
            .stdout(predicate::str::contains("decrypt"))
            .stdout(predicate::str::contains("verify"));
    }
}

#[test]
fn version_exits_zero() {
    Sandbox::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("doublewrap"));
}

#[test]
fn unknown_command_prints_error_and_usage() {
    Sandbox::new()
        .cmd()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unrecognized subcommand"))
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_argument_is_a_usage_error() {
    Sandbox::new()
        .cmd()
        .args(["encrypt", "notes.txt"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn missing_engine_is_reported() {
    let sb = Sandbox::new();
    sb.write("notes.txt", b"data\n");

    sb.cmd()
        .env("DOUBLEWRAP_GPG", "/nonexistent/doublewrap/gpg")
        .args(["encrypt", "notes.txt", "alice@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OpenPGP engine not available"));

    assert!(sb.scratch_files().is_empty());
}

#[test]
fn invalid_config_is_rejected() {
    let sb = Sandbox::new();
    let config = sb.dir.path().join("bad.toml");
    std::fs::write(&config, "[cleanup]\nwipe_passes = 0\n").unwrap();

    sb.cmd()
        .arg("--config")
        .arg(&config)
        .args(["verify", "anything.asymmetric.gpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn checksum_prints_digest() {
    let sb = Sandbox::new();
    sb.write("hello.txt", b"hello world");

    sb.cmd()
        .args(["checksum", "hello.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{HELLO_SHA256}  hello.txt")));
}

#[test]
fn checksum_mismatch_fails() {
    let sb = Sandbox::new();
    sb.write("hello.txt", b"hello world");

    sb.cmd()
        .args(["checksum", "hello.txt", "--expected", &"0".repeat(64)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Checksum mismatch"));
}

#[test]
fn checksum_from_sums_file() {
    let sb = Sandbox::new();
    sb.write("hello.txt", b"hello world");
    sb.write("SHA256SUMS", format!("{HELLO_SHA256} *hello.txt\n").as_bytes());

    sb.cmd()
        .args(["checksum", "hello.txt", "--sums", "SHA256SUMS"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checksum matches"));

    sb.write("OTHER", b"abc  other.txt\n");
    sb.cmd()
        .args(["checksum", "hello.txt", "--sums", "OTHER"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in checksum list"));
}

#[test]
fn log_rejects_bad_date() {
    Sandbox::new()
        .cmd()
        .args(["log", "--since", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date format"));
}

#[test]
fn log_without_history_warns() {
    Sandbox::new()
        .cmd()
        .arg("log")
        .assert()
        .success()
        .stderr(predicate::str::contains("No audit entries found"));
}

#[test]
fn quiet_mode_suppresses_progress() {
    let sb = Sandbox::new();
    sb.write("notes.txt", b"data\n");

    sb.cmd()
        .args(["-q", "encrypt", "notes.txt", "alice@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
