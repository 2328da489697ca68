//! Exit code integration tests
//!
//! ## Exit Code Contract
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success: no errors (warnings allowed) |
//! | 1 | Failure: one or more errors emitted |
//!
//! - Default: data left out of the report is a warning
//! - --strict: those warnings become errors
//! - --quiet: does NOT affect exit code

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn run_check(fixture_name: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ethogram"))
        .arg("check")
        .arg(fixture(fixture_name))
        .args(args)
        .output()
        .expect("failed to execute ethogram")
}

#[test]
fn exit_0_clean_record() {
    let output = run_check("afternoon.json", &[]);
    assert_eq!(output.status.code(), Some(0));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("warning["), "clean record should not warn: {stderr}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("3 slot(s), 2 populated cell(s)"));
}

#[test]
fn exit_0_lossy_record_warns() {
    let output = run_check("lossy.json", &[]);
    assert_eq!(output.status.code(), Some(0), "warnings alone should exit 0");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning[W001]: slot '00:02'"));
    assert!(stderr.contains("warning[W002]: 1 observation(s) ignored"));
    assert!(stderr.contains("warning[W003]: behavior 'moonwalking'"));
}

#[test]
fn exit_1_lossy_record_strict() {
    let output = run_check("lossy.json", &["--strict"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[W001]"));
}

#[test]
fn quiet_does_not_change_exit_code() {
    let output = run_check("lossy.json", &["--quiet"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(!String::from_utf8_lossy(&output.stderr).contains("warning["));

    let output = run_check("lossy.json", &["--quiet", "--strict"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn flat_submission_needs_flag() {
    let output = run_check("submission.json", &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid observation record"));

    let output = run_check("submission.json", &["--flat"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn missing_input_fails() {
    let output = run_check("does-not-exist.json", &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}
