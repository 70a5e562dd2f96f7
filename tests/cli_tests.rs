//! Integration tests for the compact-guard CLI
//!
//! These tests run the compact-guard binary against isolated state and
//! config directories.

mod support;

use predicates::prelude::*;
use std::fs;
use support::{compact_guard, TestEnv};

// ============================================================================
// Help and version
// ============================================================================

#[test]
fn test_help_flag() {
    compact_guard()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: compact-guard"))
        .stdout(predicate::str::contains("hook"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_version_flag() {
    compact_guard()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("compact-guard"));
}

#[test]
fn test_no_subcommand_prints_banner() {
    compact_guard()
        .assert()
        .success()
        .stdout(predicate::str::contains("compact-guard --help"));
}

// ============================================================================
// Exit codes
// ============================================================================

#[test]
fn test_unknown_format_is_usage_error() {
    compact_guard()
        .args(["--format", "yaml", "key", "/x"])
        .assert()
        .code(2);
}

#[test]
fn test_usage_error_json_envelope() {
    compact_guard()
        .args(["--format", "json", "key"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\":\"usage_error\""));
}

#[test]
fn test_invalid_timeout_env_is_usage_error() {
    let env = TestEnv::new();
    env.cmd()
        .env("COMPACT_GUARD_TIMEOUT_SECS", "soon")
        .args(["status", "--cwd", &env.cwd()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("COMPACT_GUARD_TIMEOUT_SECS"));
}

#[test]
fn test_malformed_config_file_fails() {
    let env = TestEnv::new();
    env.write_config("[extractor\ncommand = ");
    env.cmd()
        .args(["status", "--cwd", &env.cwd()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("TOML"));
}

// ============================================================================
// key
// ============================================================================

#[test]
fn test_key_is_stable_and_short() {
    compact_guard()
        .args(["key", "/"])
        .assert()
        .success()
        .stdout("8a5edab282632443\n");
}

#[test]
fn test_key_differs_between_paths() {
    let a = compact_guard().args(["key", "/work/a"]).output().unwrap();
    let b = compact_guard().args(["key", "/work/b"]).output().unwrap();
    assert_ne!(a.stdout, b.stdout);
    assert_eq!(String::from_utf8_lossy(&a.stdout).trim().len(), 16);
}

#[test]
fn test_key_json() {
    compact_guard()
        .args(["key", "/", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key\": \"8a5edab282632443\""))
        .stdout(predicate::str::contains("\"path\": \"/\""));
}

// ============================================================================
// status
// ============================================================================

#[test]
fn test_status_empty_project() {
    let env = TestEnv::new();
    env.cmd()
        .args(["status", "--cwd", &env.cwd()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("project: {}", env.cwd())))
        .stdout(predicate::str::contains("(missing)"))
        .stdout(predicate::str::contains("directory does not exist"));
}

#[test]
fn test_status_json_reports_local_dir() {
    let env = TestEnv::new();
    fs::create_dir(env.project().join(".claude")).unwrap();

    let output = env
        .cmd()
        .args(["status", "--cwd", &env.cwd(), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["project"], env.cwd());
    assert_eq!(json["global"]["exists"], false);
    assert_eq!(json["local"]["dir_exists"], true);
    assert_eq!(json["local"]["exists"], false);
    assert_eq!(json["key"].as_str().unwrap().len(), 16);
}

// ============================================================================
// show
// ============================================================================

#[test]
fn test_show_without_summary_is_data_error() {
    let env = TestEnv::new();
    env.cmd()
        .args(["show", "--cwd", &env.cwd()])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no stored decisions"));
}

#[test]
fn test_show_json_error_envelope() {
    let env = TestEnv::new();
    env.cmd()
        .args(["show", "--cwd", &env.cwd(), "--format", "json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"type\":\"no_store_found\""));
}

#[test]
fn test_show_corrupt_entry_is_data_error() {
    let env = TestEnv::new();
    fs::write(env.global_file(), "not a decisions file").unwrap();
    env.cmd()
        .args(["show", "--cwd", &env.cwd()])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid decisions file"));
}

// ============================================================================
// extract (manual trigger)
// ============================================================================

#[test]
fn test_extract_missing_transcript_is_data_error() {
    let env = TestEnv::new();
    env.cmd()
        .args(["extract", "--cwd", &env.cwd(), "--transcript"])
        .arg(env.root.path().join("absent.jsonl"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("transcript not found"));
}

#[cfg(unix)]
#[test]
fn test_extract_prints_and_persists_summary() {
    let env = TestEnv::new();
    let transcript = env.scenario_transcript();

    env.cmd_with_summary()
        .args(["extract", "--cwd", &env.cwd(), "--session", "manual-1", "--transcript"])
        .arg(&transcript)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("## CURRENT APPROACH"))
        .stdout(predicate::str::contains("- [REJECTED] Approach X: requires network access"))
        .stdout(predicate::str::contains("1. Store data in a single file: simplest to back up"))
        .stderr(predicate::str::contains("[compact-guard] saved decisions"));

    let stored = fs::read_to_string(env.global_file()).unwrap();
    assert!(stored.contains("session: manual-1"));
    assert!(stored.contains("trigger: manual"));
    assert!(stored.contains("structured: true"));

    env.cmd()
        .args(["show", "--cwd", &env.cwd()])
        .assert()
        .success()
        .stdout(stored)
        .stderr(predicate::str::contains("global tier"));
}

#[cfg(unix)]
#[test]
fn test_extract_json_output() {
    let env = TestEnv::new();
    let transcript = env.scenario_transcript();

    let output = env
        .cmd_with_summary()
        .args(["extract", "--format", "json", "--cwd", &env.cwd(), "--transcript"])
        .arg(&transcript)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["structured"], true);
    assert_eq!(json["local"], serde_json::Value::Null);
    assert_eq!(json["summary"]["rejected_approaches"][0]["approach"], "Approach X");
    assert_eq!(json["summary"]["hard_constraints"][0], "Must run offline");
}

#[cfg(unix)]
#[test]
fn test_extract_discovers_latest_transcript() {
    let env = TestEnv::new();
    let projects = env.root.path().join("projects");
    let dir_name: String = env
        .cwd()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    env.write_transcript(&projects.join(dir_name), &["Going with approach Y."]);
    env.write_config(&format!(
        "[transcript]\nprojects_dir = {:?}\n",
        projects.to_string_lossy()
    ));

    env.cmd_with_summary()
        .args(["extract", "--cwd", &env.cwd()])
        .assert()
        .success();
    assert!(env.global_file().is_file());
}

#[cfg(unix)]
#[test]
fn test_extract_failure_reports_error() {
    let env = TestEnv::new();
    let transcript = env.scenario_transcript();

    env.cmd_with_extractor("echo 'rate limited' >&2; exit 1")
        .args(["extract", "--cwd", &env.cwd(), "--transcript"])
        .arg(&transcript)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("rate limited"));
    assert!(!env.global_file().exists());
}

#[cfg(unix)]
#[test]
fn test_extract_unstructured_response_is_kept() {
    let env = TestEnv::new();
    let transcript = env.scenario_transcript();

    env.cmd_with_extractor("cat >/dev/null; echo 'Y was chosen over X.'")
        .args(["extract", "--cwd", &env.cwd(), "--transcript"])
        .arg(&transcript)
        .assert()
        .success()
        .stdout(predicate::str::contains("## CURRENT STATE\n\nY was chosen over X."))
        .stderr(predicate::str::contains("stored verbatim"));

    let stored = fs::read_to_string(env.global_file()).unwrap();
    assert!(stored.contains("structured: false"));
}
