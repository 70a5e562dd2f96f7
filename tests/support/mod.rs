//! Shared fixtures for CLI integration tests
//!
//! Every command runs with its config and state directories inside a
//! temporary root, and with the hook skip variables cleared.

#![allow(dead_code)]

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const RESPONSE: &str = "\
## CURRENT APPROACH
Approach Y: a local embedded index.

## REJECTED APPROACHES - DO NOT SUGGEST THESE
- [REJECTED] Approach X: requires network access

## KEY DESIGN DECISIONS
1. Store data in a single file: simplest to back up

## HARD CONSTRAINTS
- Must run offline

## EXPLICIT DO-NOTs
- Do not call remote services

## CURRENT STATE
Index schema drafted.
";

/// Get a Command for compact-guard
pub fn compact_guard() -> Command {
    cargo_bin_cmd!("compact-guard")
}

pub struct TestEnv {
    pub root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        for dir in ["config", "state", "project", "bin"] {
            fs::create_dir(root.path().join(dir)).unwrap();
        }
        Self { root }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.path().join("config")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.path().join("state")
    }

    pub fn project(&self) -> PathBuf {
        self.root.path().join("project")
    }

    pub fn cwd(&self) -> String {
        self.project().to_string_lossy().into_owned()
    }

    /// Command with isolated config and state directories
    pub fn cmd(&self) -> Command {
        let mut cmd = compact_guard();
        cmd.env("COMPACT_GUARD_CONFIG_DIR", self.config_dir())
            .env("COMPACT_GUARD_STATE_DIR", self.state_dir())
            .env_remove("COMPACT_GUARD_SKIP")
            .env_remove("CLAUDE_SKIP_HOOKS")
            .env_remove("COMPACT_GUARD_EXTRACTOR")
            .env_remove("COMPACT_GUARD_TIMEOUT_SECS")
            .env_remove("COMPACT_GUARD_LOG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Command whose extractor is a fake script with the given shell body
    #[cfg(unix)]
    pub fn cmd_with_extractor(&self, body: &str) -> Command {
        let script = self.fake_extractor(body);
        let mut cmd = self.cmd();
        cmd.env("COMPACT_GUARD_EXTRACTOR", script);
        cmd
    }

    /// Command whose extractor prints a well-formed summary
    #[cfg(unix)]
    pub fn cmd_with_summary(&self) -> Command {
        self.cmd_with_extractor(&format!("cat >/dev/null\ncat <<'EOF'\n{}EOF", RESPONSE))
    }

    #[cfg(unix)]
    pub fn fake_extractor(&self, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root.path().join("bin").join("fake-claude");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    pub fn write_config(&self, content: &str) {
        fs::write(self.config_dir().join("config.toml"), content).unwrap();
    }

    /// Write a transcript of alternating user/assistant messages
    pub fn write_transcript(&self, dir: &Path, messages: &[&str]) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join("session.jsonl");
        let lines: Vec<String> = messages
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let kind = if i % 2 == 0 { "user" } else { "assistant" };
                serde_json::json!({
                    "type": kind,
                    "message": { "role": kind, "content": text },
                })
                .to_string()
            })
            .collect();
        fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    /// Transcript for the offline-index scenario
    pub fn scenario_transcript(&self) -> PathBuf {
        self.write_transcript(
            &self.root.path().join("transcripts"),
            &[
                "We will not use approach X, we're going with approach Y.",
                "Understood, approach Y it is.",
                "Constraint: must run offline.",
            ],
        )
    }

    pub fn pre_compact_payload(&self, transcript: &Path) -> String {
        serde_json::json!({
            "session_id": "session-1",
            "transcript_path": transcript,
            "cwd": self.cwd(),
            "hook_event_name": "PreCompact",
            "trigger": "auto",
        })
        .to_string()
    }

    pub fn session_start_payload(&self) -> String {
        serde_json::json!({
            "session_id": "session-1",
            "cwd": self.cwd(),
            "hook_event_name": "SessionStart",
            "source": "compact",
        })
        .to_string()
    }

    /// Path of the global-tier file for the project
    pub fn global_file(&self) -> PathBuf {
        let output = self.cmd().args(["key", &self.cwd()]).output().unwrap();
        let key = String::from_utf8_lossy(&output.stdout).trim().to_string();
        self.state_dir().join(format!("{}.md", key))
    }

    pub fn local_file(&self) -> PathBuf {
        self.project().join(".claude").join("design-decisions.md")
    }
}
