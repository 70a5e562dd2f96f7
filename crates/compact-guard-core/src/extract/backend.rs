//! Summarization backends
//!
//! The production backend shells out to the host's own CLI in print mode.
//! The prompt goes in through stdin and output comes back through anonymous
//! temporary files, so a single thread can bound the wait with a timeout
//! without risking a full-pipe deadlock.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use wait_timeout::ChildExt;

use crate::config::ExtractorConfig;
use crate::error::{GuardError, Result};
use crate::hooks::{HOST_SKIP_ENV_VAR, SKIP_ENV_VAR};
use crate::trace_time;

/// Longest stderr excerpt carried into an error message
const STDERR_EXCERPT_CHARS: usize = 500;

/// External summarization capability
pub trait SummaryBackend {
    fn name(&self) -> &str;

    /// Run the prompt and return the raw response text
    fn summarize(&self, prompt: &str, timeout: Duration) -> Result<String>;
}

/// Runs a configured command with the prompt on stdin
#[derive(Debug, Clone)]
pub struct CommandBackend {
    command: String,
    args: Vec<String>,
}

impl CommandBackend {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }
}

fn read_back(mut file: File) -> io::Result<String> {
    file.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(STDERR_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

impl SummaryBackend for CommandBackend {
    fn name(&self) -> &str {
        &self.command
    }

    #[tracing::instrument(skip(self, prompt), fields(command = %self.command, prompt_len = prompt.len()))]
    fn summarize(&self, prompt: &str, timeout: Duration) -> Result<String> {
        let start = Instant::now();

        let mut stdin = tempfile::tempfile()?;
        stdin.write_all(prompt.as_bytes())?;
        stdin.seek(SeekFrom::Start(0))?;
        let stdout = tempfile::tempfile()?;
        let stderr = tempfile::tempfile()?;

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::from(stdout.try_clone()?))
            .stderr(Stdio::from(stderr.try_clone()?))
            .env(HOST_SKIP_ENV_VAR, "1")
            .env(SKIP_ENV_VAR, "1")
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    GuardError::extraction(format!("'{}' not found in PATH", self.command))
                }
                _ => GuardError::extraction(format!("failed to start '{}': {}", self.command, e)),
            })?;

        let status: ExitStatus = match child.wait_timeout(timeout)? {
            Some(status) => status,
            None => {
                // Reap the child so no zombie outlives the invocation.
                let _ = child.kill();
                let _ = child.wait();
                return Err(GuardError::ExtractionTimeout {
                    timeout_secs: timeout.as_secs(),
                });
            }
        };

        trace_time!(start, "summarize");

        if !status.success() {
            let stderr = read_back(stderr).unwrap_or_default();
            return Err(GuardError::extraction(format!(
                "'{}' exited with {}: {}",
                self.command,
                status,
                excerpt(&stderr)
            )));
        }

        let response = read_back(stdout)?;
        if response.trim().is_empty() {
            return Err(GuardError::extraction(format!(
                "'{}' returned an empty response",
                self.command
            )));
        }

        tracing::debug!(response_len = response.len(), "received response");
        Ok(response)
    }
}
