//! Configuration for compact-guard
//!
//! Stored as TOML in `~/.config/compact-guard/config.toml` (or the file named
//! by `--config`). A missing file yields defaults; environment variables
//! override individual values so hooks can be redirected without editing files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bail_invalid;
use crate::error::{GuardError, Result};

const CONFIG_DIR: &str = "compact-guard";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "COMPACT_GUARD_CONFIG_DIR";

pub const STATE_DIR_ENV_VAR: &str = "COMPACT_GUARD_STATE_DIR";
pub const EXTRACTOR_ENV_VAR: &str = "COMPACT_GUARD_EXTRACTOR";
pub const TIMEOUT_ENV_VAR: &str = "COMPACT_GUARD_TIMEOUT_SECS";

/// Host directory holding both the global decisions tier and transcripts
const HOST_DIR: &str = ".claude";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub extractor: ExtractorConfig,
    pub transcript: TranscriptConfig,
    pub store: StoreConfig,
}

/// External summarization command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub command: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            command: "claude".to_string(),
            args: vec![
                "-p".to_string(),
                "--output-format".to_string(),
                "text".to_string(),
            ],
            timeout_secs: 120,
        }
    }
}

impl ExtractorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Bounds applied to transcript input before extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Keep only the most recent N conversation turns
    pub max_turns: usize,
    /// Cut each turn to at most this many characters
    pub max_turn_chars: usize,
    /// Root of the host's per-project transcript directories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_dir: Option<PathBuf>,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            max_turns: 80,
            max_turn_chars: 3000,
            projects_dir: None,
        }
    }
}

impl TranscriptConfig {
    /// Resolve the transcript root, defaulting to `~/.claude/projects`
    pub fn projects_dir(&self) -> Result<PathBuf> {
        match &self.projects_dir {
            Some(dir) => expand_home(dir),
            None => Ok(home_dir()?.join(HOST_DIR).join("projects")),
        }
    }
}

/// Two-tier decisions store layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Global tier directory, defaults to `~/.claude/design-decisions`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
    /// Project-local state directory name; never created by compact-guard
    pub local_dir: String,
    /// File name inside the local state directory
    pub local_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_dir: None,
            local_dir: HOST_DIR.to_string(),
            local_file: "design-decisions.md".to_string(),
        }
    }
}

impl StoreConfig {
    /// Resolve the global tier directory
    pub fn state_dir(&self) -> Result<PathBuf> {
        match &self.state_dir {
            Some(dir) => expand_home(dir),
            None => Ok(home_dir()?.join(HOST_DIR).join("design-decisions")),
        }
    }
}

impl GuardConfig {
    fn default_config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(env_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            PathBuf::from(env_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| {
                    GuardError::Other("unable to determine config directory".to_string())
                })?
                .join(CONFIG_DIR)
        };

        Ok(config_dir.join(CONFIG_FILE))
    }

    /// Load configuration from an explicit file or the default location,
    /// then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => {
                let path = Self::default_config_path()?;
                if path.exists() {
                    Self::load_from(&path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GuardError::Other(format!(
                "failed to read config from {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: GuardConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply `COMPACT_GUARD_*` overrides from the given lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = lookup(STATE_DIR_ENV_VAR).filter(|v| !v.is_empty()) {
            self.store.state_dir = Some(PathBuf::from(dir));
        }
        if let Some(command) = lookup(EXTRACTOR_ENV_VAR).filter(|v| !v.is_empty()) {
            self.extractor.command = command;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV_VAR).filter(|v| !v.is_empty()) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.extractor.timeout_secs = secs,
                Err(_) => bail_invalid!(TIMEOUT_ENV_VAR, raw),
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.extractor.command.trim().is_empty() {
            bail_invalid!("extractor.command", "\"\"");
        }
        if self.extractor.timeout_secs == 0 {
            bail_invalid!("extractor.timeout_secs", 0);
        }
        if self.transcript.max_turns == 0 {
            bail_invalid!("transcript.max_turns", 0);
        }
        if self.transcript.max_turn_chars == 0 {
            bail_invalid!("transcript.max_turn_chars", 0);
        }
        if self.store.local_dir.is_empty() || self.store.local_file.is_empty() {
            bail_invalid!("store.local_dir/local_file", "empty path component");
        }
        Ok(())
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| GuardError::Other("unable to determine home directory".into()))
}

/// Expand a leading `~/` against the home directory
fn expand_home(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(home_dir()?.join(rest)),
        Err(_) => Ok(path.to_path_buf()),
    }
}
