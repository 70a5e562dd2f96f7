//! Two-tier decisions store
//!
//! Every successful extraction is written to the global tier
//! (`<state_dir>/<project-key>.md`). It is also written to the local tier
//! (`<cwd>/.claude/design-decisions.md`) when the project's `.claude/`
//! directory already exists; the store never creates it. Reads prefer the
//! local tier. Entries are only ever replaced whole, never merged or deleted.

pub mod entry;
pub mod io;
pub mod paths;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::StoreConfig;
use crate::error::{GuardError, Result};
use crate::map_write_err;
pub use entry::{EntryMeta, StoredDecisions};
pub use paths::{ProjectPaths, Tier};

/// A stored entry together with where it was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntry {
    pub tier: Tier,
    pub path: PathBuf,
    pub entry: StoredDecisions,
}

/// Outcome of a read: the winning entry, plus tiers that existed but could
/// not be used
#[derive(Debug, Default)]
pub struct Lookup {
    pub resolved: Option<ResolvedEntry>,
    pub skipped: Vec<(Tier, GuardError)>,
}

/// Files touched by a write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    pub global: PathBuf,
    pub local: Option<PathBuf>,
}

/// Existence of each tier for a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub key: String,
    pub global_file: PathBuf,
    pub global_exists: bool,
    pub local_dir: PathBuf,
    pub local_dir_exists: bool,
    pub local_file: PathBuf,
    pub local_exists: bool,
}

#[derive(Debug, Clone)]
pub struct DecisionStore {
    state_dir: PathBuf,
    local_dir: String,
    local_file: String,
}

impl DecisionStore {
    pub fn new(
        state_dir: impl Into<PathBuf>,
        local_dir: impl Into<String>,
        local_file: impl Into<String>,
    ) -> Self {
        Self {
            state_dir: state_dir.into(),
            local_dir: local_dir.into(),
            local_file: local_file.into(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self::new(
            config.state_dir()?,
            config.local_dir.clone(),
            config.local_file.clone(),
        ))
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn paths(&self, cwd: &str) -> ProjectPaths {
        ProjectPaths::new(&self.state_dir, cwd, &self.local_dir, &self.local_file)
    }

    /// Persist an entry for its project, replacing any previous one
    #[tracing::instrument(skip(self, entry), fields(project = %entry.meta.project))]
    pub fn write(&self, entry: &StoredDecisions) -> Result<WriteReport> {
        let paths = self.paths(&entry.meta.project);
        let markdown = entry.to_markdown()?;

        fs::create_dir_all(&self.state_dir).map_err(|e| map_write_err!(&self.state_dir, e))?;
        io::write_atomic(&paths.global_file, &markdown)?;

        let local = if paths.local_dir.is_dir() {
            io::write_atomic(&paths.local_file, &markdown)?;
            Some(paths.local_file)
        } else {
            tracing::debug!(dir = %paths.local_dir.display(), "no local state directory");
            None
        };

        Ok(WriteReport {
            global: paths.global_file,
            local,
        })
    }

    /// Resolve the entry for a project: local tier first, then global
    #[tracing::instrument(skip(self))]
    pub fn read(&self, cwd: &str) -> Lookup {
        let paths = self.paths(cwd);
        let mut lookup = Lookup::default();

        for (tier, path) in paths.read_order() {
            if !path.is_file() {
                continue;
            }
            let parsed = fs::read_to_string(path)
                .map_err(GuardError::from)
                .and_then(|content| StoredDecisions::from_markdown(&content, path));
            match parsed {
                Ok(entry) => {
                    lookup.resolved = Some(ResolvedEntry {
                        tier,
                        path: path.to_path_buf(),
                        entry,
                    });
                    break;
                }
                Err(err) => {
                    tracing::warn!(%tier, error = %err, "skipping unreadable tier");
                    lookup.skipped.push((tier, err));
                }
            }
        }

        lookup
    }

    /// Like `read`, but a missing summary is an error
    pub fn require(&self, cwd: &str) -> Result<ResolvedEntry> {
        let lookup = self.read(cwd);
        if let Some(resolved) = lookup.resolved {
            return Ok(resolved);
        }
        match lookup.skipped.into_iter().next() {
            Some((_, err)) => Err(err),
            None => Err(GuardError::NoStoreFound {
                project: cwd.to_string(),
            }),
        }
    }

    pub fn status(&self, cwd: &str) -> StoreStatus {
        let paths = self.paths(cwd);
        StoreStatus {
            key: paths.key.to_string(),
            global_exists: paths.global_file.is_file(),
            local_dir_exists: paths.local_dir.is_dir(),
            local_exists: paths.local_file.is_file(),
            global_file: paths.global_file,
            local_dir: paths.local_dir,
            local_file: paths.local_file,
        }
    }
}
