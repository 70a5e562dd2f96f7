//! Host lifecycle handlers
//!
//! The host runs one short-lived process per event and passes a JSON payload
//! on stdin:
//!
//! - pre-compaction: `{"session_id", "transcript_path", "cwd", "trigger"}`
//! - session start: `{"session_id", "cwd", "source"}`
//!
//! Unknown fields are ignored and every field is optional. Neither handler
//! returns an error: failures become diagnostics and the event is a no-op.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Deserialize;

use crate::config::GuardConfig;
use crate::error::{GuardError, Result};
use crate::extract::{CommandBackend, DecisionExtractor};
use crate::inject::{diagnostic, format_injection, Injection};
use crate::store::{DecisionStore, EntryMeta, StoredDecisions, WriteReport};
use crate::trace_time;
use crate::transcript::{discover_latest, TranscriptReader};

/// Set to skip both hooks entirely
pub const SKIP_ENV_VAR: &str = "COMPACT_GUARD_SKIP";
/// Set by the host for nested sessions that must not run hooks
pub const HOST_SKIP_ENV_VAR: &str = "CLAUDE_SKIP_HOOKS";
/// Session-start source reported right after a compaction
pub const COMPACT_SOURCE: &str = "compact";

/// Event payload supplied by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HookPayload {
    pub session_id: Option<String>,
    pub transcript_path: Option<PathBuf>,
    pub cwd: Option<String>,
    pub hook_event_name: Option<String>,
    /// Compaction trigger: `auto` or `manual`
    pub trigger: Option<String>,
    /// Session-start source: `startup`, `resume`, `clear` or `compact`
    pub source: Option<String>,
}

impl HookPayload {
    /// Parse a payload, treating malformed input as an empty payload
    pub fn parse(input: &str) -> Self {
        if input.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(input).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring malformed hook payload");
            Self::default()
        })
    }

    pub fn from_reader(mut reader: impl Read) -> Self {
        let mut input = String::new();
        if let Err(e) = reader.read_to_string(&mut input) {
            tracing::warn!(error = %e, "failed to read hook payload");
            return Self::default();
        }
        Self::parse(&input)
    }

    /// Working directory of the session, falling back to the process's own
    pub fn cwd(&self) -> Result<String> {
        match self.cwd.as_deref().filter(|c| !c.is_empty()) {
            Some(cwd) => Ok(cwd.to_string()),
            None => Ok(std::env::current_dir()?.to_string_lossy().into_owned()),
        }
    }

    fn transcript(&self) -> Option<&Path> {
        self.transcript_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// Whether hooks are disabled for this process
pub fn hooks_disabled(lookup: impl Fn(&str) -> Option<String>) -> bool {
    [SKIP_ENV_VAR, HOST_SKIP_ENV_VAR].iter().any(|key| {
        lookup(key)
            .map(|v| {
                let v = v.trim();
                !v.is_empty() && v != "0" && !v.eq_ignore_ascii_case("false")
            })
            .unwrap_or(false)
    })
}

/// One extract-and-persist request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    pub cwd: String,
    /// Explicit transcript; the newest one for `cwd` is used when absent
    pub transcript: Option<PathBuf>,
    pub session: Option<String>,
    pub trigger: Option<String>,
}

/// A summary that was extracted and persisted
#[derive(Debug, Clone)]
pub struct Saved {
    pub transcript: PathBuf,
    pub entry: StoredDecisions,
    pub report: WriteReport,
}

/// Transcript → extraction → store
pub struct Pipeline {
    reader: TranscriptReader,
    extractor: DecisionExtractor,
    store: DecisionStore,
    projects_dir: PathBuf,
}

impl Pipeline {
    pub fn new(
        reader: TranscriptReader,
        extractor: DecisionExtractor,
        store: DecisionStore,
        projects_dir: PathBuf,
    ) -> Self {
        Self {
            reader,
            extractor,
            store,
            projects_dir,
        }
    }

    pub fn from_config(config: &GuardConfig) -> Result<Self> {
        let backend = CommandBackend::from_config(&config.extractor);
        Ok(Self::new(
            TranscriptReader::new(&config.transcript),
            DecisionExtractor::new(Box::new(backend), config.extractor.timeout()),
            DecisionStore::from_config(&config.store)?,
            config.transcript.projects_dir()?,
        ))
    }

    /// Extract and persist. Nothing is written unless every step succeeds.
    #[tracing::instrument(skip(self, request), fields(cwd = %request.cwd))]
    pub fn run(&self, request: &ExtractRequest) -> Result<Saved> {
        let start = Instant::now();

        let transcript = match &request.transcript {
            Some(path) => path.clone(),
            None => discover_latest(&self.projects_dir, &request.cwd)?,
        };
        let turns = self.reader.read(&transcript)?;
        let extraction = self.extractor.extract(&turns, &request.cwd)?;

        let meta = EntryMeta::new(request.cwd.clone())
            .with_session(request.session.clone())
            .with_trigger(request.trigger.clone());
        let entry = StoredDecisions::from_extraction(meta, extraction);
        let report = self.store.write(&entry)?;

        trace_time!(start, "pipeline", turns = turns.len());
        Ok(Saved {
            transcript,
            entry,
            report,
        })
    }

    /// Handle a pre-compaction event, returning diagnostics
    pub fn pre_compact(&self, payload: &HookPayload) -> Vec<String> {
        let request = match payload.cwd() {
            Ok(cwd) => ExtractRequest {
                cwd,
                transcript: payload.transcript().map(Path::to_path_buf),
                session: payload.session_id.clone(),
                trigger: payload.trigger.clone(),
            },
            Err(e) => return vec![diagnostic(format!("cannot determine working directory: {}", e))],
        };

        match self.run(&request) {
            Ok(saved) => saved_diagnostics(&saved),
            Err(err @ GuardError::MissingTranscript { .. }) => {
                vec![diagnostic(format!("{}; nothing to extract", err))]
            }
            Err(err) => {
                tracing::warn!(error = %err, "pre-compact extraction failed");
                vec![diagnostic(format!(
                    "{}; previous decisions left unchanged",
                    err
                ))]
            }
        }
    }
}

/// Diagnostics describing a successful save
pub fn saved_diagnostics(saved: &Saved) -> Vec<String> {
    let mut lines = vec![diagnostic(format!(
        "saved decisions for {} to global tier: {}",
        saved.entry.meta.project,
        saved.report.global.display()
    ))];
    if let Some(local) = &saved.report.local {
        lines.push(diagnostic(format!("mirrored to local tier: {}", local.display())));
    }
    if !saved.entry.meta.structured {
        lines.push(diagnostic(
            "summary did not match the expected sections; stored verbatim",
        ));
    }
    lines
}

/// Handle a session-start event. Decisions are only restored after a
/// compaction, or when the host does not say why the session started.
pub fn session_start(payload: &HookPayload, store: &DecisionStore) -> Injection {
    if let Some(source) = payload
        .source
        .as_deref()
        .filter(|s| !s.is_empty() && *s != COMPACT_SOURCE)
    {
        tracing::debug!(source, "session did not follow a compaction");
        return Injection {
            context: None,
            diagnostics: vec![diagnostic(format!(
                "skipping injection for source={}",
                source
            ))],
        };
    }

    let cwd = match payload.cwd() {
        Ok(cwd) => cwd,
        Err(e) => {
            return Injection {
                context: None,
                diagnostics: vec![diagnostic(format!(
                    "cannot determine working directory: {}",
                    e
                ))],
            }
        }
    };

    tracing::debug!(cwd = %cwd, source = ?payload.source, "session start");
    format_injection(&store.read(&cwd))
}
