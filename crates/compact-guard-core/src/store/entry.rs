//! On-disk form of a stored decision summary
//!
//! A stored file is YAML frontmatter with provenance, a title line, then the
//! six summary sections. Serialization is deterministic: the same entry
//! always produces the same bytes.

use std::path::Path;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GuardError, Result};
use crate::extract::{Extraction, PROMPT_VERSION};
use crate::summary::{parse_sections, render_sections, DecisionSummary};

pub const TITLE: &str = "# Design Decisions & Anti-Regression Guide";

/// Provenance recorded alongside a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    /// When the summary was extracted (second precision)
    pub generated: DateTime<Utc>,
    /// Working directory the summary belongs to
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    /// Compaction trigger reported by the host (`auto` or `manual`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    /// Extraction prompt version that produced the summary
    pub schema: u32,
    /// False when the summary holds an unvalidated response verbatim
    pub structured: bool,
}

impl EntryMeta {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            generated: Utc::now().trunc_subsecs(0),
            project: project.into(),
            session: None,
            trigger: None,
            schema: PROMPT_VERSION,
            structured: true,
        }
    }

    pub fn with_session(mut self, session: Option<String>) -> Self {
        self.session = session;
        self
    }

    pub fn with_trigger(mut self, trigger: Option<String>) -> Self {
        self.trigger = trigger;
        self
    }
}

/// A decision summary with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDecisions {
    pub meta: EntryMeta,
    pub summary: DecisionSummary,
}

impl StoredDecisions {
    pub fn from_extraction(meta: EntryMeta, extraction: Extraction) -> Self {
        Self {
            meta: EntryMeta {
                structured: extraction.structured,
                ..meta
            },
            summary: extraction.summary,
        }
    }

    /// Serialize to the stored markdown form
    pub fn to_markdown(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(&self.meta)?;
        Ok(format!(
            "---\n{}\n---\n\n{}\n\n{}",
            yaml.trim_end(),
            TITLE,
            render_sections(&self.summary)
        ))
    }

    /// Parse the stored markdown form
    #[tracing::instrument(skip(content, path), fields(path = %path.display()))]
    pub fn from_markdown(content: &str, path: &Path) -> Result<Self> {
        let content = content.trim_start();

        if !content.starts_with("---") {
            return Err(GuardError::invalid_entry(
                path,
                "missing frontmatter delimiter (---)",
            ));
        }

        let after_first = &content[3..];
        let end_pos = after_first.find("\n---").ok_or_else(|| {
            GuardError::invalid_entry(path, "missing closing frontmatter delimiter (---)")
        })?;

        let yaml_content = &after_first[..end_pos];
        let body_start = 3 + end_pos + 4;
        let body = content.get(body_start..).unwrap_or_default();

        let meta: EntryMeta = serde_yaml::from_str(yaml_content)
            .map_err(|e| GuardError::invalid_entry(path, e.to_string()))?;

        let summary =
            parse_sections(body).map_err(|e| GuardError::invalid_entry(path, e.to_string()))?;

        Ok(Self { meta, summary })
    }
}
