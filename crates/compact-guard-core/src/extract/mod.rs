//! Decision extraction
//!
//! Sends the bounded conversation to a summarization backend and turns the
//! response into a `DecisionSummary`. The response is untrusted: it is only
//! stored as structured data if all six sections are present. Otherwise the
//! whole response is kept verbatim under `current_state`.

pub mod backend;
pub mod prompt;

use std::time::Duration;

use crate::error::{GuardError, Result};
use crate::summary::{parse_sections, DecisionSummary};
use crate::transcript::{render_conversation, Turn};

pub use backend::{CommandBackend, SummaryBackend};
pub use prompt::{build_prompt, PROMPT_VERSION};

/// Result of one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub summary: DecisionSummary,
    /// Whether the response passed strict section validation
    pub structured: bool,
}

pub struct DecisionExtractor {
    backend: Box<dyn SummaryBackend>,
    timeout: Duration,
}

impl DecisionExtractor {
    pub fn new(backend: Box<dyn SummaryBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Extract a summary from conversation turns
    #[tracing::instrument(skip(self, turns), fields(turns = turns.len(), backend = self.backend.name()))]
    pub fn extract(&self, turns: &[Turn], cwd: &str) -> Result<Extraction> {
        if turns.is_empty() {
            return Err(GuardError::extraction("no conversation turns to summarize"));
        }

        let prompt = build_prompt(&render_conversation(turns), cwd);
        let response = self.backend.summarize(&prompt, self.timeout)?;
        interpret(&response)
    }
}

/// Validate a backend response, falling back to verbatim storage
pub fn interpret(response: &str) -> Result<Extraction> {
    let normalized = response.replace("\r\n", "\n");
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return Err(GuardError::extraction("empty response"));
    }

    match parse_sections(normalized) {
        Ok(summary) => Ok(Extraction {
            summary,
            structured: true,
        }),
        Err(err) => {
            tracing::warn!(error = %err, "response failed validation, keeping it verbatim");
            Ok(Extraction {
                summary: DecisionSummary::raw(normalized),
                structured: false,
            })
        }
    }
}
