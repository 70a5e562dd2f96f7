//! The decision summary model
//!
//! A `DecisionSummary` always carries all six sections, possibly empty. It is
//! created by a successful extraction and replaced wholesale by the next one.

pub mod markdown;

use serde::{Deserialize, Serialize};

pub use markdown::{parse_sections, render_sections, SectionError};

/// An approach that was considered and ruled out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedApproach {
    pub approach: String,
    pub reason: String,
}

/// A concrete design decision and why it was made
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDecision {
    pub decision: String,
    pub rationale: String,
}

/// Fixed-schema record of the decisions a session has accumulated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub current_approach: String,
    pub rejected_approaches: Vec<RejectedApproach>,
    pub key_decisions: Vec<KeyDecision>,
    pub hard_constraints: Vec<String>,
    pub do_nots: Vec<String>,
    pub current_state: String,
}

impl DecisionSummary {
    /// Summary holding an unvalidated extractor response verbatim
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            current_state: text.into(),
            ..Self::default()
        }
    }
}

/// The six required sections, in their fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    CurrentApproach,
    RejectedApproaches,
    KeyDecisions,
    HardConstraints,
    DoNots,
    CurrentState,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::CurrentApproach,
        Section::RejectedApproaches,
        Section::KeyDecisions,
        Section::HardConstraints,
        Section::DoNots,
        Section::CurrentState,
    ];

    /// Heading as rendered in stored files and requested from the extractor
    pub fn heading(&self) -> &'static str {
        match self {
            Section::CurrentApproach => "CURRENT APPROACH",
            Section::RejectedApproaches => "REJECTED APPROACHES",
            Section::KeyDecisions => "KEY DESIGN DECISIONS",
            Section::HardConstraints => "HARD CONSTRAINTS",
            Section::DoNots => "EXPLICIT DO-NOTs",
            Section::CurrentState => "CURRENT STATE",
        }
    }

    /// Accepted heading spellings, uppercased with punctuation and spaces removed
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Section::CurrentApproach => &["CURRENTAPPROACH"],
            Section::RejectedApproaches => &["REJECTEDAPPROACHES"],
            Section::KeyDecisions => &["KEYDESIGNDECISIONS", "KEYDECISIONS"],
            Section::HardConstraints => &["HARDCONSTRAINTS"],
            Section::DoNots => &["EXPLICITDONOTS", "DONOTS"],
            Section::CurrentState => &["CURRENTSTATE"],
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}
