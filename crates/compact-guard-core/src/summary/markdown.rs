//! Markdown form of a decision summary
//!
//! The same parser reads extractor responses and stored files. Headings are
//! matched in their fixed order: once a section has started, only headings of
//! later sections end it. Rendered output therefore parses back to the same
//! summary, and the last section (`CURRENT STATE`) safely holds arbitrary text,
//! including a verbatim response that failed validation.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::{DecisionSummary, KeyDecision, RejectedApproach, Section};

const EMPTY_PLACEHOLDER: &str = "_None recorded._";

/// `## Heading`, `### 2. Heading`, or a line that is entirely `**Heading**`
static HEADING: OnceLock<Regex> = OnceLock::new();

/// `- item`, `* item`, `+ item`, `1. item`, `1) item`
static ITEM: OnceLock<Regex> = OnceLock::new();

fn heading_re() -> &'static Regex {
    HEADING.get_or_init(|| {
        Regex::new(r"^\s{0,3}(?:#{1,4}\s+(?:\d+[.)]\s*)?(.+?)\s*#*\s*|\*\*(.+?)\*\*:?\s*)$")
            .expect("heading pattern is valid")
    })
}

fn item_re() -> &'static Regex {
    ITEM.get_or_init(|| {
        Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+(.*)$").expect("item pattern is valid")
    })
}

/// Sections that were not found in a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionError {
    pub missing: Vec<Section>,
}

impl fmt::Display for SectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.missing.iter().map(|s| s.heading()).collect();
        write!(f, "missing sections: {}", names.join(", "))
    }
}

impl std::error::Error for SectionError {}

/// Which section, at or after `from`, a line opens
fn match_heading(line: &str, from: usize) -> Option<Section> {
    let caps = heading_re().captures(line)?;
    let title = caps.get(1).or_else(|| caps.get(2))?.as_str();
    let normalized: String = title
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect();

    Section::ALL[from..]
        .iter()
        .copied()
        .find(|section| section.aliases().iter().any(|a| normalized.starts_with(a)))
}

/// Parse all six sections from markdown. Fails if any heading is missing.
pub fn parse_sections(text: &str) -> Result<DecisionSummary, SectionError> {
    let mut bodies: [Option<Vec<&str>>; 6] = Default::default();
    let mut current: Option<usize> = None;

    for line in text.lines() {
        let from = current.map_or(0, |i| i + 1);
        if from < Section::ALL.len() {
            if let Some(section) = match_heading(line, from) {
                current = Some(section.index());
                bodies[section.index()] = Some(Vec::new());
                continue;
            }
        }
        if let Some(body) = current.and_then(|i| bodies[i].as_mut()) {
            body.push(line);
        }
    }

    let missing: Vec<Section> = Section::ALL
        .iter()
        .copied()
        .filter(|s| bodies[s.index()].is_none())
        .collect();
    if !missing.is_empty() {
        return Err(SectionError { missing });
    }

    let bodies: Vec<Vec<&str>> = bodies.into_iter().map(Option::unwrap_or_default).collect();
    let body = |section: Section| bodies[section.index()].as_slice();

    Ok(DecisionSummary {
        current_approach: parse_text(body(Section::CurrentApproach)),
        rejected_approaches: parse_items(body(Section::RejectedApproaches))
            .into_iter()
            .map(|item| {
                let item = strip_rejected_tag(&item);
                let (approach, reason) = split_pair(item);
                RejectedApproach { approach, reason }
            })
            .filter(|r| !r.approach.is_empty() || !r.reason.is_empty())
            .collect(),
        key_decisions: parse_items(body(Section::KeyDecisions))
            .into_iter()
            .map(|item| {
                let (decision, rationale) = split_pair(&item);
                KeyDecision {
                    decision,
                    rationale,
                }
            })
            .filter(|d| !d.decision.is_empty() || !d.rationale.is_empty())
            .collect(),
        hard_constraints: parse_items(body(Section::HardConstraints)),
        do_nots: parse_items(body(Section::DoNots)),
        current_state: parse_text(body(Section::CurrentState)),
    })
}

fn is_placeholder(text: &str) -> bool {
    let t = text.trim().trim_matches(|c| c == '_' || c == '*').trim_end_matches('.');
    text.trim() == EMPTY_PLACEHOLDER
        || t.eq_ignore_ascii_case("none")
        || t.eq_ignore_ascii_case("none recorded")
        || t.eq_ignore_ascii_case("n/a")
}

fn parse_text(lines: &[&str]) -> String {
    let text = lines.join("\n").trim_matches('\n').trim_end().to_string();
    if text.trim() == EMPTY_PLACEHOLDER {
        String::new()
    } else {
        text
    }
}

/// Collect list items; continuation lines fold into the open item
fn parse_items(lines: &[&str]) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    let mut open = false;

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            open = false;
            continue;
        }
        if let Some(caps) = item_re().captures(line) {
            items.push(caps[1].trim().to_string());
            open = true;
        } else if open {
            if let Some(last) = items.last_mut() {
                last.push(' ');
                last.push_str(trimmed);
            }
        } else {
            items.push(trimmed.to_string());
            open = true;
        }
    }

    items.retain(|item| !item.is_empty() && !is_placeholder(item));
    items
}

fn strip_rejected_tag(item: &str) -> &str {
    let trimmed = item.trim_start();
    match trimmed.get(..10) {
        Some(tag) if tag.eq_ignore_ascii_case("[rejected]") => trimmed[10..].trim_start(),
        _ => trimmed,
    }
}

/// Split `subject: detail` at the earliest separator
fn split_pair(item: &str) -> (String, String) {
    let split = [":** ", ": ", " — ", " -- ", " – "]
        .iter()
        .filter_map(|sep| item.find(sep).map(|pos| (pos, sep.len())))
        .min_by_key(|(pos, _)| *pos);

    let (subject, detail) = match split {
        Some((pos, len)) => (&item[..pos], &item[pos + len..]),
        None => (item, ""),
    };

    (
        subject.trim().trim_matches('*').trim().to_string(),
        detail.trim().to_string(),
    )
}

fn or_placeholder(text: &str) -> &str {
    if text.trim().is_empty() {
        EMPTY_PLACEHOLDER
    } else {
        text
    }
}

fn render_list(items: impl Iterator<Item = String>) -> String {
    let lines: Vec<String> = items.collect();
    if lines.is_empty() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        lines.join("\n")
    }
}

fn pair(subject: &str, detail: &str) -> String {
    if detail.is_empty() {
        subject.to_string()
    } else {
        format!("{}: {}", subject, detail)
    }
}

/// Render the six sections under fixed `## ` headings
pub fn render_sections(summary: &DecisionSummary) -> String {
    let bodies = [
        or_placeholder(&summary.current_approach).to_string(),
        render_list(
            summary
                .rejected_approaches
                .iter()
                .map(|r| format!("- [REJECTED] {}", pair(&r.approach, &r.reason))),
        ),
        render_list(
            summary
                .key_decisions
                .iter()
                .enumerate()
                .map(|(i, d)| format!("{}. {}", i + 1, pair(&d.decision, &d.rationale))),
        ),
        render_list(summary.hard_constraints.iter().map(|c| format!("- {}", c))),
        render_list(summary.do_nots.iter().map(|d| format!("- {}", d))),
        or_placeholder(&summary.current_state).to_string(),
    ];

    let mut out = String::new();
    for (section, body) in Section::ALL.iter().zip(bodies.iter()) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("## ");
        out.push_str(section.heading());
        out.push_str("\n\n");
        out.push_str(body);
        out.push('\n');
    }
    out
}
