//! Session-start injection
//!
//! Turns a resolved store entry into two separate streams: the context block
//! the host merges into the assistant's context (stdout), and operator
//! diagnostics (stderr). Context output depends only on the stored entry.

use std::sync::OnceLock;

use regex::Regex;

use crate::store::{Lookup, ResolvedEntry};
use crate::summary::render_sections;

pub const BANNER_START: &str = "===== PRIOR DESIGN DECISIONS (BINDING) =====";
pub const BANNER_END: &str = "===== END PRIOR DESIGN DECISIONS =====";

/// Prefix of every diagnostic line
pub const DIAGNOSTIC_PREFIX: &str = "[compact-guard]";

static EQUALS_RUN: OnceLock<Regex> = OnceLock::new();

fn equals_run_re() -> &'static Regex {
    EQUALS_RUN.get_or_init(|| Regex::new("={2,}").expect("equals run pattern is valid"))
}

const INSTRUCTIONS: &str = "The following design decisions were recorded before this \
conversation was compacted. Treat them as binding: keep following the current \
approach, respect every hard constraint and do-not, and never re-suggest an approach \
listed as rejected unless the user explicitly reopens it.";

const UNSTRUCTURED_NOTE: &str = "Note: the summary below could not be split into \
sections and is reproduced verbatim.";

/// Output of one session-start invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Injection {
    /// Context block for stdout, if anything was stored
    pub context: Option<String>,
    /// Operator-facing lines for stderr
    pub diagnostics: Vec<String>,
}

/// Format a diagnostic line. Every run of `=` collapses to one character so
/// a diagnostic can never carry a banner fence.
pub fn diagnostic(message: impl AsRef<str>) -> String {
    format!(
        "{} {}",
        DIAGNOSTIC_PREFIX,
        equals_run_re().replace_all(message.as_ref(), "=")
    )
}

/// Build the injection for a store lookup
pub fn format_injection(lookup: &Lookup) -> Injection {
    let mut diagnostics: Vec<String> = lookup
        .skipped
        .iter()
        .map(|(tier, err)| diagnostic(format!("skipped {} tier: {}", tier, err)))
        .collect();

    let context = match &lookup.resolved {
        Some(resolved) => {
            diagnostics.push(diagnostic(format!(
                "injected decisions from {} tier: {}",
                resolved.tier,
                resolved.path.display()
            )));
            Some(render_context(resolved))
        }
        None => {
            diagnostics.push(diagnostic("no stored decisions for this project"));
            None
        }
    };

    Injection {
        context,
        diagnostics,
    }
}

/// Render the context block for a resolved entry
pub fn render_context(resolved: &ResolvedEntry) -> String {
    let meta = &resolved.entry.meta;
    let mut out = String::new();

    out.push_str(BANNER_START);
    out.push_str("\n\n");
    out.push_str(INSTRUCTIONS);
    out.push_str("\n\n");
    out.push_str(&format!(
        "Recorded: {} | Project: {}\n",
        meta.generated.to_rfc3339(),
        meta.project
    ));
    if !meta.structured {
        out.push_str(UNSTRUCTURED_NOTE);
        out.push('\n');
    }
    out.push('\n');

    // Stored text may itself contain an earlier injection; drop its fences
    // so exactly one banner pair is emitted.
    for line in render_sections(&resolved.entry.summary).lines() {
        let trimmed = line.trim();
        if trimmed == BANNER_START || trimmed == BANNER_END {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }

    out.push('\n');
    out.push_str(BANNER_END);
    out.push('\n');
    out
}

/// Host hook-output envelope carrying the context
pub fn hook_json(context: &str) -> serde_json::Value {
    serde_json::json!({
        "hookSpecificOutput": {
            "hookEventName": "SessionStart",
            "additionalContext": context,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuardError;
    use crate::store::{EntryMeta, StoredDecisions, Tier};
    use crate::summary::{DecisionSummary, RejectedApproach};
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    const BANNER_FENCE: &str = "=====";

    fn resolved(summary: DecisionSummary, structured: bool) -> ResolvedEntry {
        ResolvedEntry {
            tier: Tier::Global,
            path: PathBuf::from("/state/abc.md"),
            entry: StoredDecisions {
                meta: EntryMeta {
                    generated: Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap(),
                    project: "/work/app".to_string(),
                    session: None,
                    trigger: None,
                    schema: 1,
                    structured,
                },
                summary,
            },
        }
    }

    fn scenario() -> DecisionSummary {
        DecisionSummary {
            current_approach: "Approach Y".to_string(),
            rejected_approaches: vec![RejectedApproach {
                approach: "Approach X".to_string(),
                reason: "requires network access".to_string(),
            }],
            hard_constraints: vec!["Must run offline".to_string()],
            ..DecisionSummary::default()
        }
    }

    fn banner_count(text: &str) -> (usize, usize) {
        (
            text.matches(BANNER_START).count(),
            text.matches(BANNER_END).count(),
        )
    }

    #[test]
    fn test_context_block_contents() {
        let context = render_context(&resolved(scenario(), true));
        assert!(context.starts_with(BANNER_START));
        assert!(context.ends_with(&format!("{}\n", BANNER_END)));
        assert!(context.contains("never re-suggest"));
        assert!(context.contains("Recorded: 2026-05-01T12:00:00+00:00 | Project: /work/app"));
        assert!(context.contains("Approach Y"));
        assert!(context.contains("- [REJECTED] Approach X: requires network access"));
        assert!(context.contains("- Must run offline"));
        assert!(!context.contains("verbatim"));
        assert_eq!(banner_count(&context), (1, 1));
    }

    #[test]
    fn test_repeated_injection_is_byte_identical() {
        let lookup = Lookup {
            resolved: Some(resolved(scenario(), true)),
            skipped: vec![],
        };
        let first = format_injection(&lookup);
        let second = format_injection(&lookup);
        assert_eq!(first.context, second.context);
        assert!(first.context.is_some());
    }

    #[test]
    fn test_stored_banner_is_not_nested() {
        let previous = render_context(&resolved(scenario(), true));
        let context = render_context(&resolved(DecisionSummary::raw(previous), false));
        assert_eq!(banner_count(&context), (1, 1));
        assert!(context.contains("reproduced verbatim"));
    }

    #[test]
    fn test_nothing_stored() {
        let injection = format_injection(&Lookup::default());
        assert_eq!(injection.context, None);
        assert_eq!(
            injection.diagnostics,
            vec!["[compact-guard] no stored decisions for this project"]
        );
    }

    #[test]
    fn test_diagnostics_name_tier_and_skips() {
        let lookup = Lookup {
            resolved: Some(resolved(scenario(), true)),
            skipped: vec![(
                Tier::Local,
                GuardError::invalid_entry("/work/app/.claude/design-decisions.md", "garbage"),
            )],
        };
        let injection = format_injection(&lookup);
        assert_eq!(injection.diagnostics.len(), 2);
        assert!(injection.diagnostics[0].starts_with("[compact-guard] skipped local tier"));
        assert!(injection.diagnostics[1].contains("global tier: /state/abc.md"));
    }

    #[test]
    fn test_diagnostic_never_carries_fences() {
        let line = diagnostic(format!("saw {}", BANNER_START));
        assert!(!line.contains(BANNER_FENCE));
        assert!(line.starts_with(DIAGNOSTIC_PREFIX));

        for run in [9, 10, 25] {
            let line = diagnostic(format!("cwd /tmp/{}/x", "=".repeat(run)));
            assert!(!line.contains(BANNER_FENCE), "{} left a fence", run);
            assert_eq!(line, "[compact-guard] cwd /tmp/=/x");
        }
        assert_eq!(diagnostic("key=value"), "[compact-guard] key=value");
    }

    #[test]
    fn test_hook_json_envelope() {
        let value = hook_json("ctx");
        assert_eq!(value["hookSpecificOutput"]["hookEventName"], "SessionStart");
        assert_eq!(value["hookSpecificOutput"]["additionalContext"], "ctx");
    }
}
