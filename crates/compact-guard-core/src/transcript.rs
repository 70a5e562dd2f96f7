//! Transcript loading
//!
//! Host transcripts are JSON Lines files where each line is one event. Only
//! user and assistant turns carry conversation text; everything else
//! (progress, tool bookkeeping, snapshots) is skipped. Input is bounded so
//! the extraction prompt stays within a predictable size.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

use serde::Deserialize;
use serde_json::Value;

use crate::config::TranscriptConfig;
use crate::error::{GuardError, Result};
use crate::trace_time;

const TRUNCATION_MARKER: &str = "\n[...truncated...]";
const TURN_SEPARATOR: &str = "\n\n---\n\n";

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn from_entry_kind(kind: &str) -> Option<Self> {
        match kind {
            "user" | "human" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Assistant => "ASSISTANT",
        }
    }
}

/// One conversation turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// A single transcript line. Field layout varies between host versions, so
/// everything is optional and resolved leniently.
#[derive(Debug, Default, Deserialize)]
struct RawEntry {
    #[serde(rename = "type")]
    kind: Option<String>,
    role: Option<String>,
    message: Option<Value>,
    content: Option<Value>,
}

impl RawEntry {
    fn role(&self) -> Option<Role> {
        self.kind
            .as_deref()
            .filter(|k| !k.is_empty())
            .or(self.role.as_deref())
            .and_then(Role::from_entry_kind)
    }

    fn text(&self) -> String {
        let content = match &self.message {
            Some(Value::Object(message)) => message.get("content"),
            _ => self.content.as_ref(),
        };
        content.map(content_text).unwrap_or_default()
    }
}

/// Flatten message content into plain text
fn content_text(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .filter_map(|block| match block {
                Value::String(text) => Some(text.as_str()),
                Value::Object(obj) if obj.get("type").and_then(Value::as_str) == Some("text") => {
                    Some(obj.get("text").and_then(Value::as_str).unwrap_or(""))
                }
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

/// Reads transcripts with a fixed truncation policy: each turn is cut to
/// `max_turn_chars` characters and only the last `max_turns` turns are kept.
#[derive(Debug, Clone)]
pub struct TranscriptReader {
    max_turns: usize,
    max_turn_chars: usize,
}

impl TranscriptReader {
    pub fn new(config: &TranscriptConfig) -> Self {
        Self {
            max_turns: config.max_turns,
            max_turn_chars: config.max_turn_chars,
        }
    }

    /// Load the bounded, ordered turns of a transcript
    #[tracing::instrument(skip(self, path), fields(path = %path.display()))]
    pub fn read(&self, path: &Path) -> Result<Vec<Turn>> {
        let start = Instant::now();

        if !path.is_file() {
            return Err(GuardError::MissingTranscript {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let turns = self.parse(&content);

        trace_time!(start, "read_transcript", turns = turns.len());
        Ok(turns)
    }

    /// Parse JSONL content into bounded turns. Malformed lines are skipped.
    pub fn parse(&self, content: &str) -> Vec<Turn> {
        let mut entries = 0usize;
        let mut turns: Vec<Turn> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str::<RawEntry>(line).ok())
            .inspect(|_| entries += 1)
            .filter_map(|entry| {
                let role = entry.role()?;
                let text = entry.text().trim().to_string();
                if text.is_empty() {
                    return None;
                }
                Some(Turn {
                    role,
                    text: self.truncate(text),
                })
            })
            .collect();

        if turns.len() > self.max_turns {
            turns.drain(..turns.len() - self.max_turns);
        }

        tracing::debug!(entries, turns = turns.len(), "parsed transcript");
        turns
    }

    fn truncate(&self, text: String) -> String {
        match text.char_indices().nth(self.max_turn_chars) {
            Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
            None => text,
        }
    }
}

/// Render turns as labelled blocks for the extraction prompt
pub fn render_conversation(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|turn| format!("[{}]\n{}", turn.role.label(), turn.text))
        .collect::<Vec<_>>()
        .join(TURN_SEPARATOR)
}

/// Name of the host's transcript directory for a working directory
pub fn project_transcript_dir_name(cwd: &str) -> String {
    cwd.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Find the most recently modified transcript for a project
pub fn discover_latest(projects_dir: &Path, cwd: &str) -> Result<PathBuf> {
    let dir = projects_dir.join(project_transcript_dir_name(cwd));
    let missing = || GuardError::MissingTranscript { path: dir.clone() };

    let entries = fs::read_dir(&dir).map_err(|_| missing())?;

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        if newest.as_ref().map_or(true, |(t, _)| modified > *t) {
            newest = Some((modified, path));
        }
    }

    newest.map(|(_, path)| path).ok_or_else(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn reader(max_turns: usize, max_turn_chars: usize) -> TranscriptReader {
        TranscriptReader {
            max_turns,
            max_turn_chars,
        }
    }

    #[test]
    fn test_parse_mixed_schemas() {
        let content = r#"
{"type":"user","message":{"role":"user","content":"Should we use SQLite?"}}
{"type":"assistant","message":{"content":[{"type":"text","text":"Yes."},{"type":"tool_use","name":"Bash"},{"type":"text","text":"It is embedded."}]}}
{"type":"progress","data":{}}
not json at all
{"role":"human","content":"Agreed"}
{"type":"user","message":{"content":[{"type":"tool_result","content":"ok"}]}}
"#;
        let turns = reader(80, 3000).parse(content);
        assert_eq!(
            turns,
            vec![
                Turn {
                    role: Role::User,
                    text: "Should we use SQLite?".to_string()
                },
                Turn {
                    role: Role::Assistant,
                    text: "Yes.\nIt is embedded.".to_string()
                },
                Turn {
                    role: Role::User,
                    text: "Agreed".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_keeps_most_recent_turns() {
        let content: String = (0..10)
            .map(|i| format!("{{\"type\":\"user\",\"message\":{{\"content\":\"turn {}\"}}}}\n", i))
            .collect();
        let turns = reader(3, 3000).parse(&content);
        let texts: Vec<_> = turns.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["turn 7", "turn 8", "turn 9"]);
    }

    #[test]
    fn test_truncates_long_turns_on_char_boundary() {
        let content = "{\"type\":\"assistant\",\"message\":{\"content\":\"ééééé\"}}";
        let turns = reader(80, 3).parse(content);
        assert_eq!(turns[0].text, "ééé\n[...truncated...]");
    }

    #[test]
    fn test_missing_transcript() {
        let dir = tempdir().unwrap();
        let result = reader(80, 3000).read(&dir.path().join("absent.jsonl"));
        assert!(matches!(result, Err(GuardError::MissingTranscript { .. })));
    }

    #[test]
    fn test_render_conversation() {
        let turns = vec![
            Turn {
                role: Role::User,
                text: "a".into(),
            },
            Turn {
                role: Role::Assistant,
                text: "b".into(),
            },
        ];
        assert_eq!(
            render_conversation(&turns),
            "[USER]\na\n\n---\n\n[ASSISTANT]\nb"
        );
    }

    #[test]
    fn test_discover_latest_picks_newest() {
        let dir = tempdir().unwrap();
        let cwd = "/home/dev/my.app";
        let project_dir = dir.path().join("-home-dev-my-app");
        fs::create_dir_all(&project_dir).unwrap();

        let old = project_dir.join("old.jsonl");
        let new = project_dir.join("new.jsonl");
        fs::write(&old, "{}").unwrap();
        fs::write(project_dir.join("notes.txt"), "x").unwrap();
        fs::write(&new, "{}").unwrap();

        let past = SystemTime::now() - std::time::Duration::from_secs(3600);
        fs::File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(past)
            .unwrap();

        assert_eq!(discover_latest(dir.path(), cwd).unwrap(), new);
    }

    #[test]
    fn test_discover_latest_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            discover_latest(dir.path(), "/nowhere"),
            Err(GuardError::MissingTranscript { .. })
        ));
    }
}
