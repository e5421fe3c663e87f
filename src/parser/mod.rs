//! JSON script loader for shiori
//!
//! This module turns a JSON event script into a [`ScriptDocument`]. Only
//! malformed JSON text fails the load; everything else is parsed leniently
//! and structural problems are recorded on the offending event.

use crate::types::script::{
    AudioCue, ChoiceNode, ChoiceOption, DEFAULT_LINE, DEFAULT_SPEAKER, DialogueLine,
    DialogueNode, EventNode, SceneRequest, ScriptDocument,
};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod check;


/// Choice entry that carries the prompt rather than a selectable option
pub const PROMPT_KEY: &str = "prompt";

/// Error returned when a script cannot be loaded at all
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON at {line}:{column}: {message}")]
    Json {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("failed to read script {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Json {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Parse a JSON script
pub fn load(source: &str) -> Result<ScriptDocument, ParseError> {
    let root: Value = serde_json::from_str(source)?;
    Ok(ScriptParser::new(&root).parse())
}

/// Read and parse a JSON script file
pub fn load_file(path: impl AsRef<Path>) -> Result<ScriptDocument, ParseError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load(&source)
}

struct ScriptParser<'a> {
    events: Option<&'a Map<String, Value>>,
}

impl<'a> ScriptParser<'a> {
    fn new(root: &'a Value) -> Self {
        let events = root.get("events").and_then(Value::as_object);
        if events.is_none() {
            log::warn!("Script has no 'events' object; nothing to play");
        }
        Self { events }
    }

    fn parse(self) -> ScriptDocument {
        let Some(events) = self.events else {
            return ScriptDocument::default();
        };

        let entries = events
            .iter()
            .map(|(key, value)| (key.clone(), self.parse_event(key, value)))
            .collect();

        ScriptDocument::new(entries)
    }

    fn parse_event(&self, key: &str, value: &Value) -> EventNode {
        let node = match value.get("type").and_then(Value::as_str) {
            Some("dialogue") => EventNode::Dialogue(self.parse_dialogue(value)),
            Some("choice") => self.parse_choice(value),
            Some(other) => EventNode::Malformed {
                reason: format!("unknown event type '{other}'"),
            },
            None => EventNode::Malformed {
                reason: "missing 'type' string".to_string(),
            },
        };

        if let EventNode::Malformed { reason } = &node {
            log::debug!("[Parse] event '{}' is malformed: {}", key, reason);
        }
        node
    }

    fn parse_dialogue(&self, value: &Value) -> DialogueNode {
        let lines = value
            .get("data")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(|item| self.parse_line(item)).collect())
            .unwrap_or_default();

        DialogueNode {
            lines,
            next: string_field(value, "next"),
        }
    }

    fn parse_line(&self, item: &Value) -> DialogueLine {
        DialogueLine {
            speaker: string_field(item, "speaker").unwrap_or_else(|| DEFAULT_SPEAKER.to_string()),
            text: string_field(item, "line").unwrap_or_else(|| DEFAULT_LINE.to_string()),
            scene: self.parse_scene(item),
        }
    }

    fn parse_choice(&self, value: &Value) -> EventNode {
        let Some(data) = value.get("data").and_then(Value::as_object) else {
            return EventNode::Malformed {
                reason: "choice is missing a 'data' object".to_string(),
            };
        };
        let Some(branches) = value.get("branches").and_then(Value::as_object) else {
            return EventNode::Malformed {
                reason: "choice is missing a 'branches' object".to_string(),
            };
        };

        let prompt = data
            .get(PROMPT_KEY)
            .and_then(|p| string_field(p, "text"))
            .unwrap_or_default();

        let options = data
            .iter()
            .filter(|(key, _)| key.as_str() != PROMPT_KEY)
            .map(|(key, entry)| ChoiceOption {
                key: key.clone(),
                text: string_field(entry, "text").unwrap_or_else(|| key.clone()),
                target: branches
                    .get(key)
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
            .collect();

        let unmatched_branches = branches
            .keys()
            .filter(|key| key.as_str() == PROMPT_KEY || !data.contains_key(key.as_str()))
            .cloned()
            .collect();

        EventNode::Choice(ChoiceNode {
            prompt,
            options,
            scene: self.parse_scene(value),
            unmatched_branches,
        })
    }

    fn parse_scene(&self, value: &Value) -> SceneRequest {
        let audio = value.get("audio");
        SceneRequest {
            background: string_field(value, "background_sprite").unwrap_or_default(),
            left: string_field(value, "left_sprite").unwrap_or_default(),
            right: string_field(value, "right_sprite").unwrap_or_default(),
            audio: AudioCue {
                path: audio
                    .and_then(|a| string_field(a, "path"))
                    .unwrap_or_default(),
                looped: audio
                    .and_then(|a| a.get("loop"))
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            },
        }
    }
}

/// String field of an object; absent when missing or not a string
fn string_field(value: &Value, name: &str) -> Option<String> {
    value.get(name).and_then(Value::as_str).map(str::to_string)
}
