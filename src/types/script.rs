//! Parsed script representation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Speaker used when a dialogue line names none
pub const DEFAULT_SPEAKER: &str = "Narrator";

/// Text used when a dialogue line carries none
pub const DEFAULT_LINE: &str = "...";

/// Immutable script loaded from a declarative source.
///
/// Keeps the key order of the source document next to the key lookup so
/// that successor fallback never depends on container iteration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScriptDocument {
    order: Vec<String>,
    events: HashMap<String, EventNode>,
}

impl ScriptDocument {
    /// Build a document from `(key, node)` pairs in document order.
    ///
    /// A repeated key keeps its first position and its last node.
    pub fn new(entries: Vec<(String, EventNode)>) -> Self {
        let mut order = Vec::with_capacity(entries.len());
        let mut events = HashMap::with_capacity(entries.len());
        for (key, node) in entries {
            if events.insert(key.clone(), node).is_none() {
                order.push(key);
            }
        }
        Self { order, events }
    }

    pub fn get(&self, key: &str) -> Option<&EventNode> {
        self.events.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.events.contains_key(key)
    }

    /// First key in document order
    pub fn first_key(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    /// Key immediately following `key` in document order
    pub fn key_after(&self, key: &str) -> Option<&str> {
        let index = self.order.iter().position(|k| k == key)?;
        self.order.get(index + 1).map(String::as_str)
    }

    /// Keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(key, node)` pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EventNode)> {
        self.order
            .iter()
            .filter_map(|k| self.events.get(k).map(|node| (k.as_str(), node)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// One addressable unit of the script graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventNode {
    Dialogue(DialogueNode),
    Choice(ChoiceNode),
    /// Structurally invalid event; reaching it ends the run
    Malformed { reason: String },
}

impl EventNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            EventNode::Dialogue(_) => "dialogue",
            EventNode::Choice(_) => "choice",
            EventNode::Malformed { .. } => "malformed",
        }
    }
}

/// Linear run of dialogue lines
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DialogueNode {
    pub lines: Vec<DialogueLine>,
    /// Explicit successor; falls back to document order when absent
    pub next: Option<String>,
}

/// A single beat of dialogue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
    pub scene: SceneRequest,
}

impl Default for DialogueLine {
    fn default() -> Self {
        Self {
            speaker: DEFAULT_SPEAKER.to_string(),
            text: DEFAULT_LINE.to_string(),
            scene: SceneRequest::default(),
        }
    }
}

/// Branching prompt
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChoiceNode {
    pub prompt: String,
    pub options: Vec<ChoiceOption>,
    /// Assets shown for the whole choice screen
    pub scene: SceneRequest,
    /// Branch keys with no matching option
    #[serde(default)]
    pub unmatched_branches: Vec<String>,
}

impl ChoiceNode {
    pub fn option(&self, key: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.key == key)
    }
}

/// A selectable entry of a choice node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceOption {
    pub key: String,
    pub text: String,
    /// Successor event; `None` when the script maps no branch for this key
    pub target: Option<String>,
}

/// Desired scene assets. Empty paths mean "nothing bound".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SceneRequest {
    pub background: String,
    pub left: String,
    pub right: String,
    pub audio: AudioCue,
}

/// Background music request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudioCue {
    pub path: String,
    #[serde(rename = "loop")]
    pub looped: bool,
}

impl AudioCue {
    pub fn new(path: impl Into<String>, looped: bool) -> Self {
        Self {
            path: path.into(),
            looped,
        }
    }
}
