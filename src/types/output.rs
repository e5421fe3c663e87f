//! Output from interpreter signals

use crate::assets::AssetSlot;
use crate::types::state::InterpreterState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Read-only projection of the interpreter the host draws from
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RenderSnapshot {
    /// Speaker of the current line (empty on a choice screen)
    pub speaker: String,
    /// Text of the current line (empty on a choice screen)
    pub line: String,
    /// Prompt text when waiting for a choice
    pub prompt: Option<String>,
    /// Selectable options when waiting for a choice
    pub choices: Option<Vec<ChoiceEntry>>,
}

impl RenderSnapshot {
    pub fn has_choices(&self) -> bool {
        self.choices.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// A selectable option as shown to the player
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceEntry {
    pub key: String,
    pub text: String,
}

/// Result of a signal that the interpreter accepted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Progress {
    /// State after the signal was handled
    pub state: InterpreterState,
    /// Non-fatal problems met while handling the signal
    pub diagnostics: Vec<Diagnostic>,
}

/// Status record for a problem that did not abort the call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Diagnostic {
    /// An asset could not be loaded; the slot was left empty
    Asset(AssetDiagnostic),
    /// The script is structurally broken at `event`; the run terminated
    Script(ScriptDiagnostic),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Asset(d) => write!(
                f,
                "failed to load {} '{}': {}",
                d.slot, d.path, d.reason
            ),
            Diagnostic::Script(d) => write!(f, "event '{}': {}", d.event, d.reason),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetDiagnostic {
    pub slot: AssetSlot,
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptDiagnostic {
    pub event: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display_names_slot_and_path() {
        let diagnostic = Diagnostic::Asset(AssetDiagnostic {
            slot: AssetSlot::Background,
            path: "bg/forest.png".to_string(),
            reason: "not found".to_string(),
        });
        assert_eq!(
            diagnostic.to_string(),
            "failed to load background 'bg/forest.png': not found"
        );

        let diagnostic = Diagnostic::Script(ScriptDiagnostic {
            event: "q1".to_string(),
            reason: "missing 'branches' object".to_string(),
        });
        assert_eq!(diagnostic.to_string(), "event 'q1': missing 'branches' object");
    }

    #[test]
    fn snapshot_without_choices() {
        let snapshot = RenderSnapshot::default();
        assert!(!snapshot.has_choices());

        let snapshot = RenderSnapshot {
            choices: Some(Vec::new()),
            ..Default::default()
        };
        assert!(!snapshot.has_choices());
    }
}
