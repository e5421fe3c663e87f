//! Interpreter state representation

use serde::{Deserialize, Serialize};

/// Position of the interpreter in the script graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum InterpreterState {
    /// Constructed, not started
    #[default]
    Idle,
    /// Showing line `line` of dialogue event `event`
    AtDialogueLine { event: String, line: usize },
    /// Waiting for a choice at event `event`
    AtChoicePrompt { event: String },
    /// No further signals are accepted
    Terminated,
}

impl InterpreterState {
    pub fn dialogue(event: impl Into<String>, line: usize) -> Self {
        Self::AtDialogueLine {
            event: event.into(),
            line,
        }
    }

    pub fn choice(event: impl Into<String>) -> Self {
        Self::AtChoicePrompt {
            event: event.into(),
        }
    }

    /// Key of the current event, if any
    pub fn event_key(&self) -> Option<&str> {
        match self {
            Self::AtDialogueLine { event, .. } | Self::AtChoicePrompt { event } => Some(event),
            Self::Idle | Self::Terminated => None,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Whether the host should present choices
    pub fn is_waiting_for_choice(&self) -> bool {
        matches!(self, Self::AtChoicePrompt { .. })
    }
}

/// Why a run reached `Terminated`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Termination {
    /// The last event finished with no successor
    Completed,
    /// The host cancelled the run
    Cancelled,
    /// A structural script error stopped traversal
    ScriptError,
}
