//! Core types for the shiori library
//!
//! This module contains the fundamental types that form the public API:
//! - Script: parsed, immutable event script
//! - State: interpreter position and termination reason
//! - Signal: external input from the host loop
//! - Output: render snapshots, progress and diagnostics

pub mod event;
pub mod output;
pub mod script;
pub mod state;

pub use event::Signal;
pub use output::{
    AssetDiagnostic, ChoiceEntry, Diagnostic, Progress, RenderSnapshot, ScriptDiagnostic,
};
pub use script::{
    AudioCue, ChoiceNode, ChoiceOption, DialogueLine, DialogueNode, EventNode, SceneRequest,
    ScriptDocument,
};
pub use state::{InterpreterState, Termination};
