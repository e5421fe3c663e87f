//! Event interpreter for scripts
//!
//! [`Interpreter`] walks a [`ScriptDocument`] one signal at a time. It never
//! blocks: waiting for the player is the interpreter staying in its current
//! state until the host calls [`Interpreter::advance`] or
//! [`Interpreter::select_choice`].

use crate::assets::{MediaBackend, SceneAssetCache};
use crate::parser::{self, ParseError};
use crate::types::{
    event::Signal,
    output::{ChoiceEntry, Diagnostic, Progress, RenderSnapshot, ScriptDiagnostic},
    script::{EventNode, SceneRequest, ScriptDocument},
    state::{InterpreterState, Termination},
};
use std::collections::HashSet;
use thiserror::Error;


/// A signal the interpreter refused; its state is unchanged
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("interpreter has already started")]
    AlreadyStarted,
    #[error("interpreter has not started")]
    NotStarted,
    #[error("interpreter has terminated")]
    Terminated,
    #[error("event '{event}' is waiting for a choice")]
    AwaitingChoice { event: String },
    #[error("no choice is pending")]
    NoPendingChoice,
    #[error("event '{event}' has no choice '{key}'")]
    UnknownChoice { event: String, key: String },
    #[error("choice index {index} is out of range for event '{event}' ({count} options)")]
    ChoiceIndexOutOfRange {
        event: String,
        index: usize,
        count: usize,
    },
}

/// Where entering an event leads
enum Landing {
    /// First line of a dialogue event
    Dialogue(SceneRequest),
    /// A choice screen
    Choice(SceneRequest),
    /// Dialogue without lines, continue with the successor
    Skip(Option<String>),
    /// Structural error
    Broken(String),
}

/// Script interpreter driven by host signals
#[derive(Debug)]
pub struct Interpreter<B> {
    script: ScriptDocument,
    assets: SceneAssetCache<B>,
    state: InterpreterState,
    termination: Option<Termination>,
}

impl<B: MediaBackend> Interpreter<B> {
    /// Create an idle interpreter over `script`
    pub fn new(script: ScriptDocument, backend: B) -> Self {
        Self {
            script,
            assets: SceneAssetCache::new(backend),
            state: InterpreterState::Idle,
            termination: None,
        }
    }

    /// Parse a JSON script and create an idle interpreter over it
    pub fn from_json(source: &str, backend: B) -> Result<Self, ParseError> {
        Ok(Self::new(parser::load(source)?, backend))
    }

    /// Enter the first event in document order
    pub fn start(&mut self) -> Result<Progress, SignalError> {
        match self.state {
            InterpreterState::Idle => {}
            InterpreterState::Terminated => return Err(SignalError::Terminated),
            _ => return Err(SignalError::AlreadyStarted),
        }

        let mut diagnostics = Vec::new();
        match self.script.first_key().map(str::to_string) {
            Some(first) => {
                log::debug!("[Engine] starting at event '{}'", first);
                self.enter(first, &mut diagnostics);
            }
            None => {
                log::info!("[Engine] script has no events");
                self.terminate(Termination::Completed);
            }
        }
        Ok(self.progress(diagnostics))
    }

    /// Player pressed continue
    pub fn advance(&mut self) -> Result<Progress, SignalError> {
        let (event, line) = match &self.state {
            InterpreterState::AtDialogueLine { event, line } => (event.clone(), *line),
            InterpreterState::AtChoicePrompt { event } => {
                return Err(SignalError::AwaitingChoice {
                    event: event.clone(),
                });
            }
            InterpreterState::Idle => return Err(SignalError::NotStarted),
            InterpreterState::Terminated => return Err(SignalError::Terminated),
        };

        let mut diagnostics = Vec::new();
        let next_scene = match self.script.get(&event) {
            Some(EventNode::Dialogue(dialogue)) => {
                dialogue.lines.get(line + 1).map(|l| l.scene.clone())
            }
            _ => {
                self.fail(&event, "event is no longer a dialogue".to_string(), &mut diagnostics);
                return Ok(self.progress(diagnostics));
            }
        };

        match next_scene {
            Some(scene) => {
                self.state = InterpreterState::dialogue(event, line + 1);
                self.apply_scene(&scene, &mut diagnostics);
            }
            None => match self.successor(&event) {
                Some(next) => {
                    log::debug!("[Flow] '{}' finished, moving to '{}'", event, next);
                    self.enter(next, &mut diagnostics);
                }
                None => {
                    log::info!("[Engine] reached end of script after '{}'", event);
                    self.terminate(Termination::Completed);
                }
            },
        }

        Ok(self.progress(diagnostics))
    }

    /// Player picked the option with `key`
    ///
    /// An unknown key, including the reserved `"prompt"` entry, is
    /// rejected and the prompt stays up.
    pub fn select_choice(&mut self, key: &str) -> Result<Progress, SignalError> {
        let event = self.pending_choice_event()?;

        let target = match self.script.get(&event) {
            Some(EventNode::Choice(choice)) => match choice.option(key) {
                Some(option) => option.target.clone(),
                None => {
                    log::debug!("[Branch] rejected unknown choice '{}' at '{}'", key, event);
                    return Err(SignalError::UnknownChoice {
                        event,
                        key: key.to_string(),
                    });
                }
            },
            _ => None,
        };

        let mut diagnostics = Vec::new();
        match target {
            Some(target) => {
                log::debug!("[Branch] '{}' chose '{}', moving to '{}'", event, key, target);
                self.enter(target, &mut diagnostics);
            }
            None => self.fail(
                &event,
                format!("choice '{key}' has no branch target"),
                &mut diagnostics,
            ),
        }

        Ok(self.progress(diagnostics))
    }

    /// Player picked the `index`-th option (zero-based, document order)
    pub fn select_choice_index(&mut self, index: usize) -> Result<Progress, SignalError> {
        let event = self.pending_choice_event()?;

        let options = match self.script.get(&event) {
            Some(EventNode::Choice(choice)) => &choice.options,
            _ => return Err(SignalError::NoPendingChoice),
        };
        let key = match options.get(index) {
            Some(option) => option.key.clone(),
            None => {
                return Err(SignalError::ChoiceIndexOutOfRange {
                    event,
                    index,
                    count: options.len(),
                });
            }
        };

        self.select_choice(&key)
    }

    /// Host closed the session; stops any playing track
    pub fn cancel(&mut self) -> Result<Progress, SignalError> {
        if self.state.is_terminated() {
            return Err(SignalError::Terminated);
        }
        log::info!("[Engine] cancelled at {:?}", self.state);
        self.terminate(Termination::Cancelled);
        Ok(self.progress(Vec::new()))
    }

    /// Dispatch a host signal
    pub fn handle(&mut self, signal: Signal) -> Result<Progress, SignalError> {
        match signal {
            Signal::Advance => self.advance(),
            Signal::Choose { key } => self.select_choice(&key),
            Signal::Cancel => self.cancel(),
        }
    }

    /// What the host should draw now; `None` before start and after the end
    pub fn snapshot(&self) -> Option<RenderSnapshot> {
        match &self.state {
            InterpreterState::AtDialogueLine { event, line } => match self.script.get(event) {
                Some(EventNode::Dialogue(dialogue)) => {
                    dialogue.lines.get(*line).map(|l| RenderSnapshot {
                        speaker: l.speaker.clone(),
                        line: l.text.clone(),
                        prompt: None,
                        choices: None,
                    })
                }
                _ => None,
            },
            InterpreterState::AtChoicePrompt { event } => match self.script.get(event) {
                Some(EventNode::Choice(choice)) => Some(RenderSnapshot {
                    speaker: String::new(),
                    line: String::new(),
                    prompt: Some(choice.prompt.clone()),
                    choices: Some(
                        choice
                            .options
                            .iter()
                            .map(|o| ChoiceEntry {
                                key: o.key.clone(),
                                text: o.text.clone(),
                            })
                            .collect(),
                    ),
                }),
                _ => None,
            },
            InterpreterState::Idle | InterpreterState::Terminated => None,
        }
    }

    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    /// Why the run ended, once it has
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn is_terminated(&self) -> bool {
        self.state.is_terminated()
    }

    /// Bound scene assets, for drawing
    pub fn assets(&self) -> &SceneAssetCache<B> {
        &self.assets
    }

    /// The host's media backend; bindings stay under interpreter control
    pub fn backend_mut(&mut self) -> &mut B {
        self.assets.backend_mut()
    }

    pub fn script(&self) -> &ScriptDocument {
        &self.script
    }

    fn pending_choice_event(&self) -> Result<String, SignalError> {
        match &self.state {
            InterpreterState::AtChoicePrompt { event } => Ok(event.clone()),
            InterpreterState::Terminated => Err(SignalError::Terminated),
            InterpreterState::Idle => Err(SignalError::NotStarted),
            InterpreterState::AtDialogueLine { .. } => Err(SignalError::NoPendingChoice),
        }
    }

    /// Follow `key` until an event that waits for the player, or the end
    fn enter(&mut self, key: String, diagnostics: &mut Vec<Diagnostic>) {
        let mut key = key;
        let mut skipped = HashSet::new();

        loop {
            match self.land(&key) {
                Landing::Dialogue(scene) => {
                    self.state = InterpreterState::dialogue(key, 0);
                    self.apply_scene(&scene, diagnostics);
                    return;
                }
                Landing::Choice(scene) => {
                    self.state = InterpreterState::choice(key);
                    self.apply_scene(&scene, diagnostics);
                    return;
                }
                Landing::Skip(next) => {
                    log::debug!("[Flow] '{}' has no lines, skipping", key);
                    if !skipped.insert(key.clone()) {
                        self.fail(
                            &key,
                            "events without lines form a cycle".to_string(),
                            diagnostics,
                        );
                        return;
                    }
                    match next {
                        Some(next) => key = next,
                        None => {
                            log::info!("[Engine] reached end of script after '{}'", key);
                            self.terminate(Termination::Completed);
                            return;
                        }
                    }
                }
                Landing::Broken(reason) => {
                    self.fail(&key, reason, diagnostics);
                    return;
                }
            }
        }
    }

    fn land(&self, key: &str) -> Landing {
        match self.script.get(key) {
            None => Landing::Broken("event is not defined in the script".to_string()),
            Some(EventNode::Malformed { reason }) => Landing::Broken(reason.clone()),
            Some(EventNode::Dialogue(dialogue)) => match dialogue.lines.first() {
                Some(first) => Landing::Dialogue(first.scene.clone()),
                None => Landing::Skip(self.successor(key)),
            },
            Some(EventNode::Choice(choice)) => {
                if choice.options.is_empty() {
                    Landing::Broken("choice offers no options".to_string())
                } else {
                    Landing::Choice(choice.scene.clone())
                }
            }
        }
    }

    /// Explicit `next`, else the following key in document order
    fn successor(&self, key: &str) -> Option<String> {
        let explicit = match self.script.get(key) {
            Some(EventNode::Dialogue(dialogue)) => dialogue.next.clone(),
            _ => None,
        };
        explicit.or_else(|| self.script.key_after(key).map(str::to_string))
    }

    fn apply_scene(&mut self, scene: &SceneRequest, diagnostics: &mut Vec<Diagnostic>) {
        let result = self.assets.apply(scene);
        diagnostics.extend(result.diagnostics.into_iter().map(Diagnostic::Asset));
    }

    fn fail(&mut self, event: &str, reason: String, diagnostics: &mut Vec<Diagnostic>) {
        log::error!("Script error at event '{}': {}", event, reason);
        diagnostics.push(Diagnostic::Script(ScriptDiagnostic {
            event: event.to_string(),
            reason,
        }));
        self.terminate(Termination::ScriptError);
    }

    fn terminate(&mut self, reason: Termination) {
        self.state = InterpreterState::Terminated;
        self.termination = Some(reason);
        self.assets.silence();
    }

    fn progress(&self, diagnostics: Vec<Diagnostic>) -> Progress {
        Progress {
            state: self.state.clone(),
            diagnostics,
        }
    }
}
