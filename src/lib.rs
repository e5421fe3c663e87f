//! # shiori
//!
//! A Rust library that loads visual-novel event scripts (JSON) and walks them
//! one player signal at a time, keeping background, actor sprites and music
//! in sync with the current line.
//!
//! The interpreter never blocks. The host draws [`Interpreter::snapshot`],
//! polls its own input and calls [`Interpreter::advance`] or
//! [`Interpreter::select_choice`]. Media goes through a [`MediaBackend`]
//! that the host provides.
//!
//! ## Quick Start
//!
//! ```rust
//! use shiori::{HeadlessBackend, Interpreter, InterpreterState};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let script = r#"{"events": {
//!     "intro": {"type": "dialogue", "data": [{"speaker": "Aoi", "line": "Ready?"}]},
//!     "ask": {
//!         "type": "choice",
//!         "data": {"prompt": {"text": "Go?"}, "go": {"text": "Go"}},
//!         "branches": {"go": "outro"}
//!     },
//!     "outro": {"type": "dialogue", "data": [{"line": "Off we go."}]}
//! }}"#;
//!
//! let mut interpreter = Interpreter::from_json(script, HeadlessBackend::new())?;
//! interpreter.start()?;
//!
//! while !interpreter.is_terminated() {
//!     let Some(snapshot) = interpreter.snapshot() else { break };
//!     match snapshot.choices {
//!         Some(choices) => {
//!             interpreter.select_choice(&choices[0].key)?;
//!         }
//!         None => {
//!             println!("{}: {}", snapshot.speaker, snapshot.line);
//!             interpreter.advance()?;
//!         }
//!     }
//! }
//!
//! assert_eq!(interpreter.state(), &InterpreterState::Terminated);
//! # Ok(())
//! # }
//! ```
//!
//! ## Loading from disk
//!
//! ```rust,no_run
//! use shiori::repository::{FileSystemScriptRepository, ScriptRepository};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = FileSystemScriptRepository::new("scripts");
//! let script = repository.load_script("chapter1").await?;
//! println!("{} events", script.len());
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod cli;
pub mod config;
pub mod parser;
pub mod repository;
pub mod resolve;
pub mod runtime;
pub mod types;

pub use assets::{
    AssetApplyResult, AssetSlot, HeadlessBackend, ImageSlot, LoadStatus, MediaBackend,
    MediaCall, MediaError, SceneAssetCache,
};
pub use parser::check::{CheckResult, Finding, Severity, check};
pub use parser::{ParseError, load as load_script};
pub use runtime::{Interpreter, SignalError};
pub use types::{
    Diagnostic, InterpreterState, Progress, RenderSnapshot, ScriptDocument, Signal, Termination,
};
