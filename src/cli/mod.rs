//! Terminal host for the interpreter

pub mod check;
pub mod media;
pub mod play;

pub use check::run_check;
pub use media::ConsoleMediaBackend;
pub use play::{play_session, run_play};
