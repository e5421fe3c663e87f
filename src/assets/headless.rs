//! Media backend that decodes nothing and records every call.
//!
//! Useful for running scripts without a window and for asserting exactly
//! which loads the cache issued.

use super::{ImageSlot, MediaBackend, MediaError};
use std::collections::HashSet;

/// A call made to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCall {
    LoadTexture { slot: ImageSlot, path: String },
    ReleaseTexture { slot: ImageSlot },
    PlayMusic { path: String, looped: bool },
    StopMusic,
}

/// Backend that succeeds for every path except those marked missing
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    calls: Vec<MediaCall>,
    missing: HashSet<String>,
    playing: Option<String>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loads of `path` fail with `NotFound`
    pub fn with_missing(mut self, path: impl Into<String>) -> Self {
        self.missing.insert(path.into());
        self
    }

    pub fn mark_present(&mut self, path: &str) {
        self.missing.remove(path);
    }

    pub fn calls(&self) -> &[MediaCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of load attempts (textures and music) for `path`
    pub fn load_attempts(&self, path: &str) -> usize {
        self.calls
            .iter()
            .filter(|call| match call {
                MediaCall::LoadTexture { path: p, .. } | MediaCall::PlayMusic { path: p, .. } => {
                    p == path
                }
                _ => false,
            })
            .count()
    }

    /// Track currently playing, if any
    pub fn playing(&self) -> Option<&str> {
        self.playing.as_deref()
    }

    fn check(&self, path: &str) -> Result<(), MediaError> {
        if self.missing.contains(path) {
            Err(MediaError::NotFound {
                path: path.to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl MediaBackend for HeadlessBackend {
    fn load_texture(&mut self, slot: ImageSlot, path: &str) -> Result<(), MediaError> {
        self.calls.push(MediaCall::LoadTexture {
            slot,
            path: path.to_string(),
        });
        self.check(path)
    }

    fn release_texture(&mut self, slot: ImageSlot) {
        self.calls.push(MediaCall::ReleaseTexture { slot });
    }

    fn play_music(&mut self, path: &str, looped: bool) -> Result<(), MediaError> {
        self.calls.push(MediaCall::PlayMusic {
            path: path.to_string(),
            looped,
        });
        self.check(path)?;
        self.playing = Some(path.to_string());
        Ok(())
    }

    fn stop_music(&mut self) {
        self.calls.push(MediaCall::StopMusic);
        self.playing = None;
    }
}
