//! Scene asset cache
//!
//! Tracks which background, actor and music paths are currently bound and
//! only calls into the [`MediaBackend`] when a requested path differs from
//! the bound one. The interpreter owns the cache; hosts read it.

use crate::types::output::AssetDiagnostic;
use crate::types::script::{AudioCue, SceneRequest};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod headless;

pub use headless::{HeadlessBackend, MediaCall};

#[cfg(test)]
mod tests;

/// Image layers a scene can bind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSlot {
    Background,
    Left,
    Right,
}

/// Any slot of the cache, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetSlot {
    Background,
    Left,
    Right,
    Audio,
}

impl From<ImageSlot> for AssetSlot {
    fn from(slot: ImageSlot) -> Self {
        match slot {
            ImageSlot::Background => AssetSlot::Background,
            ImageSlot::Left => AssetSlot::Left,
            ImageSlot::Right => AssetSlot::Right,
        }
    }
}

impl fmt::Display for AssetSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetSlot::Background => "background",
            AssetSlot::Left => "left sprite",
            AssetSlot::Right => "right sprite",
            AssetSlot::Audio => "audio",
        };
        f.write_str(name)
    }
}

/// Error reported by a media backend
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("asset not found: {path}")]
    NotFound { path: String },
    #[error("cannot decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Texture and music primitives provided by the host.
///
/// Implementations keep the decoded handles; the cache only decides when
/// to call them.
pub trait MediaBackend {
    /// Decode `path` into the texture shown for `slot`
    fn load_texture(&mut self, slot: ImageSlot, path: &str) -> Result<(), MediaError>;

    /// Drop whatever texture `slot` holds
    fn release_texture(&mut self, slot: ImageSlot) {
        let _ = slot;
    }

    /// Open `path` and start playing it immediately
    fn play_music(&mut self, path: &str, looped: bool) -> Result<(), MediaError>;

    /// Stop the current track; stopping when nothing plays is allowed
    fn stop_music(&mut self);
}

/// Outcome for a single slot of an `apply` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    /// Requested path was already bound
    Unchanged,
    /// New asset loaded and bound
    Loaded,
    /// Empty request; slot unbound without a load
    Cleared,
    /// Load failed; slot unbound
    Failed,
}

/// Per-slot result of [`SceneAssetCache::apply`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetApplyResult {
    pub background: LoadStatus,
    pub left: LoadStatus,
    pub right: LoadStatus,
    pub audio: LoadStatus,
    pub diagnostics: Vec<AssetDiagnostic>,
}

/// Bound scene state plus the backend that realises it
#[derive(Debug)]
pub struct SceneAssetCache<B> {
    backend: B,
    background: String,
    left: String,
    right: String,
    audio: AudioCue,
}

impl<B: MediaBackend> SceneAssetCache<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            background: String::new(),
            left: String::new(),
            right: String::new(),
            audio: AudioCue::default(),
        }
    }

    /// Bring every slot in line with `request`
    ///
    /// Slots are handled independently; a failure in one never stops the
    /// others.
    pub fn apply(&mut self, request: &SceneRequest) -> AssetApplyResult {
        let mut diagnostics = Vec::new();

        let background =
            self.apply_image(ImageSlot::Background, &request.background, &mut diagnostics);
        let left = self.apply_image(ImageSlot::Left, &request.left, &mut diagnostics);
        let right = self.apply_image(ImageSlot::Right, &request.right, &mut diagnostics);
        let audio = self.apply_audio(&request.audio, &mut diagnostics);

        AssetApplyResult {
            background,
            left,
            right,
            audio,
            diagnostics,
        }
    }

    /// Stop playback and unbind the audio slot
    pub fn silence(&mut self) {
        self.backend.stop_music();
        if !self.audio.path.is_empty() {
            log::debug!("[Assets] audio '{}' stopped", self.audio.path);
        }
        self.audio = AudioCue::default();
    }

    /// Bound path of an image slot, `None` when the slot is empty
    pub fn bound_image(&self, slot: ImageSlot) -> Option<&str> {
        non_empty(self.image_path(slot))
    }

    pub fn bound_background(&self) -> Option<&str> {
        self.bound_image(ImageSlot::Background)
    }

    pub fn bound_left(&self) -> Option<&str> {
        self.bound_image(ImageSlot::Left)
    }

    pub fn bound_right(&self) -> Option<&str> {
        self.bound_image(ImageSlot::Right)
    }

    /// Bound audio track, `None` while silent
    pub fn bound_audio(&self) -> Option<&AudioCue> {
        (!self.audio.path.is_empty()).then_some(&self.audio)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn image_path(&self, slot: ImageSlot) -> &str {
        match slot {
            ImageSlot::Background => &self.background,
            ImageSlot::Left => &self.left,
            ImageSlot::Right => &self.right,
        }
    }

    fn image_path_mut(&mut self, slot: ImageSlot) -> &mut String {
        match slot {
            ImageSlot::Background => &mut self.background,
            ImageSlot::Left => &mut self.left,
            ImageSlot::Right => &mut self.right,
        }
    }

    fn apply_image(
        &mut self,
        slot: ImageSlot,
        requested: &str,
        diagnostics: &mut Vec<AssetDiagnostic>,
    ) -> LoadStatus {
        if self.image_path(slot) == requested {
            return LoadStatus::Unchanged;
        }

        if requested.is_empty() {
            self.backend.release_texture(slot);
            self.image_path_mut(slot).clear();
            log::debug!("[Assets] {} cleared", AssetSlot::from(slot));
            return LoadStatus::Cleared;
        }

        match self.backend.load_texture(slot, requested) {
            Ok(()) => {
                *self.image_path_mut(slot) = requested.to_string();
                log::debug!("[Assets] {} bound to '{}'", AssetSlot::from(slot), requested);
                LoadStatus::Loaded
            }
            Err(err) => {
                self.backend.release_texture(slot);
                self.image_path_mut(slot).clear();
                diagnostics.push(failure(slot.into(), requested, &err));
                LoadStatus::Failed
            }
        }
    }

    fn apply_audio(
        &mut self,
        requested: &AudioCue,
        diagnostics: &mut Vec<AssetDiagnostic>,
    ) -> LoadStatus {
        // Silence ignores the loop flag
        let unchanged = if requested.path.is_empty() {
            self.audio == AudioCue::default()
        } else {
            self.audio == *requested
        };
        if unchanged {
            return LoadStatus::Unchanged;
        }

        self.backend.stop_music();

        if requested.path.is_empty() {
            self.audio = AudioCue::default();
            log::debug!("[Assets] audio silenced");
            return LoadStatus::Cleared;
        }

        match self.backend.play_music(&requested.path, requested.looped) {
            Ok(()) => {
                self.audio = requested.clone();
                log::debug!(
                    "[Assets] audio playing '{}' (loop={})",
                    requested.path,
                    requested.looped
                );
                LoadStatus::Loaded
            }
            Err(err) => {
                self.audio = AudioCue::default();
                diagnostics.push(failure(AssetSlot::Audio, &requested.path, &err));
                LoadStatus::Failed
            }
        }
    }
}

fn failure(slot: AssetSlot, path: &str, err: &MediaError) -> AssetDiagnostic {
    log::warn!("Failed to load {}: {} ({})", slot, path, err);
    AssetDiagnostic {
        slot,
        path: path.to_string(),
        reason: err.to_string(),
    }
}

fn non_empty(path: &str) -> Option<&str> {
    (!path.is_empty()).then_some(path)
}
