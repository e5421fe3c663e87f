//! Console media backend
//!
//! Stands in for a real renderer: it checks that asset files exist under
//! the asset root and describes every change as a line of text.

use crate::assets::{AssetSlot, ImageSlot, MediaBackend, MediaError};
use crate::resolve::Resolver;
use std::io;
use std::path::Path;

pub struct ConsoleMediaBackend {
    resolver: Box<dyn Resolver>,
    messages: Vec<String>,
}

impl ConsoleMediaBackend {
    pub fn new(resolver: Box<dyn Resolver>) -> Self {
        Self {
            resolver,
            messages: Vec::new(),
        }
    }

    /// Take the change descriptions queued since the last call
    pub fn drain_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}

impl std::fmt::Debug for ConsoleMediaBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleMediaBackend")
            .field("messages", &self.messages)
            .finish_non_exhaustive()
    }
}

impl MediaBackend for ConsoleMediaBackend {
    fn load_texture(&mut self, slot: ImageSlot, path: &str) -> Result<(), MediaError> {
        ensure_file(&self.resolver.resolve_image(path), path)?;
        self.messages
            .push(format!("[{}] {}", AssetSlot::from(slot), path));
        Ok(())
    }

    fn release_texture(&mut self, slot: ImageSlot) {
        self.messages
            .push(format!("[{}] (cleared)", AssetSlot::from(slot)));
    }

    fn play_music(&mut self, path: &str, looped: bool) -> Result<(), MediaError> {
        ensure_file(&self.resolver.resolve_audio(path), path)?;
        let mode = if looped { " (loop)" } else { "" };
        self.messages.push(format!("[bgm] playing {path}{mode}"));
        Ok(())
    }

    fn stop_music(&mut self) {
        log::trace!("[Console] stop music");
    }
}

fn ensure_file(resolved: &Path, path: &str) -> Result<(), MediaError> {
    match std::fs::metadata(resolved) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(MediaError::NotFound {
            path: path.to_string(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(MediaError::NotFound {
            path: path.to_string(),
        }),
        Err(source) => Err(MediaError::Io {
            path: path.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::BasicResolver;

    #[test]
    fn existing_files_are_reported() {
        let dir = std::env::temp_dir().join(format!("shiori-media-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("bg.png"), b"png").unwrap();
        std::fs::write(dir.join("theme.ogg"), b"ogg").unwrap();
        let mut backend = ConsoleMediaBackend::new(Box::new(BasicResolver::new(&dir)));

        backend.load_texture(ImageSlot::Background, "bg.png").unwrap();
        backend.play_music("theme.ogg", true).unwrap();
        backend.release_texture(ImageSlot::Left);

        assert_eq!(
            backend.drain_messages(),
            vec![
                "[background] bg.png".to_string(),
                "[bgm] playing theme.ogg (loop)".to_string(),
                "[left sprite] (cleared)".to_string(),
            ]
        );
        assert!(backend.drain_messages().is_empty());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_not_found() {
        let mut backend = ConsoleMediaBackend::new(Box::new(BasicResolver::new(
            std::env::temp_dir().join("shiori-media-nowhere"),
        )));

        let err = backend.play_music("missing.ogg", false).unwrap_err();

        assert!(matches!(err, MediaError::NotFound { ref path } if path == "missing.ogg"));
        assert!(backend.drain_messages().is_empty());
    }

    #[test]
    fn directory_is_not_an_asset() {
        let mut backend = ConsoleMediaBackend::new(Box::new(BasicResolver::new(std::env::temp_dir())));
        assert!(backend.load_texture(ImageSlot::Right, ".").is_err());
    }
}
