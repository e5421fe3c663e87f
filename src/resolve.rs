//! Resource resolution - mapping script asset paths to file paths.

use std::path::{Path, PathBuf};

pub trait Resolver: Send {
    fn resolve_image(&self, path: &str) -> PathBuf {
        PathBuf::from(path)
    }

    fn resolve_audio(&self, path: &str) -> PathBuf {
        PathBuf::from(path)
    }
}

/// Resolves relative script paths against an asset root
pub struct BasicResolver {
    pub base_dir: PathBuf,
}

impl BasicResolver {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn join(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl Resolver for BasicResolver {
    fn resolve_image(&self, path: &str) -> PathBuf {
        self.join(path)
    }

    fn resolve_audio(&self, path: &str) -> PathBuf {
        self.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_join_base_dir() {
        let resolver = BasicResolver::new("game");
        assert_eq!(
            resolver.resolve_image("Assets/bg/forest.png"),
            PathBuf::from("game/Assets/bg/forest.png")
        );
        assert_eq!(
            resolver.resolve_audio("bgm/theme.ogg"),
            PathBuf::from("game/bgm/theme.ogg")
        );
    }

    #[test]
    fn absolute_paths_are_kept() {
        let resolver = BasicResolver::new("game");
        let absolute = std::env::temp_dir().join("theme.ogg");
        let resolved = resolver.resolve_audio(absolute.to_str().unwrap());
        assert_eq!(resolved, absolute);
    }

    #[test]
    fn default_resolver_uses_path_as_is() {
        struct Identity;
        impl Resolver for Identity {}

        assert_eq!(Identity.resolve_image("a/b.png"), PathBuf::from("a/b.png"));
    }
}
