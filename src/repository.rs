//! Script repositories
//!
//! Scripts are addressed by id: `intro` maps to `intro.json` under the
//! repository's base directory.

use crate::parser::{self, ParseError};
use crate::types::script::ScriptDocument;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

const SCRIPT_EXTENSION: &str = "json";

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Script not found: {id}")]
    ScriptNotFound { id: String },

    #[error("IO error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid script '{id}': {source}")]
    InvalidFormat {
        id: String,
        #[source]
        source: ParseError,
    },
}

/// Source of event scripts
#[async_trait]
pub trait ScriptRepository: Send + Sync {
    /// Load and parse a script by its id
    async fn load_script(&self, id: &str) -> Result<ScriptDocument, RepositoryError>;

    /// Check if a script exists
    async fn script_exists(&self, id: &str) -> Result<bool, RepositoryError>;

    /// List all available script ids
    async fn list_scripts(&self) -> Result<Vec<String>, RepositoryError>;
}

/// Scripts stored as `<id>.json` files in one directory
pub struct FileSystemScriptRepository {
    base_path: PathBuf,
}

impl FileSystemScriptRepository {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn script_path(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{id}.{SCRIPT_EXTENSION}"))
    }
}

#[async_trait]
impl ScriptRepository for FileSystemScriptRepository {
    async fn load_script(&self, id: &str) -> Result<ScriptDocument, RepositoryError> {
        let path = self.script_path(id);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RepositoryError::ScriptNotFound { id: id.to_string() });
            }
            Err(e) => {
                return Err(RepositoryError::IoError {
                    message: format!("Failed to read script file {}", path.display()),
                    source: e,
                });
            }
        };

        log::debug!("[Repository] loaded '{}' from {}", id, path.display());
        parser::load(&content).map_err(|source| RepositoryError::InvalidFormat {
            id: id.to_string(),
            source,
        })
    }

    async fn script_exists(&self, id: &str) -> Result<bool, RepositoryError> {
        tokio::fs::try_exists(self.script_path(id))
            .await
            .map_err(|e| RepositoryError::IoError {
                message: format!("Failed to check script '{id}'"),
                source: e,
            })
    }

    async fn list_scripts(&self) -> Result<Vec<String>, RepositoryError> {
        let mut scripts = Vec::new();

        let mut entries =
            tokio::fs::read_dir(&self.base_path)
                .await
                .map_err(|e| RepositoryError::IoError {
                    message: format!("Failed to read directory {}", self.base_path.display()),
                    source: e,
                })?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepositoryError::IoError {
                message: "Failed to read directory entry".to_string(),
                source: e,
            })?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SCRIPT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                scripts.push(stem.to_string());
            }
        }

        scripts.sort();
        Ok(scripts)
    }
}

/// Scripts held as JSON sources in memory
#[derive(Debug, Default)]
pub struct InMemoryScriptRepository {
    sources: HashMap<String, String>,
}

impl InMemoryScriptRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, id: impl Into<String>, source: impl Into<String>) -> Self {
        self.sources.insert(id.into(), source.into());
        self
    }
}

#[async_trait]
impl ScriptRepository for InMemoryScriptRepository {
    async fn load_script(&self, id: &str) -> Result<ScriptDocument, RepositoryError> {
        let source = self
            .sources
            .get(id)
            .ok_or_else(|| RepositoryError::ScriptNotFound { id: id.to_string() })?;

        parser::load(source).map_err(|source| RepositoryError::InvalidFormat {
            id: id.to_string(),
            source,
        })
    }

    async fn script_exists(&self, id: &str) -> Result<bool, RepositoryError> {
        Ok(self.sources.contains_key(id))
    }

    async fn list_scripts(&self) -> Result<Vec<String>, RepositoryError> {
        let mut ids: Vec<String> = self.sources.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
