//! Flat-file persistence for the notebook document.
//!
//! The whole document is rewritten on every save. Writes from this process are
//! serialized; nothing protects the file from other processes.

use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::models::{PersistedDocument, SaveStatus};

/// Errors raised by [`DocumentStore`]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error (file system)
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored document is not valid JSON
    #[error("Corrupt data file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reads and writes the single JSON document at a fixed path
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Overwrite the stored document.
    ///
    /// The document is written exactly as received. An empty or missing
    /// `files` entry is refused with [`SaveStatus::Ignored`] once a
    /// document exists, so a frontend that has not finished loading cannot
    /// wipe saved state.
    pub async fn save(&self, document: &PersistedDocument) -> Result<SaveStatus, StoreError> {
        let _guard = self.write_lock.lock().await;

        if document.file_count() == 0 && self.exists().await? {
            tracing::debug!(path = %self.path.display(), "Ignoring save with no files");
            return Ok(SaveStatus::Ignored);
        }

        let bytes = to_pretty_json(document)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| self.io_error(e))?;

        tracing::info!(
            path = %self.path.display(),
            files = document.file_count(),
            bookmarks = document.bookmark_count(),
            "Saved notebook"
        );
        Ok(SaveStatus::Success)
    }

    /// Return the stored document verbatim, or the empty document if nothing
    /// has been saved yet.
    pub async fn load(&self) -> Result<Value, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PersistedDocument::empty().into_value());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    async fn exists(&self) -> Result<bool, StoreError> {
        tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// UTF-8 JSON with four-space indentation; non-ASCII text is written as-is.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}
