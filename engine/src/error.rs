//! Error types for settings persistence.
//!
//! None of these reach the user. The store logs them and keeps its in-memory
//! state authoritative for the session.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of the key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("storage document {} is not valid JSON: {source}", path.display())]
    Document {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(&'static str),
}

/// Why the store could not load or persist its record.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Persistence(#[from] StorageError),
    #[error("stored settings record is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}
