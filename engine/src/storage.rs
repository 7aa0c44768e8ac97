//! Key-value storage backends for the settings record.
//!
//! The interface mirrors a browser's `localStorage`: string keys, string
//! values, synchronous reads and writes. `FileStorage` keeps every item in one
//! JSON document and replaces it atomically (temp file + rename). On Windows,
//! rename-over-existing fails, so we fall back to backup-and-restore.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::NamedTempFile;

use crate::error::StorageError;

/// Synchronous string key-value storage.
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// JSON document on disk holding every stored item.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.flashdeck/storage.json`, if a home directory can be resolved.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        crate::config::data_dir().map(|dir| dir.join("storage.json"))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self) -> PathBuf {
        self.path.with_extension("bak")
    }

    /// Restore the document from `.bak` if a previous write died between the
    /// backup rename and the final rename.
    fn recover_backup(&self) {
        let backup = self.backup_path();
        if self.path.exists() || !backup.exists() {
            return;
        }
        match fs::rename(&backup, &self.path) {
            Ok(()) => tracing::warn!(
                path = %self.path.display(),
                "Recovered storage document from interrupted write"
            ),
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                "Failed to recover storage backup: {e}"
            ),
        }
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>, StorageError> {
        self.recover_backup();
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|source| StorageError::Document {
            path: self.path.clone(),
            source,
        })
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(document).map_err(|source| {
            StorageError::Document {
                path: self.path.clone(),
                source,
            }
        })?;
        self.replace_file(&bytes).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn replace_file(&self, bytes: &[u8]) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;

        let Err(err) = tmp.persist(&self.path) else {
            return Ok(());
        };
        if !self.path.exists() {
            return Err(err.error);
        }

        let backup = self.backup_path();
        let _ = fs::remove_file(&backup);
        fs::rename(&self.path, &backup)?;
        if let Err(rename_err) = err.file.persist(&self.path) {
            let _ = fs::rename(&backup, &self.path);
            return Err(rename_err.error);
        }
        if let Err(e) = fs::remove_file(&backup) {
            tracing::warn!(path = %backup.display(), "Failed to remove storage backup: {e}");
        }
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_document()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // A corrupt document is replaced rather than blocking every future write.
        let mut document = match self.read_document() {
            Ok(document) => document,
            Err(StorageError::Document { .. }) => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document)
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    items: BTreeMap<String, String>,
    fail_writes: bool,
    writes: usize,
}

/// In-memory storage. Clones share the same items, so a test can keep a
/// handle and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .items
            .insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub fn item(&self, key: &str) -> Option<String> {
        self.inner.borrow().items.get(key).cloned()
    }

    /// Make every subsequent write fail, like a full or disabled `localStorage`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    /// Number of successful writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.borrow().writes
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.item(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(StorageError::Unavailable("quota exceeded"));
        }
        inner.items.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}
