//! Persisting trackers back into their documents.
//!
//! Documents are reached through a [`Vault`] handle passed in by the caller.
//! Writes re-scan the document and only replace a block whose body still
//! matches what was loaded, so a stale line range never clobbers other text.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::document::{TrackerBlock, load_all_trackers, splice_tracker};
use crate::entry::Tracker;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} has no tracker block {number}")]
    BlockMissing { path: PathBuf, number: usize },

    #[error("tracker block {number} in {path} changed since it was loaded")]
    Stale { path: PathBuf, number: usize },

    #[error("tracker block {number} in {path} is not valid tracker JSON: {reason}")]
    Unparseable {
        path: PathBuf,
        number: usize,
        reason: String,
    },
}

/// Read/write access to documents.
pub trait Vault {
    /// Returns the full text of a document.
    fn read(&self, path: &Path) -> Result<String, StoreError>;

    /// Replaces the full text of a document.
    fn write(&self, path: &Path, contents: &str) -> Result<(), StoreError>;

    /// Reads, edits and writes a document as one step.
    ///
    /// Implementations that can exclude other writers should hold that
    /// exclusion for the whole call.
    fn update(
        &self,
        path: &Path,
        edit: &mut dyn FnMut(String) -> Result<String, StoreError>,
    ) -> Result<(), StoreError> {
        let contents = self.read(path)?;
        let updated = edit(contents)?;
        self.write(path, &updated)
    }
}

/// In-memory documents keyed by path.
#[derive(Debug, Default)]
pub struct MemoryVault {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a document.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(path.into(), contents.into());
        self
    }
}

impl Vault for MemoryVault {
    fn read(&self, path: &Path) -> Result<String, StoreError> {
        self.files
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        self.files
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

/// Loads every tracker block of a document.
pub fn load_document<V: Vault + ?Sized>(
    vault: &V,
    path: &Path,
) -> Result<Vec<TrackerBlock>, StoreError> {
    let contents = vault.read(path)?;
    Ok(load_all_trackers(&contents))
}

/// Writes `tracker` into the block it was loaded from.
///
/// The document is re-scanned at write time. The write is refused when the
/// block is gone, when its body no longer matches `block.raw`, or when the
/// body never parsed (the empty fallback tracker must not replace it).
pub fn save_tracker<V: Vault + ?Sized>(
    vault: &V,
    path: &Path,
    block: &TrackerBlock,
    tracker: &Tracker,
) -> Result<(), StoreError> {
    let number = block.index + 1;
    if let Some(reason) = &block.parse_error {
        return Err(StoreError::Unparseable {
            path: path.to_path_buf(),
            number,
            reason: reason.clone(),
        });
    }

    vault.update(path, &mut |contents| {
        let current = load_all_trackers(&contents)
            .into_iter()
            .nth(block.index)
            .ok_or_else(|| StoreError::BlockMissing {
                path: path.to_path_buf(),
                number,
            })?;
        if current.raw != block.raw {
            return Err(StoreError::Stale {
                path: path.to_path_buf(),
                number,
            });
        }
        tracing::debug!(path = %path.display(), number, "saving tracker block");
        Ok(splice_tracker(&contents, &current, tracker))
    })
}
