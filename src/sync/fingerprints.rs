//! Persistent content-fingerprint store.
//!
//! Maps vault-relative note paths to the hash of their last-indexed
//! content. The mapping is a JSON object in the assistant data directory
//! and must survive process restarts; saving goes through a temp file and
//! an atomic rename so a crash mid-write can never corrupt the previous
//! state.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::Result;

/// Mapping from vault-relative path to last-indexed content hash.
///
/// A `BTreeMap` keeps the serialized file deterministic.
pub type FingerprintMap = BTreeMap<String, String>;

/// Durable storage for the fingerprint mapping.
#[derive(Debug, Clone)]
pub struct FingerprintStore {
    path: PathBuf,
}

impl FingerprintStore {
    /// Create a store persisting at the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the persistence path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted mapping.
    ///
    /// A missing file is the fresh-start case and yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<FingerprintMap> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No fingerprint file, starting empty");
                return Ok(FingerprintMap::new());
            }
            Err(e) => {
                return Err(StoreError::Corrupt {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                }
                .into())
            }
        };

        let map = serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(map)
    }

    /// Persist the mapping atomically.
    ///
    /// Writes to `<path>.tmp`, fsyncs, then renames over the target, so
    /// readers only ever observe the old or the new complete file.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp file cannot be written or the rename
    /// fails; the previously persisted state is left intact in that case.
    pub fn save(&self, map: &FingerprintMap) -> Result<()> {
        let persist_err = |e: &dyn std::fmt::Display| StoreError::Persist {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| persist_err(&e))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");

        let mut file = std::fs::File::create(&tmp_path).map_err(|e| persist_err(&e))?;
        let json = serde_json::to_vec_pretty(map).map_err(|e| persist_err(&e))?;
        file.write_all(&json).map_err(|e| persist_err(&e))?;
        file.sync_all().map_err(|e| persist_err(&e))?;
        drop(file);

        std::fs::rename(&tmp_path, &self.path).map_err(|e| persist_err(&e))?;

        tracing::debug!(
            path = %self.path.display(),
            entries = map.len(),
            "Fingerprint mapping persisted"
        );

        Ok(())
    }
}
