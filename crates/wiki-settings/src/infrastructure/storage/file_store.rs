//! File-backed settings store.
//!
//! Each record lives in its own file named after its id:
//!
//! ```text
//! <data_dir>/b960e8e5-529f-4f7c-aee4-28eb23e13dbd.json
//! ```
//!
//! The file holds the JSON text exactly as it was handed to
//! [`SettingsStore::store`]; nothing here parses it.

use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::application::manage_settings::{SettingsStore, StoreError};

/// Stores settings records as JSON files in a directory.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    dir: PathBuf,
}

impl FileSettingsStore {
    /// Creates a store rooted at `dir`.  The directory is created on the
    /// first write, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding the record with `id`.
    pub fn record_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl SettingsStore for FileSettingsStore {
    fn fetch(&self, id: Uuid) -> Result<Option<String>, StoreError> {
        let path = self.record_path(id);

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                debug!("read settings record from {}", path.display());
                Ok(Some(content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }

    fn store(&self, id: Uuid, json: &str) -> Result<(), StoreError> {
        // Ensure directory exists before writing.
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.record_path(id);
        std::fs::write(&path, json).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("wrote settings record to {}", path.display());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
