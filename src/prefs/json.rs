//! JSON-file preference store
//!
//! Each store lives in `<dir>/<name>.json`. Writes go through a temp file
//! and a rename so a crash mid-restore never leaves half a store behind.

use super::{PreferenceStore, Preferences};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Preference stores persisted as one JSON file per store
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    dir: PathBuf,
    /// Pretty print JSON output
    pretty: bool,
}

impl JsonPreferenceStore {
    /// Create a store rooted at `dir` (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pretty: true,
        }
    }

    /// Write compact JSON (no pretty printing)
    #[must_use]
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Directory holding the store files
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing the named store
    #[must_use]
    pub fn store_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    fn serialize(&self, entries: &Preferences) -> Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(entries).map_err(Error::from)
        } else {
            serde_json::to_string(entries).map_err(Error::from)
        }
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn read_all(&self, name: &str) -> Result<Preferences> {
        let path = self.store_path(name);
        if !path.exists() {
            return Ok(Preferences::new());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| Error::FileRead {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Deserialization(format!("{}: {e}", path.display())))
    }

    fn clear_and_write(&self, name: &str, entries: &Preferences) -> Result<()> {
        let content = self.serialize(entries)?;
        crate::error::create_dir(&self.dir)?;

        let path = self.store_path(name);
        let temp_path = self.dir.join(format!("{name}.json.tmp"));

        std::fs::write(&temp_path, &content).map_err(|e| Error::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &path).map_err(|e| Error::FileWrite {
            path: path.clone(),
            source: e,
        })
    }
}
