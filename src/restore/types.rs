//! Restore request and report types

use crate::backup::default_backup_dir;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Markers that make a file in the source directory a restore candidate
const ARCHIVE_MARKERS: &[&str] = &[".zip", ".rar"];

/// Whether a file name looks like a backup archive
///
/// Matches anywhere in the name, so `weekly.zip.old` is a candidate too.
#[must_use]
pub fn is_archive_name(name: &str) -> bool {
    ARCHIVE_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Options for one restore run
#[derive(Debug, Clone)]
pub struct RestoreRequest {
    /// Directory searched for archives (also the staging root)
    pub source_dir: PathBuf,

    /// Preference names or wildcard patterns to import
    pub preferences: BTreeSet<String>,

    /// Database names or wildcard patterns to import; empty imports every
    /// staged database file
    pub databases: BTreeSet<String>,

    /// Restore this archive instead of discovering one
    pub archive: Option<PathBuf>,
}

impl Default for RestoreRequest {
    fn default() -> Self {
        Self {
            source_dir: default_backup_dir(),
            preferences: BTreeSet::new(),
            databases: BTreeSet::new(),
            archive: None,
        }
    }
}

impl RestoreRequest {
    /// Create a request that searches `source_dir`
    ///
    /// # Example
    /// ```rust
    /// use statepack::RestoreRequest;
    ///
    /// let request = RestoreRequest::new("/sdcard/Backups")
    ///     .preferences("app_*")
    ///     .database("*.db");
    /// assert_eq!(request.preferences.len(), 1);
    /// ```
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            ..Default::default()
        }
    }

    /// Import preferences named or matched by `pattern`
    #[must_use]
    pub fn preferences(mut self, pattern: impl Into<String>) -> Self {
        self.preferences.insert(pattern.into());
        self
    }

    /// Import databases named or matched by `pattern`
    #[must_use]
    pub fn database(mut self, pattern: impl Into<String>) -> Self {
        self.databases.insert(pattern.into());
        self
    }

    /// Skip discovery and restore `archive`
    #[must_use]
    pub fn archive(mut self, archive: impl Into<PathBuf>) -> Self {
        self.archive = Some(archive.into());
        self
    }
}

/// An archive found in the source directory
///
/// Candidates order by file name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArchiveCandidate {
    /// File name, used for display and ordering
    pub name: String,

    /// Full path of the archive
    pub path: PathBuf,
}

impl ArchiveCandidate {
    /// Candidate for `path` if its name marks it as an archive
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy();
        is_archive_name(&name).then(|| Self {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
    }
}

/// What a finished restore imported
#[derive(Debug, Clone, Default)]
pub struct RestoreReport {
    /// The archive that was restored (deleted afterwards when possible)
    pub archive: PathBuf,

    /// Preference stores that were replaced
    pub preferences: Vec<String>,

    /// Database files copied into the database directory
    pub databases: Vec<String>,
}
