//! Locating the application's embedded database files

use std::path::{Path, PathBuf};

/// File extensions treated as databases when a restore names none
pub const DATABASE_EXTENSIONS: &[&str] = &[".sqlite", ".db"];

/// Maps a database name to the file the host application opens
pub trait DatabaseLocator: Send + Sync {
    /// Directory that holds every database file
    fn database_dir(&self) -> PathBuf;

    /// Absolute path of the named database
    fn database_path(&self, name: &str) -> PathBuf {
        self.database_dir().join(name)
    }
}

/// Databases stored directly inside one directory
#[derive(Debug, Clone)]
pub struct DirectoryDatabaseLocator {
    dir: PathBuf,
}

impl DirectoryDatabaseLocator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DatabaseLocator for DirectoryDatabaseLocator {
    fn database_dir(&self) -> PathBuf {
        self.dir.clone()
    }
}

/// Whether a file name carries a recognized database extension
#[must_use]
pub fn is_database_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .is_some_and(|name| DATABASE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)))
}
