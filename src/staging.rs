//! Private working directory for one pipeline run
//!
//! Every backup and restore stages its files in `<root>/temp`. The
//! directory is wiped before use and removed again when the
//! [`StagingArea`] is torn down, which also happens on drop so that error
//! returns and panics clean up the same way success does.
//!
//! Two runs against the same root share the same `temp` directory and will
//! race; callers must serialize them.

use crate::error::{Error, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Name of the staging directory under an operation's root
pub const STAGING_DIR_NAME: &str = "temp";

/// Transient directory owned by a single pipeline run
#[derive(Debug)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    /// Staging area for `root` (nothing is created until [`prepare`](Self::prepare))
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: root.as_ref().join(STAGING_DIR_NAME),
        }
    }

    /// Path of the staging directory
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Delete any leftover staging directory and create a fresh, empty one
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the old directory cannot be removed or the new
    /// one cannot be created.
    pub fn prepare(&self) -> Result<()> {
        self.teardown()?;
        crate::security::create_private_dir(&self.dir)?;
        debug!("Staging directory {} created", self.dir.display());
        Ok(())
    }

    /// Delete every entry of the staging directory, then the directory
    ///
    /// Safe to call when the directory does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileDelete` if an entry or the directory cannot be
    /// removed.
    pub fn teardown(&self) -> Result<()> {
        if !self.dir.exists() {
            return Ok(());
        }

        for entry in crate::error::read_dir(&self.dir)? {
            let entry = entry.map_err(|e| Error::DirectoryRead {
                path: self.dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            let removed = if path.is_dir() {
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };
            removed.map_err(|e| Error::FileDelete {
                path: path.clone(),
                source: e,
            })?;
            debug!("Removed staged {}", path.display());
        }

        std::fs::remove_dir(&self.dir).map_err(|e| Error::FileDelete {
            path: self.dir.clone(),
            source: e,
        })?;
        debug!("Staging directory {} removed", self.dir.display());
        Ok(())
    }

    /// Copy `src` to `dest`, skipping only when `dest` exists and `overwrite` is off
    ///
    /// Returns whether the file was copied.
    pub fn copy_into(src: &Path, dest: &Path, overwrite: bool) -> Result<bool> {
        if dest.exists() && !overwrite {
            debug!("{} already exists, skipping", dest.display());
            return Ok(false);
        }
        crate::error::copy_file(src, dest)?;
        Ok(true)
    }

    /// Regular files currently staged, sorted by name
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut files = crate::error::list_files(&self.dir)?;
        files.sort();
        Ok(files)
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            warn!("Failed to clean up staging directory {}: {e}", self.dir.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_prepare_wipes_leftovers() {
        let root = tempdir().unwrap();
        let leftover = root.path().join(STAGING_DIR_NAME);
        fs::create_dir_all(leftover.join("nested")).unwrap();
        fs::write(leftover.join("old.db"), b"old").unwrap();

        let staging = StagingArea::new(root.path());
        staging.prepare().unwrap();

        assert!(staging.path().is_dir());
        assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let root = tempdir().unwrap();
        let staging = StagingArea::new(root.path());

        staging.teardown().unwrap();
        staging.prepare().unwrap();
        fs::write(staging.path().join("prefs.xml"), b"{}").unwrap();
        staging.teardown().unwrap();
        staging.teardown().unwrap();

        assert!(!staging.path().exists());
    }

    #[test]
    fn test_drop_removes_directory() {
        let root = tempdir().unwrap();
        let dir = {
            let staging = StagingArea::new(root.path());
            staging.prepare().unwrap();
            fs::write(staging.path().join("orders.db"), b"rows").unwrap();
            staging.path().to_path_buf()
        };
        assert!(!dir.exists());
    }

    #[test]
    fn test_copy_into_respects_overwrite() {
        let root = tempdir().unwrap();
        let src = root.path().join("src.db");
        let dest = root.path().join("dest.db");
        fs::write(&src, b"new").unwrap();
        fs::write(&dest, b"old").unwrap();

        assert!(!StagingArea::copy_into(&src, &dest, false).unwrap());
        assert_eq!(fs::read(&dest).unwrap(), b"old");

        assert!(StagingArea::copy_into(&src, &dest, true).unwrap());
        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }
}
