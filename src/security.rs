//! Owner-only permissions for staged artifacts
//!
//! Preference exports can carry tokens and other secrets while they sit in
//! the staging directory, so the directory and the export files are locked
//! down to the current user. On Windows these helpers only create the
//! directory; access there is governed by ACLs.

use crate::error::{Error, Result};
use std::path::Path;

/// Restrict a staged file to its owner (Unix: 0o600)
///
/// # Errors
///
/// Returns `Error::FileRead` if the metadata cannot be read and
/// `Error::FileWrite` if the permissions cannot be changed.
#[cfg(unix)]
pub fn restrict_file(path: &Path) -> Result<()> {
    set_mode(path, 0o600)
}

/// Restrict a staging directory to its owner (Unix: 0o700)
///
/// # Errors
///
/// Same as [`restrict_file`].
#[cfg(unix)]
pub fn restrict_dir(path: &Path) -> Result<()> {
    set_mode(path, 0o700)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut perms = metadata.permissions();
    perms.set_mode(mode);

    fs::set_permissions(path, perms).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(not(unix))]
pub fn restrict_file(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(not(unix))]
pub fn restrict_dir(_path: &Path) -> Result<()> {
    Ok(())
}

/// Create a directory (and parents) that only the owner can enter
///
/// # Errors
///
/// Returns `Error::DirectoryCreate` if the directory cannot be created, or
/// the errors of [`restrict_dir`].
pub fn create_private_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreate {
        path: path.to_path_buf(),
        source: e,
    })?;

    restrict_dir(path)
}
