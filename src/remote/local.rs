//! Filesystem-backed object storage

use super::{ObjectStorage, RemoteObject, retry_within};
use crate::error::{Error, Result};
use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Object storage rooted at a local directory
///
/// Keys map to relative paths under the root and URLs use the `file://`
/// scheme. Useful for tests, demos and hosts that sync a directory
/// elsewhere.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path an object key is stored at
    #[must_use]
    pub fn object_path(&self, key: &str) -> PathBuf {
        key.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

fn is_transient(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
    )
}

impl ObjectStorage for LocalObjectStorage {
    fn put(&self, local: &Path, key: &str, max_retry_time: Duration) -> Result<RemoteObject> {
        if key.split('/').any(|part| part == "..") {
            return Err(Error::Upload(format!("Invalid object key '{key}'")));
        }

        let dest = self.object_path(key);
        if let Some(parent) = dest.parent() {
            crate::error::create_dir(parent)?;
        }

        let size_bytes = retry_within(max_retry_time, INITIAL_RETRY_DELAY, is_transient, || {
            std::fs::copy(local, &dest)
        })
        .map_err(|e| Error::Upload(format!("Failed to store '{key}': {e}")))?;

        debug!("Stored {} as {key} ({size_bytes} bytes)", local.display());
        Ok(RemoteObject {
            key: key.to_string(),
            size_bytes,
        })
    }

    fn download_url(&self, object: &RemoteObject) -> Result<String> {
        let path = self.object_path(&object.key);
        if !path.is_file() {
            return Err(Error::Upload(format!("Object '{}' does not exist", object.key)));
        }
        let absolute = path.canonicalize().map_err(|e| Error::FileRead {
            path: path.clone(),
            source: e,
        })?;
        Ok(format!("file://{}", absolute.display()))
    }
}
