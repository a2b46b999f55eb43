//! Upload continuation chain
//!
//! upload file → fetch download URL → (shorten) → (delete local backups).
//! Each stage runs only after the previous one succeeded and the first
//! failure is carried to the end unchanged.

use crate::error::{Error, Result};
use crate::remote::{LinkShortener, ObjectStorage};
use log::{debug, info, warn};
use std::path::Path;
use std::time::Duration;

/// Upload retry window handed to the object storage
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_millis(5000);

/// Upload settings of a backup request
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Upload the archive after it is written
    pub enabled: bool,

    /// Remote directory the archive goes into (blank = bucket root)
    pub path_prefix: String,

    /// Delete every file in the backup directory once the upload succeeded
    pub delete_local_after_upload: bool,

    /// Exchange the download URL for a short link
    pub shorten_link: bool,

    /// Domain the short link is created on
    pub link_domain: String,

    /// How long the storage client may keep retrying the upload
    pub max_retry_time: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path_prefix: String::new(),
            delete_local_after_upload: false,
            shorten_link: false,
            link_domain: String::new(),
            max_retry_time: DEFAULT_UPLOAD_TIMEOUT,
        }
    }
}

impl UploadConfig {
    /// Upload enabled, stored under `path_prefix`
    #[must_use]
    pub fn to_prefix(path_prefix: impl Into<String>) -> Self {
        Self {
            enabled: true,
            path_prefix: path_prefix.into(),
            ..Default::default()
        }
    }

    /// Delete the local backups after a successful upload
    ///
    /// This removes **every file** in the backup directory, including older
    /// archives that were never uploaded.
    #[must_use]
    pub fn delete_local_after_upload(mut self, delete: bool) -> Self {
        self.delete_local_after_upload = delete;
        self
    }

    /// Shorten the download URL on `domain`
    #[must_use]
    pub fn shorten_link(mut self, domain: impl Into<String>) -> Self {
        self.shorten_link = true;
        self.link_domain = domain.into();
        self
    }

    /// Remote key for an archive file name
    #[must_use]
    pub fn remote_key(&self, file_name: &str) -> String {
        let prefix = self.path_prefix.trim().trim_matches('/');
        if prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{prefix}/{file_name}")
        }
    }
}

/// One upload run over the injected remote collaborators
pub struct UploadStage<'a> {
    pub(crate) storage: Option<&'a dyn ObjectStorage>,
    pub(crate) shortener: Option<&'a dyn LinkShortener>,
    pub(crate) config: &'a UploadConfig,
    /// Directory emptied by `delete_local_after_upload`
    pub(crate) backup_root: &'a Path,
}

impl<'a> UploadStage<'a> {
    pub fn new(
        storage: Option<&'a dyn ObjectStorage>,
        shortener: Option<&'a dyn LinkShortener>,
        config: &'a UploadConfig,
        backup_root: &'a Path,
    ) -> Self {
        Self {
            storage,
            shortener,
            config,
            backup_root,
        }
    }

    /// Upload `archive` and return the link to hand out
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's error; `Error::Upload` if a needed
    /// collaborator is not configured.
    pub fn run(&self, archive: &Path) -> Result<String> {
        let url = self.upload_and_link(archive)?;

        if self.config.delete_local_after_upload {
            delete_local_backups(self.backup_root);
        }

        Ok(url)
    }

    fn upload_and_link(&self, archive: &Path) -> Result<String> {
        let storage = self
            .storage
            .ok_or_else(|| Error::Upload("No object storage configured".into()))?;

        let file_name = archive
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| Error::Upload(format!("'{}' has no file name", archive.display())))?;
        let key = self.config.remote_key(&file_name);

        info!("☁️ Uploading {} as {key}", archive.display());
        let object = storage.put(archive, &key, self.config.max_retry_time)?;
        let url = storage.download_url(&object)?;
        debug!("Download URL for {key}: {url}");

        if !self.config.shorten_link {
            return Ok(url);
        }

        let shortener = self
            .shortener
            .ok_or_else(|| Error::Upload("No link shortener configured".into()))?;
        let short = shortener.shorten(&url, &self.config.link_domain)?;
        debug!("Short link for {key}: {short}");
        Ok(short)
    }
}

/// Delete every file directly inside the backup directory
///
/// Not limited to the uploaded archive: older backups go too. Failures are
/// logged and skipped.
pub fn delete_local_backups(backup_root: &Path) {
    let files = match crate::error::list_files(backup_root) {
        Ok(files) => files,
        Err(e) => {
            warn!("Cannot list {} for cleanup: {e}", backup_root.display());
            return;
        }
    };

    for file in files {
        match std::fs::remove_file(&file) {
            Ok(()) => debug!("Deleted local backup {}", file.display()),
            Err(e) => warn!("Failed to delete local backup {}: {e}", file.display()),
        }
    }
}
