//! Backup creation

use super::types::{BackupReport, BackupRequest, local_now};
use crate::archive::calculate_file_hash;
use crate::callbacks::BackupCallback;
use crate::error::{Error, Result, create_dir};
use crate::manager::BackupManager;
use crate::prefs::export_to_file;
use crate::staging::StagingArea;
use crate::upload::UploadStage;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// One backup run bound to a manager's collaborators
pub struct BackupPipeline<'a> {
    pub(crate) manager: &'a BackupManager,
    pub(crate) request: BackupRequest,
}

impl<'a> BackupPipeline<'a> {
    /// Create a new backup pipeline
    pub fn new(manager: &'a BackupManager, request: BackupRequest) -> Self {
        Self { manager, request }
    }

    /// The request this pipeline runs
    #[must_use]
    pub fn request(&self) -> &BackupRequest {
        &self.request
    }

    /// Write the archive into the target directory
    ///
    /// The staging directory under the target is removed whether or not the
    /// run succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoArtifacts` when nothing was selected (no archive is
    /// written), or the first I/O, export or archive error.
    pub fn create(&self) -> Result<BackupReport> {
        self.create_at(local_now())
    }

    /// Same as [`create`](Self::create) with an explicit start time for naming
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub fn create_at(&self, now: OffsetDateTime) -> Result<BackupReport> {
        let target = &self.request.target_dir;
        info!("📦 Creating backup in {}", target.display());

        create_dir(target)?;
        let staging = StagingArea::new(target);

        let outcome = self.stage_and_pack(&staging, now);
        if let Err(e) = staging.teardown() {
            warn!("Failed to clean up {}: {e}", staging.path().display());
        }

        let report = outcome?;
        info!(
            "✅ Backup created: {} ({} files, {} bytes)",
            report.archive.display(),
            report.file_count,
            report.size_bytes
        );
        Ok(report)
    }

    /// Run the whole chain and report through `callback`
    ///
    /// `on_backup_success` fires once the archive exists unless it is about
    /// to be deleted after upload. With upload enabled, exactly one of
    /// `on_upload_success` or `on_backup_error` follows.
    pub fn execute(&self, callback: &dyn BackupCallback) {
        let report = match self.create() {
            Ok(report) => report,
            Err(e) => {
                error!("❌ Backup failed: {e}");
                callback.on_backup_error(e);
                return;
            }
        };

        let upload = &self.request.upload;
        if !(upload.enabled && upload.delete_local_after_upload) {
            callback.on_backup_success(&report.archive);
        }

        if !upload.enabled {
            return;
        }

        let stage = UploadStage::new(
            self.manager.object_storage.as_deref(),
            self.manager.link_shortener.as_deref(),
            upload,
            &self.request.target_dir,
        );
        match stage.run(&report.archive) {
            Ok(url) => {
                info!("☁️ Backup uploaded: {url}");
                callback.on_upload_success(&url);
            }
            Err(e) => {
                error!("❌ Upload failed: {e}");
                callback.on_backup_error(e);
            }
        }
    }

    fn stage_and_pack(&self, staging: &StagingArea, now: OffsetDateTime) -> Result<BackupReport> {
        staging.prepare()?;

        let files = self.export_artifacts(staging.path())?;

        let archive = self.request.target_dir.join(self.request.archive_name(now));
        self.manager.archiver.pack(&files, &archive)?;

        let (sha256, size_bytes) = calculate_file_hash(&archive)?;
        Ok(BackupReport {
            archive,
            sha256,
            size_bytes,
            file_count: files.len(),
        })
    }

    /// Copy every selected artifact into `staging_dir`, preferences first
    fn export_artifacts(&self, staging_dir: &Path) -> Result<Vec<PathBuf>> {
        if self.request.is_empty() {
            return Err(Error::NoArtifacts);
        }

        let resolver = &self.manager.resolver;
        let mut files = Vec::with_capacity(
            self.request.preferences.len() + self.request.databases.len(),
        );

        for store in &self.request.preferences {
            let entries = self.manager.preferences.read_all(store)?;
            let dest = resolver.staged_preferences_path(staging_dir, store);
            export_to_file(store, &entries, &dest)?;
            debug!("📄 Exported preferences: {store} ({} entries)", entries.len());
            files.push(dest);
        }

        for name in &self.request.databases {
            let src = resolver.database_path(name);
            if !src.is_file() {
                return Err(Error::NotFound(format!(
                    "Database '{name}' at {}",
                    src.display()
                )));
            }
            let dest = resolver.staged_database_path(staging_dir, name);
            StagingArea::copy_into(&src, &dest, true)?;
            debug!("📄 Added database: {name}");
            files.push(dest);
        }

        Ok(files)
    }
}
