//! Backup request and report types

use crate::upload::UploadConfig;
use std::collections::BTreeSet;
use std::path::PathBuf;
use time::OffsetDateTime;

/// Archive suffixes accepted as-is; anything else gets `.zip` appended
pub const ARCHIVE_SUFFIXES: &[&str] = &[".zip", ".rar"];

/// Options for one backup run
#[derive(Debug, Clone)]
pub struct BackupRequest {
    /// Directory the archive is written to (also the staging root)
    pub target_dir: PathBuf,

    /// Archive file name; generated from the current time when absent or blank
    pub name: Option<String>,

    /// Preference stores to export
    pub preferences: BTreeSet<String>,

    /// Database names to copy
    pub databases: BTreeSet<String>,

    /// What happens after the archive is written
    pub upload: UploadConfig,
}

impl Default for BackupRequest {
    fn default() -> Self {
        Self {
            target_dir: default_backup_dir(),
            name: None,
            preferences: BTreeSet::new(),
            databases: BTreeSet::new(),
            upload: UploadConfig::default(),
        }
    }
}

impl BackupRequest {
    /// Create a request writing into `target_dir`
    ///
    /// # Example
    /// ```rust
    /// use statepack::{BackupRequest, UploadConfig};
    ///
    /// let request = BackupRequest::new("/sdcard/Backups")
    ///     .name("before-update")
    ///     .preferences("app_prefs")
    ///     .database("orders.db")
    ///     .upload(UploadConfig::to_prefix("acme/seller-7").shorten_link("acme.page.link"));
    /// assert!(request.upload.enabled);
    /// ```
    #[must_use]
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            ..Default::default()
        }
    }

    /// Set the archive name (the `.zip` suffix is optional)
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a preference store to the backup
    #[must_use]
    pub fn preferences(mut self, store: impl Into<String>) -> Self {
        self.preferences.insert(store.into());
        self
    }

    /// Add a database to the backup
    #[must_use]
    pub fn database(mut self, name: impl Into<String>) -> Self {
        self.databases.insert(name.into());
        self
    }

    /// Configure the upload step
    #[must_use]
    pub fn upload(mut self, upload: UploadConfig) -> Self {
        self.upload = upload;
        self
    }

    /// Whether nothing at all was selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty() && self.databases.is_empty()
    }

    /// Final archive file name for a run started at `now`
    #[must_use]
    pub fn archive_name(&self, now: OffsetDateTime) -> String {
        let base = match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => auto_archive_name(now),
        };

        if ARCHIVE_SUFFIXES.iter().any(|suffix| base.ends_with(suffix)) {
            base
        } else {
            format!("{base}.zip")
        }
    }
}

/// `Backup_<yyyy_MM_dd_HH_mm_ss>` for `now` (no suffix)
#[must_use]
pub fn auto_archive_name(now: OffsetDateTime) -> String {
    format!(
        "Backup_{:04}_{:02}_{:02}_{:02}_{:02}_{:02}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

/// Current local time, falling back to UTC when the offset is unknown
#[must_use]
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// `<documents or home>/Backups`, or `./Backups` if neither is known
#[must_use]
pub fn default_backup_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Backups")
}

/// What a finished backup produced
#[derive(Debug, Clone)]
pub struct BackupReport {
    /// The archive written to the target directory
    pub archive: PathBuf,

    /// SHA-256 of the archive
    pub sha256: String,

    /// Archive size in bytes
    pub size_bytes: u64,

    /// Number of files packed
    pub file_count: usize,
}
