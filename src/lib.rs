//! # statepack - point-in-time app state backups
//!
//! Snapshot an application's preference stores and embedded database files
//! into a single zip archive, restore them later, and optionally push the
//! archive to object storage and hand out a (shortened) download link.
//!
//! ## Features
//!
//! - **Backup**: Export preference stores to a portable, typed document and
//!   copy database files, then pack everything into one flat archive
//! - **Restore**: Discover archives, let the caller pick one, and import
//!   preferences and databases by name or wildcard (`*x`, `x*`, `*x*`)
//! - **Upload chain**: upload → download URL → short link → optional local
//!   cleanup, each stage running only after the previous one succeeded
//! - **Injected collaborators**: preference store, database locator,
//!   archiver, object storage and link shortener are all traits
//! - **Callbacks**: every run reports exactly once through a callback trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use statepack::{BackupManager, BackupRequest, JsonPreferenceStore, RestoreRequest};
//!
//! let manager = BackupManager::builder()
//!     .preferences(JsonPreferenceStore::new("/data/my-app/prefs"))
//!     .database_dir("/data/my-app/databases")
//!     .build()?;
//!
//! let report = manager
//!     .backup(
//!         BackupRequest::new("/sdcard/Backups")
//!             .preferences("app_prefs")
//!             .database("orders.db"),
//!     )
//!     .create()?;
//! println!("wrote {} ({})", report.archive.display(), report.sha256);
//!
//! manager
//!     .restore(RestoreRequest::new("/sdcard/Backups").preferences("app_*"))
//!     .restore(&report.archive)?;
//! # Ok::<(), statepack::Error>(())
//! ```
//!
//! ## Callbacks and background runs
//!
//! ```rust,no_run
//! use statepack::{
//!     BackupCallback, BackupManager, BackupRequest, Error, LocalObjectStorage,
//!     MemoryPreferenceStore, UploadConfig,
//! };
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! struct Notify;
//!
//! impl BackupCallback for Notify {
//!     fn on_backup_success(&self, archive: &Path) {
//!         println!("saved {}", archive.display());
//!     }
//!     fn on_upload_success(&self, url: &str) {
//!         println!("share {url}");
//!     }
//!     fn on_backup_error(&self, error: Error) {
//!         eprintln!("backup failed: {error}");
//!     }
//! }
//!
//! let manager = BackupManager::builder()
//!     .preferences(MemoryPreferenceStore::new())
//!     .database_dir("/data/my-app/databases")
//!     .object_storage(LocalObjectStorage::new("/mnt/share"))
//!     .build()?;
//!
//! let request = BackupRequest::new("/sdcard/Backups")
//!     .database("orders.db")
//!     .upload(UploadConfig::to_prefix("seller-7"));
//! manager.spawn_backup(request, Arc::new(Notify)).join().ok();
//! # Ok::<(), statepack::Error>(())
//! ```
//!
//! ## Staging
//!
//! Both pipelines stage files in a `temp` directory under the backup
//! directory. Two runs against the same directory at once will collide;
//! callers must serialize them.

// Core modules
mod error;
mod sync;
pub mod security;

// Artifacts
pub mod database;
pub mod prefs;
pub mod resolver;
pub mod staging;

// Archive and remote
pub mod archive;
pub mod remote;
pub mod upload;

// Pipelines
pub mod backup;
pub mod callbacks;
mod manager;
pub mod restore;

// Re-exports from core
pub use error::{Error, Result};
pub use manager::{BackupManager, BackupManagerBuilder};

pub use archive::{Archiver, ZipArchiver};
pub use backup::{BackupPipeline, BackupReport, BackupRequest};
pub use callbacks::{BackupCallback, CandidateSelector, LatestCandidate, RestoreCallback};
pub use database::{DatabaseLocator, DirectoryDatabaseLocator};
pub use prefs::{
    JsonPreferenceStore, MemoryPreferenceStore, PrefValue, PreferenceStore, Preferences,
};
pub use remote::{LinkShortener, LocalObjectStorage, ObjectStorage, RemoteObject};
pub use resolver::{ArtifactResolver, WildcardPattern, find_files};
pub use restore::{ArchiveCandidate, RestorePipeline, RestoreReport, RestoreRequest};
pub use upload::UploadConfig;
