//! Builder for BackupManager
//!
//! This module contains [`BackupManagerBuilder`] which provides a fluent API
//! for creating a [`BackupManager`](super::BackupManager).

use super::BackupManager;
use crate::archive::{Archiver, ZipArchiver};
use crate::database::{DatabaseLocator, DirectoryDatabaseLocator};
use crate::error::{Error, Result};
use crate::prefs::PreferenceStore;
use crate::remote::{LinkShortener, ObjectStorage};
use crate::resolver::ArtifactResolver;
use std::path::PathBuf;
use std::sync::Arc;

/// Default directory preference files are reported under
pub const DEFAULT_PREFERENCES_ROOT: &str = "shared_prefs";

/// Builder for creating a [`BackupManager`] with a fluent API.
///
/// A preference store and a database location are required; the archiver
/// defaults to [`ZipArchiver`] and uploads stay unavailable until an
/// [`ObjectStorage`] is supplied.
///
/// # Example
///
/// ```rust,no_run
/// use statepack::{BackupManager, JsonPreferenceStore, LocalObjectStorage};
///
/// let manager = BackupManager::builder()
///     .preferences(JsonPreferenceStore::new("/data/app/prefs"))
///     .database_dir("/data/app/databases")
///     .object_storage(LocalObjectStorage::new("/mnt/share"))
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct BackupManagerBuilder {
    preferences_root: Option<PathBuf>,
    preferences: Option<Arc<dyn PreferenceStore>>,
    databases: Option<Arc<dyn DatabaseLocator>>,
    archiver: Option<Arc<dyn Archiver>>,
    object_storage: Option<Arc<dyn ObjectStorage>>,
    link_shortener: Option<Arc<dyn LinkShortener>>,
}

impl BackupManagerBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory preference files are named under (default: "shared_prefs").
    #[must_use]
    pub fn preferences_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.preferences_root = Some(path.into());
        self
    }

    /// Set the preference store to export from and import into.
    #[must_use]
    pub fn preferences(self, store: impl PreferenceStore + 'static) -> Self {
        self.shared_preferences(Arc::new(store))
    }

    /// Set a preference store that is shared with the host application.
    #[must_use]
    pub fn shared_preferences(mut self, store: Arc<dyn PreferenceStore>) -> Self {
        self.preferences = Some(store);
        self
    }

    /// Set how database names map to files.
    #[must_use]
    pub fn databases(mut self, locator: impl DatabaseLocator + 'static) -> Self {
        self.databases = Some(Arc::new(locator));
        self
    }

    /// Keep all databases as files directly inside `dir`.
    #[must_use]
    pub fn database_dir(self, dir: impl Into<PathBuf>) -> Self {
        self.databases(DirectoryDatabaseLocator::new(dir))
    }

    /// Replace the default zip archiver.
    #[must_use]
    pub fn archiver(mut self, archiver: impl Archiver + 'static) -> Self {
        self.archiver = Some(Arc::new(archiver));
        self
    }

    /// Enable uploads through `storage`.
    #[must_use]
    pub fn object_storage(mut self, storage: impl ObjectStorage + 'static) -> Self {
        self.object_storage = Some(Arc::new(storage));
        self
    }

    /// Enable link shortening through `shortener`.
    #[must_use]
    pub fn link_shortener(mut self, shortener: impl LinkShortener + 'static) -> Self {
        self.link_shortener = Some(Arc::new(shortener));
        self
    }

    /// Build the manager.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no preference store or database location
    /// was set.
    pub fn build(self) -> Result<BackupManager> {
        let preferences = self
            .preferences
            .ok_or_else(|| Error::Config("a preference store is required".into()))?;
        let databases = self
            .databases
            .ok_or_else(|| Error::Config("a database location is required".into()))?;

        let preferences_root = self
            .preferences_root
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFERENCES_ROOT));

        Ok(BackupManager {
            preferences,
            resolver: ArtifactResolver::new(preferences_root, databases),
            archiver: self
                .archiver
                .unwrap_or_else(|| Arc::new(ZipArchiver::new())),
            object_storage: self.object_storage,
            link_shortener: self.link_shortener,
        })
    }
}
