//! The collaborator bundle every pipeline runs against
//!
//! [`BackupManager`] holds the injected preference store, database locator,
//! archiver and the optional remote clients. It is cheap to clone, so a copy
//! can be moved onto a worker thread with [`BackupManager::spawn_backup`] or
//! [`BackupManager::spawn_restore`].

mod builder;

pub use builder::BackupManagerBuilder;

use crate::archive::Archiver;
use crate::backup::{BackupPipeline, BackupRequest};
use crate::callbacks::{BackupCallback, CandidateSelector, RestoreCallback};
use crate::prefs::PreferenceStore;
use crate::remote::{LinkShortener, ObjectStorage};
use crate::resolver::ArtifactResolver;
use crate::restore::{RestorePipeline, RestoreRequest};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Entry point for backups and restores
#[derive(Clone)]
pub struct BackupManager {
    pub(crate) preferences: Arc<dyn PreferenceStore>,
    pub(crate) resolver: ArtifactResolver,
    pub(crate) archiver: Arc<dyn Archiver>,
    pub(crate) object_storage: Option<Arc<dyn ObjectStorage>>,
    pub(crate) link_shortener: Option<Arc<dyn LinkShortener>>,
}

impl BackupManager {
    /// Start configuring a manager
    #[must_use]
    pub fn builder() -> BackupManagerBuilder {
        BackupManagerBuilder::new()
    }

    /// Path mapping used to stage artifacts
    #[must_use]
    pub fn resolver(&self) -> &ArtifactResolver {
        &self.resolver
    }

    /// Whether an object storage client was injected
    #[must_use]
    pub fn can_upload(&self) -> bool {
        self.object_storage.is_some()
    }

    /// Pipeline for one backup run
    #[must_use]
    pub fn backup(&self, request: BackupRequest) -> BackupPipeline<'_> {
        BackupPipeline::new(self, request)
    }

    /// Pipeline for one restore run
    #[must_use]
    pub fn restore(&self, request: RestoreRequest) -> RestorePipeline<'_> {
        RestorePipeline::new(self, request)
    }

    /// Run [`BackupPipeline::execute`] on a new thread
    ///
    /// Runs sharing a target directory must not overlap; join the handle
    /// before starting the next one.
    pub fn spawn_backup(
        &self,
        request: BackupRequest,
        callback: Arc<dyn BackupCallback>,
    ) -> JoinHandle<()> {
        let manager = self.clone();
        std::thread::spawn(move || manager.backup(request).execute(callback.as_ref()))
    }

    /// Run [`RestorePipeline::execute`] on a new thread
    pub fn spawn_restore(
        &self,
        request: RestoreRequest,
        selector: Arc<dyn CandidateSelector>,
        callback: Arc<dyn RestoreCallback>,
    ) -> JoinHandle<()> {
        let manager = self.clone();
        std::thread::spawn(move || {
            manager
                .restore(request)
                .execute(selector.as_ref(), callback.as_ref());
        })
    }
}

impl std::fmt::Debug for BackupManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupManager")
            .field("resolver", &self.resolver)
            .field("can_upload", &self.object_storage.is_some())
            .field("can_shorten", &self.link_shortener.is_some())
            .finish_non_exhaustive()
    }
}
