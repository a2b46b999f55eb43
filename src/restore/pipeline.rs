//! Restore logic

use super::types::{ArchiveCandidate, RestoreReport, RestoreRequest};
use crate::callbacks::{CandidateSelector, RestoreCallback};
use crate::database::is_database_file;
use crate::error::{Error, Result, create_dir, list_files, remove_file};
use crate::manager::BackupManager;
use crate::prefs::import_from_file;
use crate::resolver::{
    PREFERENCES_SUFFIX, WildcardPattern, find_files, preferences_file_name, store_name_from_file,
};
use crate::staging::StagingArea;
use log::{debug, error, info, warn};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// One restore run bound to a manager's collaborators
pub struct RestorePipeline<'a> {
    pub(crate) manager: &'a BackupManager,
    pub(crate) request: RestoreRequest,
}

impl<'a> RestorePipeline<'a> {
    /// Create a new restore pipeline
    pub fn new(manager: &'a BackupManager, request: RestoreRequest) -> Self {
        Self { manager, request }
    }

    /// The request this pipeline runs
    #[must_use]
    pub fn request(&self) -> &RestoreRequest {
        &self.request
    }

    /// List the archives in the source directory, sorted by name
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the source directory does not exist or
    /// holds no archive.
    pub fn discover(&self) -> Result<Vec<ArchiveCandidate>> {
        let source = &self.request.source_dir;
        ensure_dir(source)?;

        let mut candidates: Vec<ArchiveCandidate> = list_files(source)?
            .iter()
            .filter_map(|path| ArchiveCandidate::from_path(path))
            .collect();

        if candidates.is_empty() {
            return Err(Error::NotFound(format!(
                "No backups found in {}",
                source.display()
            )));
        }

        candidates.sort();
        debug!("Found {} backup(s) in {}", candidates.len(), source.display());
        Ok(candidates)
    }

    /// Extract `archive`, import the requested artifacts and delete it
    ///
    /// Preferences are imported before databases and the first failure stops
    /// the run. The staging directory is removed on every path. A failure to
    /// delete the archive afterwards is only logged.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for a missing source directory, archive,
    /// named artifact, or a wildcard without matches; otherwise the archive,
    /// decoding or I/O error that stopped the run.
    pub fn restore(&self, archive: &Path) -> Result<RestoreReport> {
        info!("♻️ Restoring from backup: {}", archive.display());

        ensure_dir(&self.request.source_dir)?;
        if !archive.is_file() {
            return Err(Error::NotFound(format!("Backup {}", archive.display())));
        }

        let staging = StagingArea::new(&self.request.source_dir);
        let outcome = self.extract_and_import(&staging, archive);
        if let Err(e) = staging.teardown() {
            warn!("Failed to clean up {}: {e}", staging.path().display());
        }

        let report = outcome?;
        info!(
            "✅ Restore complete: {} preference store(s), {} database(s)",
            report.preferences.len(),
            report.databases.len()
        );
        Ok(report)
    }

    /// Discover, select and restore, reporting through `callback`
    ///
    /// A single candidate is restored without asking `selector`. When the
    /// selector declines, the run ends without a callback.
    pub fn execute(&self, selector: &dyn CandidateSelector, callback: &dyn RestoreCallback) {
        let archive = match &self.request.archive {
            Some(archive) => archive.clone(),
            None => match self.choose(selector) {
                Ok(Some(archive)) => archive,
                Ok(None) => {
                    info!("Restore cancelled: no backup selected");
                    return;
                }
                Err(e) => {
                    error!("❌ Restore failed: {e}");
                    callback.on_restore_error(e);
                    return;
                }
            },
        };

        match self.restore(&archive) {
            Ok(_) => callback.on_restore_success(),
            Err(e) => {
                error!("❌ Restore failed: {e}");
                callback.on_restore_error(e);
            }
        }
    }

    fn choose(&self, selector: &dyn CandidateSelector) -> Result<Option<PathBuf>> {
        let mut candidates = self.discover()?;
        if candidates.len() == 1 {
            return Ok(candidates.pop().map(|c| c.path));
        }

        Ok(selector
            .select(&candidates)
            .filter(|&index| index < candidates.len())
            .map(|index| candidates.swap_remove(index).path))
    }

    fn extract_and_import(&self, staging: &StagingArea, archive: &Path) -> Result<RestoreReport> {
        staging.prepare()?;
        self.manager.archiver.unpack(archive, staging.path())?;

        let mut report = RestoreReport {
            archive: archive.to_path_buf(),
            ..Default::default()
        };
        self.import_preferences(staging.path(), &mut report)?;
        self.import_databases(staging, &mut report)?;

        match remove_file(archive) {
            Ok(()) => debug!("Removed restored backup {}", archive.display()),
            Err(e) => warn!("Restored backup could not be deleted: {e}"),
        }

        Ok(report)
    }

    fn import_preferences(&self, staging_dir: &Path, report: &mut RestoreReport) -> Result<()> {
        for pattern in &self.request.preferences {
            let files = resolve_staged(staging_dir, pattern, ArtifactKind::Preferences)?;

            for file in files {
                let file_name = file_name_of(&file);
                let store = store_name_from_file(&file_name);
                let entries = import_from_file(&file)?;
                self.manager.preferences.clear_and_write(store, &entries)?;
                debug!("Restored preferences {store} ({} entries)", entries.len());
                report.preferences.push(store.to_string());
            }
        }
        Ok(())
    }

    fn import_databases(&self, staging: &StagingArea, report: &mut RestoreReport) -> Result<()> {
        let staged = if self.request.databases.is_empty() {
            staging
                .files()?
                .into_iter()
                .filter(|path| is_database_file(path))
                .collect()
        } else {
            let mut staged = Vec::new();
            for pattern in &self.request.databases {
                staged.extend(resolve_staged(staging.path(), pattern, ArtifactKind::Database)?);
            }
            staged
        };

        if staged.is_empty() {
            return Ok(());
        }

        let dest_dir = self.manager.resolver.database_dir();
        create_dir(&dest_dir)?;

        for file in staged {
            let name = file_name_of(&file);
            StagingArea::copy_into(&file, &dest_dir.join(&name), true)?;
            debug!("Restored database {name}");
            report.databases.push(name);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum ArtifactKind {
    Preferences,
    Database,
}

impl ArtifactKind {
    fn label(self) -> &'static str {
        match self {
            ArtifactKind::Preferences => "Preferences",
            ArtifactKind::Database => "Database",
        }
    }

    /// Staged file name for a literal request name
    fn literal_file(self, name: &str) -> String {
        match self {
            ArtifactKind::Preferences => preferences_file_name(name),
            ArtifactKind::Database => name.to_string(),
        }
    }

    /// Whether a wildcard match may be imported as this kind
    fn accepts(self, file_name: &str) -> bool {
        match self {
            ArtifactKind::Preferences => file_name.ends_with(PREFERENCES_SUFFIX),
            ArtifactKind::Database => !file_name.ends_with(PREFERENCES_SUFFIX),
        }
    }
}

/// Staged files for a literal name or a wildcard pattern
fn resolve_staged(staging_dir: &Path, pattern: &str, kind: ArtifactKind) -> Result<Vec<PathBuf>> {
    match WildcardPattern::parse(pattern)? {
        WildcardPattern::Literal(name) => {
            let file_name = kind.literal_file(&name);
            let is_plain_name = Path::new(&file_name).file_name() == Some(OsStr::new(&file_name));
            let path = staging_dir.join(&file_name);
            if is_plain_name && path.is_file() {
                Ok(vec![path])
            } else {
                Err(Error::NotFound(format!("{} '{name}' in backup", kind.label())))
            }
        }
        _ => {
            let mut found = find_files(staging_dir, pattern)?;
            found.retain(|path| kind.accepts(&file_name_of(path)));
            if found.is_empty() {
                return Err(Error::NotFound(format!(
                    "{} matching '{pattern}' in backup",
                    kind.label()
                )));
            }
            Ok(found)
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(Error::NotFound(format!("Directory {}", dir.display())))
    }
}
