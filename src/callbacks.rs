//! Result surface of the pipelines
//!
//! Pipelines never hand errors back to the thread that drives them through
//! `execute`; every outcome is delivered exactly once through one of these
//! traits instead.

use crate::error::Error;
use crate::restore::ArchiveCandidate;
use std::path::Path;

/// Receives the outcome of a backup run and of its optional upload
pub trait BackupCallback: Send + Sync {
    /// The local archive was written (suppressed when it is deleted after upload)
    fn on_backup_success(&self, archive: &Path);

    /// The archive was uploaded; `url` is the download or short link
    fn on_upload_success(&self, url: &str);

    /// The backup or the upload failed
    fn on_backup_error(&self, error: Error);
}

/// Receives the outcome of a restore run
pub trait RestoreCallback: Send + Sync {
    fn on_restore_success(&self);

    fn on_restore_error(&self, error: Error);
}

/// Picks one archive when discovery finds several
pub trait CandidateSelector: Send + Sync {
    /// Index into `candidates`, or `None` to abandon the restore
    fn select(&self, candidates: &[ArchiveCandidate]) -> Option<usize>;
}

/// Selector that always takes the newest-named (last sorted) candidate
#[derive(Debug, Clone, Copy, Default)]
pub struct LatestCandidate;

impl CandidateSelector for LatestCandidate {
    fn select(&self, candidates: &[ArchiveCandidate]) -> Option<usize> {
        candidates.len().checked_sub(1)
    }
}

impl<F> CandidateSelector for F
where
    F: Fn(&[ArchiveCandidate]) -> Option<usize> + Send + Sync,
{
    fn select(&self, candidates: &[ArchiveCandidate]) -> Option<usize> {
        self(candidates)
    }
}
