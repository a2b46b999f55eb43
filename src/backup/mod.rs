//! Backup pipeline: stage → export → archive → (upload)

mod pipeline;
mod types;

pub use pipeline::BackupPipeline;
pub use types::{BackupReport, BackupRequest, auto_archive_name, default_backup_dir, local_now};
