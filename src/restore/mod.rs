//! Restore pipeline: discover → select → extract → import

mod pipeline;
mod types;

pub use pipeline::RestorePipeline;
pub use types::{ArchiveCandidate, RestoreReport, RestoreRequest, is_archive_name};
