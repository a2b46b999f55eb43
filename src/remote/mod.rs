//! Remote object storage and link shortening collaborators
//!
//! The upload stage only needs two remote capabilities: put a file under a
//! key and get a durable URL for it, plus an optional service that turns
//! that URL into a short link. Both are traits so hosts can plug in their
//! own clients; [`LocalObjectStorage`] is a filesystem-backed stand-in.

mod local;

pub use local::LocalObjectStorage;

use crate::error::Result;
use std::path::Path;
use std::time::{Duration, Instant};

/// Handle to an object stored remotely
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    /// Key the object was stored under (`<prefix>/<file name>`)
    pub key: String,
    /// Size of the uploaded file in bytes
    pub size_bytes: u64,
}

/// Remote object storage client
pub trait ObjectStorage: Send + Sync {
    /// Upload `local` under `key`, retrying transient failures for at most `max_retry_time`
    fn put(&self, local: &Path, key: &str, max_retry_time: Duration) -> Result<RemoteObject>;

    /// Durable URL of an uploaded object
    fn download_url(&self, object: &RemoteObject) -> Result<String>;
}

/// Link shortening service
pub trait LinkShortener: Send + Sync {
    /// Exchange `url` for a short link on `domain`
    fn shorten(&self, url: &str, domain: &str) -> Result<String>;
}

/// Run `op` until it succeeds, `is_transient` rejects the error, or the window closes
///
/// Delays double from `initial_delay` and never overshoot the deadline. A
/// window too large to represent as an `Instant` means no deadline.
pub(crate) fn retry_within<T, E>(
    window: Duration,
    initial_delay: Duration,
    mut is_transient: impl FnMut(&E) -> bool,
    mut op: impl FnMut() -> std::result::Result<T, E>,
) -> std::result::Result<T, E> {
    let deadline = Instant::now().checked_add(window);
    let mut delay = initial_delay;

    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) => {
                if !is_transient(&e) {
                    return Err(e);
                }
                let pause = match deadline {
                    Some(deadline) => {
                        let now = Instant::now();
                        if now >= deadline {
                            return Err(e);
                        }
                        delay.min(deadline - now)
                    }
                    None => delay,
                };
                std::thread::sleep(pause);
                delay = delay.saturating_mul(2);
            }
        }
    }
}
