//! Common test utilities for statepack integration tests
//!
//! Provides a temp-dir fixture wired to an in-memory preference store,
//! recording callbacks, and scriptable remote collaborators.

#![allow(dead_code)]

use statepack::{
    BackupCallback, BackupManager, BackupManagerBuilder, Error, LinkShortener,
    MemoryPreferenceStore, ObjectStorage, PrefValue, RemoteObject, RestoreCallback,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Route `log` output through the test harness (`RUST_LOG=debug cargo test`)
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// =============================================================================
// Fixture
// =============================================================================

/// Temp directory holding a database dir and a backup dir
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub prefs: Arc<MemoryPreferenceStore>,
}

impl TestFixture {
    pub fn new() -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir_all(temp_dir.path().join("databases")).unwrap();
        Self {
            temp_dir,
            prefs: Arc::new(MemoryPreferenceStore::new()),
        }
    }

    pub fn db_dir(&self) -> PathBuf {
        self.temp_dir.path().join("databases")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.temp_dir.path().join("backups")
    }

    /// Builder with the fixture's store and database directory filled in
    pub fn builder(&self) -> BackupManagerBuilder {
        BackupManager::builder()
            .shared_preferences(self.prefs.clone())
            .database_dir(self.db_dir())
    }

    pub fn manager(&self) -> BackupManager {
        self.builder().build().expect("Failed to build manager")
    }

    pub fn write_db(&self, name: &str, contents: &[u8]) {
        std::fs::write(self.db_dir().join(name), contents).unwrap();
    }

    pub fn read_db(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.db_dir().join(name)).unwrap()
    }

    /// Store with one value of every kind, plus a non-portable set
    pub fn seed_app_prefs(&self, store: &str) {
        self.prefs.set(store, "dark_mode", true);
        self.prefs.set(store, "scale", 1.5f32);
        self.prefs.set(store, "launches", 42i32);
        self.prefs.set(store, "last_sync", 1_700_000_000_000i64);
        self.prefs.set(store, "user", "seller-7");
        self.prefs.set(
            store,
            "tags",
            PrefValue::StringSet(["a".to_string(), "b".to_string()].into()),
        );
    }

    /// File names in the backup directory, sorted
    pub fn backup_dir_entries(&self) -> Vec<String> {
        list_names(&self.backup_dir())
    }
}

pub fn list_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

// =============================================================================
// Recording callbacks
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum BackupEvent {
    Success(PathBuf),
    Uploaded(String),
    Failed(String),
}

#[derive(Default)]
pub struct RecordingBackupCallback {
    events: Mutex<Vec<BackupEvent>>,
    errors: Mutex<Vec<Error>>,
}

impl RecordingBackupCallback {
    pub fn events(&self) -> Vec<BackupEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Take the recorded errors (for `matches!` checks)
    pub fn take_errors(&self) -> Vec<Error> {
        std::mem::take(&mut *self.errors.lock().unwrap())
    }
}

impl BackupCallback for RecordingBackupCallback {
    fn on_backup_success(&self, archive: &Path) {
        self.events
            .lock()
            .unwrap()
            .push(BackupEvent::Success(archive.to_path_buf()));
    }

    fn on_upload_success(&self, url: &str) {
        self.events
            .lock()
            .unwrap()
            .push(BackupEvent::Uploaded(url.to_string()));
    }

    fn on_backup_error(&self, error: Error) {
        self.events
            .lock()
            .unwrap()
            .push(BackupEvent::Failed(error.to_string()));
        self.errors.lock().unwrap().push(error);
    }
}

#[derive(Default)]
pub struct RecordingRestoreCallback {
    successes: AtomicUsize,
    errors: Mutex<Vec<Error>>,
}

impl RecordingRestoreCallback {
    pub fn successes(&self) -> usize {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn take_errors(&self) -> Vec<Error> {
        std::mem::take(&mut *self.errors.lock().unwrap())
    }

    pub fn total(&self) -> usize {
        self.successes() + self.errors.lock().unwrap().len()
    }
}

impl RestoreCallback for RecordingRestoreCallback {
    fn on_restore_success(&self) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_restore_error(&self, error: Error) {
        self.errors.lock().unwrap().push(error);
    }
}

// =============================================================================
// Scriptable remote collaborators
// =============================================================================

/// Object storage that records keys and serves `https://storage.test/<key>`
#[derive(Clone, Default)]
pub struct FakeStorage {
    pub fail: bool,
    pub fail_url: bool,
    pub keys: Arc<Mutex<Vec<String>>>,
}

impl FakeStorage {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Uploads succeed but no download URL can be fetched
    pub fn without_urls() -> Self {
        Self {
            fail_url: true,
            ..Default::default()
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

impl ObjectStorage for FakeStorage {
    fn put(&self, local: &Path, key: &str, _max_retry_time: Duration) -> statepack::Result<RemoteObject> {
        if self.fail {
            return Err(Error::Upload("storage unavailable".into()));
        }
        assert!(local.is_file(), "archive must exist while uploading");
        self.keys.lock().unwrap().push(key.to_string());
        Ok(RemoteObject {
            key: key.to_string(),
            size_bytes: std::fs::metadata(local).map(|m| m.len()).unwrap_or(0),
        })
    }

    fn download_url(&self, object: &RemoteObject) -> statepack::Result<String> {
        if self.fail_url {
            return Err(Error::Upload(format!("no URL for {}", object.key)));
        }
        Ok(format!("https://storage.test/{}", object.key))
    }
}

/// Shortener returning `https://<domain>/s<n>` and recording its inputs
#[derive(Clone, Default)]
pub struct FakeShortener {
    pub fail: bool,
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeShortener {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl LinkShortener for FakeShortener {
    fn shorten(&self, url: &str, domain: &str) -> statepack::Result<String> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((url.to_string(), domain.to_string()));
        if self.fail {
            return Err(Error::Upload(format!("cannot shorten on {domain}")));
        }
        Ok(format!("https://{domain}/s{}", calls.len()))
    }
}
