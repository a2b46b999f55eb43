//! Upload Chain Integration Tests
//!
//! Tests for what happens after the archive is written:
//! - Upload → download URL → optional short link
//! - Failures stopping the chain
//! - Deleting local backups after a successful upload
//! - Background runs

mod common;

use common::{BackupEvent, FakeShortener, FakeStorage, RecordingBackupCallback, TestFixture};
use statepack::{BackupRequest, Error, LocalObjectStorage, UploadConfig};
use std::sync::Arc;
use std::time::Duration;

fn request(fixture: &TestFixture, upload: UploadConfig) -> BackupRequest {
    fixture.write_db("orders.db", b"rows");
    BackupRequest::new(fixture.backup_dir())
        .name("nightly")
        .database("orders.db")
        .upload(upload)
}

#[test]
fn test_upload_reports_download_url() {
    let fixture = TestFixture::new();
    let storage = FakeStorage::default();
    let manager = fixture.builder().object_storage(storage.clone()).build().unwrap();
    let callback = RecordingBackupCallback::default();

    manager
        .backup(request(&fixture, UploadConfig::to_prefix("acme/seller-7/")))
        .execute(&callback);

    let archive = fixture.backup_dir().join("nightly.zip");
    assert_eq!(
        callback.events(),
        vec![
            BackupEvent::Success(archive.clone()),
            BackupEvent::Uploaded("https://storage.test/acme/seller-7/nightly.zip".into()),
        ]
    );
    assert_eq!(storage.keys(), vec!["acme/seller-7/nightly.zip"]);
    assert!(archive.exists());
}

#[test]
fn test_upload_with_short_link() {
    let fixture = TestFixture::new();
    let shortener = FakeShortener::default();
    let manager = fixture
        .builder()
        .object_storage(FakeStorage::default())
        .link_shortener(shortener.clone())
        .build()
        .unwrap();
    let callback = RecordingBackupCallback::default();

    manager
        .backup(request(
            &fixture,
            UploadConfig::to_prefix("").shorten_link("acme.page.link"),
        ))
        .execute(&callback);

    assert_eq!(
        shortener.calls(),
        vec![(
            "https://storage.test/nightly.zip".to_string(),
            "acme.page.link".to_string()
        )]
    );
    assert_eq!(
        callback.events().last(),
        Some(&BackupEvent::Uploaded("https://acme.page.link/s1".into()))
    );
}

#[test]
fn test_upload_failure_stops_chain() {
    let fixture = TestFixture::new();
    std::fs::create_dir_all(fixture.backup_dir()).unwrap();
    std::fs::write(fixture.backup_dir().join("older.zip"), b"x").unwrap();

    let shortener = FakeShortener::default();
    let manager = fixture
        .builder()
        .object_storage(FakeStorage::failing())
        .link_shortener(shortener.clone())
        .build()
        .unwrap();
    let callback = RecordingBackupCallback::default();

    manager
        .backup(request(
            &fixture,
            UploadConfig::to_prefix("acme")
                .shorten_link("acme.page.link")
                .delete_local_after_upload(true),
        ))
        .execute(&callback);

    let errors = callback.take_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], Error::Upload(_)));
    assert!(shortener.calls().is_empty());

    // Nothing deleted, and no success was reported for a run that deletes
    assert_eq!(fixture.backup_dir_entries(), vec!["nightly.zip", "older.zip"]);
    assert!(
        !callback
            .events()
            .iter()
            .any(|e| matches!(e, BackupEvent::Success(_)))
    );
}

#[test]
fn test_download_url_failure_stops_chain() {
    let fixture = TestFixture::new();
    std::fs::create_dir_all(fixture.backup_dir()).unwrap();
    std::fs::write(fixture.backup_dir().join("older.zip"), b"x").unwrap();

    let storage = FakeStorage::without_urls();
    let shortener = FakeShortener::default();
    let manager = fixture
        .builder()
        .object_storage(storage.clone())
        .link_shortener(shortener.clone())
        .build()
        .unwrap();
    let callback = RecordingBackupCallback::default();

    manager
        .backup(request(
            &fixture,
            UploadConfig::to_prefix("acme")
                .shorten_link("acme.page.link")
                .delete_local_after_upload(true),
        ))
        .execute(&callback);

    assert_eq!(storage.keys(), vec!["acme/nightly.zip"]);
    assert!(shortener.calls().is_empty());
    assert_eq!(
        callback.events(),
        vec![BackupEvent::Failed(
            "Upload failed: no URL for acme/nightly.zip".into()
        )]
    );
    assert!(matches!(callback.take_errors()[..], [Error::Upload(ref msg)] if msg == "no URL for acme/nightly.zip"));
    assert_eq!(fixture.backup_dir_entries(), vec!["nightly.zip", "older.zip"]);
}

#[test]
fn test_shortener_failure_stops_chain() {
    let fixture = TestFixture::new();
    let shortener = FakeShortener::failing();
    let manager = fixture
        .builder()
        .object_storage(FakeStorage::default())
        .link_shortener(shortener.clone())
        .build()
        .unwrap();
    let callback = RecordingBackupCallback::default();

    manager
        .backup(request(
            &fixture,
            UploadConfig::to_prefix("acme")
                .shorten_link("acme.page.link")
                .delete_local_after_upload(true),
        ))
        .execute(&callback);

    assert_eq!(
        shortener.calls(),
        vec![(
            "https://storage.test/acme/nightly.zip".to_string(),
            "acme.page.link".to_string()
        )]
    );
    let errors = callback.take_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], Error::Upload(msg) if msg == "cannot shorten on acme.page.link"));
    assert!(
        !callback
            .events()
            .iter()
            .any(|e| matches!(e, BackupEvent::Uploaded(_)))
    );
    assert_eq!(fixture.backup_dir_entries(), vec!["nightly.zip"]);
}

#[test]
fn test_unbounded_retry_window_still_reports() {
    let fixture = TestFixture::new();
    let share = fixture.temp_dir.path().join("share");
    let manager = fixture
        .builder()
        .object_storage(LocalObjectStorage::new(&share))
        .build()
        .unwrap();
    let callback = RecordingBackupCallback::default();

    let mut upload = UploadConfig::to_prefix("acme");
    upload.max_retry_time = Duration::MAX;
    manager.backup(request(&fixture, upload)).execute(&callback);

    assert!(share.join("acme/nightly.zip").is_file());
    assert!(matches!(
        callback.events().last(),
        Some(BackupEvent::Uploaded(url)) if url.ends_with("acme/nightly.zip")
    ));
}

#[test]
fn test_delete_after_upload_empties_backup_dir() {
    let fixture = TestFixture::new();
    std::fs::create_dir_all(fixture.backup_dir()).unwrap();
    std::fs::write(fixture.backup_dir().join("unrelated.rar"), b"x").unwrap();

    let manager = fixture
        .builder()
        .object_storage(FakeStorage::default())
        .build()
        .unwrap();
    let callback = RecordingBackupCallback::default();

    manager
        .backup(request(
            &fixture,
            UploadConfig::to_prefix("acme").delete_local_after_upload(true),
        ))
        .execute(&callback);

    assert_eq!(
        callback.events(),
        vec![BackupEvent::Uploaded(
            "https://storage.test/acme/nightly.zip".into()
        )]
    );
    assert!(fixture.backup_dir_entries().is_empty());
}

#[test]
fn test_upload_without_storage_is_an_error() {
    let fixture = TestFixture::new();
    let callback = RecordingBackupCallback::default();

    fixture
        .manager()
        .backup(request(&fixture, UploadConfig::to_prefix("acme")))
        .execute(&callback);

    let events = callback.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], BackupEvent::Success(_)));
    assert!(matches!(callback.take_errors()[..], [Error::Upload(_)]));
}

#[test]
fn test_backup_failure_skips_upload() {
    let fixture = TestFixture::new();
    let storage = FakeStorage::default();
    let manager = fixture.builder().object_storage(storage.clone()).build().unwrap();
    let callback = RecordingBackupCallback::default();

    manager
        .backup(BackupRequest::new(fixture.backup_dir()).upload(UploadConfig::to_prefix("acme")))
        .execute(&callback);

    assert!(matches!(callback.take_errors()[..], [Error::NoArtifacts]));
    assert!(storage.keys().is_empty());
}

#[test]
fn test_upload_disabled_reports_only_backup() {
    let fixture = TestFixture::new();
    let storage = FakeStorage::default();
    let manager = fixture.builder().object_storage(storage.clone()).build().unwrap();
    let callback = RecordingBackupCallback::default();

    manager
        .backup(request(&fixture, UploadConfig::default()))
        .execute(&callback);

    assert_eq!(
        callback.events(),
        vec![BackupEvent::Success(fixture.backup_dir().join("nightly.zip"))]
    );
    assert!(storage.keys().is_empty());
}

#[test]
fn test_upload_to_local_storage() {
    let fixture = TestFixture::new();
    let share = fixture.temp_dir.path().join("share");
    let manager = fixture
        .builder()
        .object_storage(LocalObjectStorage::new(&share))
        .build()
        .unwrap();
    let callback = Arc::new(RecordingBackupCallback::default());

    manager
        .spawn_backup(
            request(&fixture, UploadConfig::to_prefix("acme")),
            callback.clone(),
        )
        .join()
        .unwrap();

    let uploaded = share.join("acme/nightly.zip");
    assert!(uploaded.is_file());
    match callback.events().last() {
        Some(BackupEvent::Uploaded(url)) => {
            assert!(url.starts_with("file://"));
            assert!(url.ends_with("acme/nightly.zip"));
        }
        other => panic!("unexpected final event: {other:?}"),
    }
}
