// Backup, upload and restore example for statepack
//
// Run with: RUST_LOG=info cargo run --example backup_restore

use statepack::{
    BackupCallback, BackupManager, BackupRequest, Error, JsonPreferenceStore, LatestCandidate,
    LocalObjectStorage, PrefValue, PreferenceStore, Preferences, RestoreCallback, RestoreRequest,
    UploadConfig,
};
use std::path::Path;

/// Prints every outcome as it arrives
struct Printer;

impl BackupCallback for Printer {
    fn on_backup_success(&self, archive: &Path) {
        println!("   ✅ Backup written: {}", archive.display());
    }

    fn on_upload_success(&self, url: &str) {
        println!("   ☁️  Uploaded: {url}");
    }

    fn on_backup_error(&self, error: Error) {
        println!("   ❌ Backup failed: {error}");
    }
}

impl RestoreCallback for Printer {
    fn on_restore_success(&self) {
        println!("   ✅ Restore finished");
    }

    fn on_restore_error(&self, error: Error) {
        println!("   ❌ Restore failed: {error}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let root = Path::new("./example_data");
    let prefs_dir = root.join("prefs");
    let db_dir = root.join("databases");
    let backup_dir = root.join("backups");
    std::fs::create_dir_all(&db_dir)?;

    println!("💾 statepack Backup & Restore Example\n");

    // Seed some state
    println!("📝 Creating initial state...");
    let store = JsonPreferenceStore::new(&prefs_dir);
    let mut prefs = Preferences::new();
    prefs.insert("theme".into(), PrefValue::from("dark"));
    prefs.insert("launches".into(), PrefValue::from(3i32));
    prefs.insert("onboarded".into(), PrefValue::from(true));
    store.clear_and_write("app", &prefs)?;
    std::fs::write(db_dir.join("orders.db"), b"SQLite format 3\0demo rows")?;

    let manager = BackupManager::builder()
        .preferences(store.clone())
        .database_dir(&db_dir)
        .object_storage(LocalObjectStorage::new(root.join("share")))
        .build()?;

    // Back up and upload
    println!("📦 Creating backup...");
    manager
        .backup(
            BackupRequest::new(&backup_dir)
                .preferences("app")
                .database("orders.db")
                .upload(UploadConfig::to_prefix("demo")),
        )
        .execute(&Printer);

    // Diverge
    println!("\n🔧 Modifying state...");
    prefs.insert("theme".into(), PrefValue::from("light"));
    store.clear_and_write("app", &prefs)?;
    std::fs::write(db_dir.join("orders.db"), b"changed")?;

    // Restore the newest backup
    println!("♻️  Restoring from backup...");
    manager
        .restore(RestoreRequest::new(&backup_dir).preferences("app"))
        .execute(&LatestCandidate, &Printer);

    println!("\n✅ Restored preferences: {:?}", store.read_all("app")?);
    println!("✨ Backup/restore example complete!");
    Ok(())
}
