//! In-memory preference store for tests and embedding

use super::{PrefValue, PreferenceStore, Preferences};
use crate::error::Result;
use crate::sync::RwLockExt;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory preference stores (not persisted)
pub struct MemoryPreferenceStore {
    stores: RwLock<HashMap<String, Preferences>>,
}

impl MemoryPreferenceStore {
    /// Create an empty set of stores
    #[must_use]
    pub fn new() -> Self {
        Self {
            stores: RwLock::new(HashMap::new()),
        }
    }

    /// Set a single entry, creating the store if needed
    pub fn set(&self, store: &str, key: &str, value: impl Into<PrefValue>) {
        self.stores
            .write_recovered()
            .entry(store.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Get a single entry
    #[must_use]
    pub fn get(&self, store: &str, key: &str) -> Option<PrefValue> {
        self.stores
            .read_recovered()
            .get(store)
            .and_then(|prefs| prefs.get(key).cloned())
    }

    /// Names of every store that holds at least one entry
    #[must_use]
    pub fn store_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .stores
            .read_recovered()
            .iter()
            .filter(|(_, prefs)| !prefs.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

impl Default for MemoryPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn read_all(&self, name: &str) -> Result<Preferences> {
        Ok(self
            .stores
            .read_recovered()
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    fn clear_and_write(&self, name: &str, entries: &Preferences) -> Result<()> {
        self.stores
            .write_recovered()
            .insert(name.to_string(), entries.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_read_all() {
        let store = MemoryPreferenceStore::new();
        store.set("app", "theme", "dark");
        store.set("app", "volume", 7i32);

        let all = store.read_all("app").unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(store.get("app", "theme"), Some(PrefValue::from("dark")));
        assert!(store.read_all("missing").unwrap().is_empty());
    }

    #[test]
    fn test_clear_and_write_replaces_everything() {
        let store = MemoryPreferenceStore::new();
        store.set("app", "stale", true);

        let mut fresh = Preferences::new();
        fresh.insert("volume".into(), PrefValue::Int(3));
        store.clear_and_write("app", &fresh).unwrap();

        assert_eq!(store.get("app", "stale"), None);
        assert_eq!(store.get("app", "volume"), Some(PrefValue::Int(3)));
        assert_eq!(store.store_names(), vec!["app"]);
    }
}
