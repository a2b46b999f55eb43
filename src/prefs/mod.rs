//! Preference stores and the portable export format
//!
//! A preference store is a named key-value map owned by the host
//! application. Backups never copy the store's own file; they read every
//! entry through [`PreferenceStore::read_all`] and write a self-describing
//! export document instead, which restore feeds back through
//! [`PreferenceStore::clear_and_write`].
//!
//! Only five value types travel through an export: booleans, 32-bit floats,
//! 32-bit and 64-bit integers, and strings. Anything else a store holds
//! (string sets today) is dropped on export and on import.

mod json;
mod memory;

pub use json::JsonPreferenceStore;
pub use memory::MemoryPreferenceStore;

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Version written into every export document
pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// All entries of one preference store, keyed by preference key
pub type Preferences = BTreeMap<String, PrefValue>;

/// A typed preference value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PrefValue {
    Bool(bool),
    /// Non-finite values are written as the strings `NaN`, `inf` and `-inf`
    Float(#[serde(with = "float_repr")] f32),
    Int(i32),
    Long(i64),
    String(String),
    /// Held by stores but never exported
    StringSet(BTreeSet<String>),
}

impl PrefValue {
    /// Whether this value survives an export/import cycle
    #[must_use]
    pub fn is_portable(&self) -> bool {
        !matches!(self, PrefValue::StringSet(_))
    }

    /// Name of the value type as written in export documents
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            PrefValue::Bool(_) => "bool",
            PrefValue::Float(_) => "float",
            PrefValue::Int(_) => "int",
            PrefValue::Long(_) => "long",
            PrefValue::String(_) => "string",
            PrefValue::StringSet(_) => "string_set",
        }
    }
}

/// JSON has no NaN or infinity, so those travel as strings
mod float_repr {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f32(*value)
        } else {
            serializer.serialize_str(&value.to_string())
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f32),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => text
                .parse::<f32>()
                .map_err(|_| D::Error::custom(format!("invalid float '{text}'"))),
        }
    }
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        PrefValue::Bool(value)
    }
}

impl From<f32> for PrefValue {
    fn from(value: f32) -> Self {
        PrefValue::Float(value)
    }
}

impl From<i32> for PrefValue {
    fn from(value: i32) -> Self {
        PrefValue::Int(value)
    }
}

impl From<i64> for PrefValue {
    fn from(value: i64) -> Self {
        PrefValue::Long(value)
    }
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        PrefValue::String(value.to_string())
    }
}

impl From<String> for PrefValue {
    fn from(value: String) -> Self {
        PrefValue::String(value)
    }
}

/// Host-application key-value store
///
/// Implementations must be shareable across the worker thread that runs a
/// pipeline, hence `Send + Sync`.
pub trait PreferenceStore: Send + Sync {
    /// Read every entry of the named store (empty if it has never been written)
    fn read_all(&self, name: &str) -> Result<Preferences>;

    /// Remove every entry of the named store, then write `entries`
    fn clear_and_write(&self, name: &str, entries: &Preferences) -> Result<()>;
}

#[derive(Serialize, Deserialize)]
struct ExportDocument {
    version: u32,
    store: String,
    entries: BTreeMap<String, serde_json::Value>,
}

/// Encode a store's entries as an export document, dropping non-portable values
pub fn encode_export(store: &str, entries: &Preferences) -> Result<Vec<u8>> {
    let mut exported = BTreeMap::new();
    for (key, value) in entries {
        if !value.is_portable() {
            debug!("Dropping {store}/{key}: {} values are not exported", value.type_name());
            continue;
        }
        exported.insert(key.clone(), serde_json::to_value(value)?);
    }

    let document = ExportDocument {
        version: EXPORT_FORMAT_VERSION,
        store: store.to_string(),
        entries: exported,
    };
    Ok(serde_json::to_vec_pretty(&document)?)
}

/// Decode an export document, dropping entries of unrecognized type
///
/// # Errors
///
/// Returns `Error::Deserialization` if the payload is not an export
/// document or carries an unsupported version.
pub fn decode_export(bytes: &[u8]) -> Result<Preferences> {
    let document: ExportDocument =
        serde_json::from_slice(bytes).map_err(|e| Error::Deserialization(e.to_string()))?;

    if document.version != EXPORT_FORMAT_VERSION {
        return Err(Error::Deserialization(format!(
            "unsupported export version {} (expected {EXPORT_FORMAT_VERSION})",
            document.version
        )));
    }

    let mut entries = Preferences::new();
    for (key, raw) in document.entries {
        match serde_json::from_value::<PrefValue>(raw) {
            Ok(value) if value.is_portable() => {
                entries.insert(key, value);
            }
            Ok(value) => debug!("Dropping {key}: {} values are not imported", value.type_name()),
            Err(e) => debug!("Dropping {key}: unrecognized value ({e})"),
        }
    }
    Ok(entries)
}

/// Write a store's export document to `path`
pub fn export_to_file(store: &str, entries: &Preferences, path: &Path) -> Result<()> {
    let bytes = encode_export(store, entries)?;
    crate::error::write_file(path, bytes)?;
    crate::security::restrict_file(path)
}

/// Read an export document from `path`
pub fn import_from_file(path: &Path) -> Result<Preferences> {
    decode_export(&crate::error::read_file(path)?)
}
