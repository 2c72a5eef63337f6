//! Settings document persistence.
//!
//! # Responsibilities
//! - Read the whole document from disk on every call (no cache)
//! - Validate it at the boundary: a JSON object whose configured key holds a string
//! - Write it back wholesale, preserving unrelated keys and their order

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// Error type for document operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} does not contain a JSON object")]
    NotAnObject(PathBuf),

    #[error("{path} does not contain key {key}")]
    MissingKey { path: PathBuf, key: String },

    #[error("value for key {key} in {path} is not a string")]
    WrongType { path: PathBuf, key: String },

    #[error("cannot serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "io",
            StoreError::Parse { .. } => "parse",
            StoreError::NotAnObject(_) => "not_an_object",
            StoreError::MissingKey { .. } => "missing_key",
            StoreError::WrongType { .. } => "wrong_type",
            StoreError::Serialize(_) => "serialize",
        }
    }
}

/// A loaded settings document whose dial key is known to hold a string.
///
/// Only obtainable through [`DocumentStore::load`] or
/// [`SettingDocument::from_entries`], so the invariant always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDocument {
    key: String,
    entries: Map<String, Value>,
}

impl SettingDocument {
    /// Validate a raw mapping against the dial key.
    pub fn from_entries(
        path: &Path,
        key: &str,
        entries: Map<String, Value>,
    ) -> Result<Self, StoreError> {
        get_required_string(path, &entries, key)?;
        Ok(Self {
            key: key.to_string(),
            entries,
        })
    }

    /// The current dial value.
    pub fn value(&self) -> &str {
        self.entries
            .get(&self.key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// A copy of this document with the dial set to `value`.
    pub fn with_value(&self, value: &str) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(self.key.clone(), Value::String(value.to_string()));
        Self {
            key: self.key.clone(),
            entries,
        }
    }

    /// All entries, including the ones the dial service does not own.
    pub fn entries(&self) -> &Map<String, Value> {
        &self.entries
    }
}

/// Extract the required string under `key`.
///
/// A missing key or a non-string value is an integrity defect of the
/// document, not something a request can recover from.
pub fn get_required_string<'a>(
    path: &Path,
    entries: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a str, StoreError> {
    match entries.get(key) {
        None => Err(StoreError::MissingKey {
            path: path.to_path_buf(),
            key: key.to_string(),
        }),
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(StoreError::WrongType {
            path: path.to_path_buf(),
            key: key.to_string(),
        }),
    }
}

/// File-backed store for the settings document.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
    key: String,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read and validate the document.
    pub fn load(&self) -> Result<SettingDocument, StoreError> {
        let raw = fs::read(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), contents = %String::from_utf8_lossy(&raw), "Read document");

        let parsed: Value = serde_json::from_slice(&raw).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let Value::Object(entries) = parsed else {
            return Err(StoreError::NotAnObject(self.path.clone()));
        };

        SettingDocument::from_entries(&self.path, &self.key, entries)
    }

    /// Overwrite the backing file with `document`.
    ///
    /// The new contents go to a sibling temporary file which is then renamed
    /// over the target, so readers see either the old or the new document.
    pub fn save(&self, document: &SettingDocument) -> Result<(), StoreError> {
        let raw = serde_json::to_vec(document.entries()).map_err(StoreError::Serialize)?;

        tracing::info!(path = %self.path.display(), contents = %String::from_utf8_lossy(&raw), "Writing document");

        let tmp_path = self.tmp_path();
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let write_result = File::create(&tmp_path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            writer.write_all(&raw)?;
            writer.flush()?;
            writer.get_ref().sync_all()
        });

        if let Err(e) = write_result.and_then(|_| fs::rename(&tmp_path, &self.path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_err(e));
        }

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(contents: &str) -> (TempDir, DocumentStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dials.json");
        fs::write(&path, contents).unwrap();
        (dir, DocumentStore::new(path, "smp"))
    }

    #[test]
    fn test_load_returns_value() {
        let (_dir, store) = store_with(r#"{"smp":"disabled","other":1}"#);
        let doc = store.load().unwrap();
        assert_eq!(doc.value(), "disabled");
        assert_eq!(doc.entries().len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path().join("absent.json"), "smp");
        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_malformed_document() {
        let (_dir, store) = store_with("{not json");
        assert!(matches!(store.load(), Err(StoreError::Parse { .. })));

        let (_dir, store) = store_with(r#"["smp"]"#);
        assert!(matches!(store.load(), Err(StoreError::NotAnObject(_))));
    }

    #[test]
    fn test_missing_key_and_wrong_type() {
        let (_dir, store) = store_with(r#"{"other":"enabled"}"#);
        let err = store.load().unwrap_err();
        assert_eq!(err.kind(), "missing_key");
        assert!(err.to_string().ends_with("does not contain key smp"));

        let (_dir, store) = store_with(r#"{"smp":true}"#);
        let err = store.load().unwrap_err();
        assert_eq!(err.kind(), "wrong_type");
        assert!(err.to_string().starts_with("value for key smp in"));
    }

    #[test]
    fn test_save_preserves_other_keys_and_order() {
        let (_dir, store) = store_with(r#"{"zeta":[1,2],"smp":"disabled","alpha":{"nested":null}}"#);
        let doc = store.load().unwrap();
        store.save(&doc.with_value("enabled")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"{"zeta":[1,2],"smp":"enabled","alpha":{"nested":null}}"#);
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn test_save_of_load_keeps_contents() {
        let (_dir, store) = store_with(r#"{"smp":"enabled","n":1.5,"s":"x","b":false}"#);
        let before = store.load().unwrap();
        store.save(&before).unwrap();
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let (dir, store) = store_with(r#"{"smp":"enabled"}"#);
        let doc = store.load().unwrap();
        let elsewhere = DocumentStore::new(dir.path().join("gone").join("dials.json"), "smp");
        assert!(matches!(elsewhere.save(&doc), Err(StoreError::Io { .. })));
    }
}
