//! Persisted document store — the durable key-value storage shared by
//! every page of the client (the browser-localStorage analogue).
//!
//! Values are raw JSON strings under fixed keys. Writes are synchronous
//! full overwrites: the last writer wins, and there is no protection
//! against a second concurrent writer (single active tab assumed).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;

/// Key holding the parsed CV document.
pub const CV_DATA_KEY: &str = "cvData";
/// Key holding the generated template document.
pub const TEMPLATE_DATA_KEY: &str = "templateData";
/// Key holding the job-targeting form.
pub const JOB_DETAILS_KEY: &str = "jobDetails";

pub struct Store {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl Store {
    /// Opens the store file, creating an empty store if the file does not
    /// exist yet. A corrupt store file is an error, not silent data loss.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Store { path, entries })
    }

    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Deserializes the value under `key`, or `None` when no usable
    /// document is stored (see [`Store::has_document`]).
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        match self.entries.get(key) {
            Some(raw) if !is_placeholder(raw) => Ok(Some(serde_json::from_str(raw)?)),
            _ => Ok(None),
        }
    }

    /// Serializes `value` under `key` and flushes the whole store to disk.
    /// Full overwrite of the previous value, never a merge.
    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), AppError> {
        self.entries
            .insert(key.to_string(), serde_json::to_string(value)?);
        self.flush()?;
        debug!("Store wrote key '{key}'");
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Result<(), AppError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    /// True when `key` holds a real document. Absent keys and the literal
    /// placeholders `"{}"` / `"null"` count as "no data".
    pub fn has_document(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|raw| !is_placeholder(raw))
    }

    fn flush(&self) -> Result<(), AppError> {
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

/// A value that deserializes to `null` or an empty object is a leftover
/// placeholder, not a document.
fn is_placeholder(raw: &str) -> bool {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Null) => true,
        Ok(Value::Object(map)) => map.is_empty(),
        Ok(_) => false,
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CvData;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("store.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let (_dir, mut store) = temp_store();
        let mut cv = CvData::default();
        cv.personal_info.name = "Alice Doe".to_string();
        cv.skills.frameworks = vec!["axum".to_string(), "tokio".to_string()];
        store.set_json(CV_DATA_KEY, &cv).unwrap();

        let loaded: CvData = store.get_json(CV_DATA_KEY).unwrap().unwrap();
        assert_eq!(loaded, cv);
    }

    #[test]
    fn test_reopen_reads_persisted_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        {
            let mut store = Store::open(&path).unwrap();
            store
                .set_json(JOB_DETAILS_KEY, &serde_json::json!({"target_job": "SRE"}))
                .unwrap();
        }
        let store = Store::open(&path).unwrap();
        assert!(store.has_document(JOB_DETAILS_KEY));
    }

    #[test]
    fn test_placeholder_values_count_as_no_data() {
        let (_dir, mut store) = temp_store();
        store.set_json(CV_DATA_KEY, &serde_json::json!({})).unwrap();
        assert!(!store.has_document(CV_DATA_KEY));
        store.set_json(CV_DATA_KEY, &Value::Null).unwrap();
        assert!(!store.has_document(CV_DATA_KEY));
        assert!(store.get_json::<Value>(CV_DATA_KEY).unwrap().is_none());
    }

    #[test]
    fn test_last_writer_wins() {
        let (_dir, mut store) = temp_store();
        store
            .set_json(TEMPLATE_DATA_KEY, &serde_json::json!({"v": 1}))
            .unwrap();
        store
            .set_json(TEMPLATE_DATA_KEY, &serde_json::json!({"v": 2}))
            .unwrap();
        let v: Value = store.get_json(TEMPLATE_DATA_KEY).unwrap().unwrap();
        assert_eq!(v["v"], 2);
    }

    #[test]
    fn test_missing_key_is_absent() {
        let (_dir, store) = temp_store();
        assert!(!store.has_document(CV_DATA_KEY));
        assert!(store.get_raw(CV_DATA_KEY).is_none());
    }
}
