//! Route protection for gated pages.
//!
//! A gated page requires a document produced by an earlier page. The check
//! runs before any step rendering; when the document is missing the caller
//! gets a redirect target and a user-facing message instead of an error to
//! catch.

use serde_json::Value;
use tracing::warn;

use crate::errors::AppError;
use crate::store::Store;

/// The entry page every failed gate falls back to.
pub const ENTRY_PAGE: &str = "index";

/// Where a failed gate sends the user, and what to tell them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub enum GateOutcome {
    /// The required document exists; proceed with page init.
    Allowed(Value),
    /// No usable document: send the user back to the entry page.
    Redirect(Redirect),
}

impl GateOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateOutcome::Allowed(_))
    }
}

/// Loads the document a gated page depends on. A missing or placeholder
/// value is a `DataIntegrity` failure: fatal for the page, never retried.
pub fn load_document(store: &Store, key: &str) -> Result<Value, AppError> {
    match store.get_json::<Value>(key) {
        Ok(Some(doc)) => Ok(doc),
        Ok(None) => Err(AppError::DataIntegrity(format!(
            "no document under '{key}'"
        ))),
        Err(e) => Err(AppError::DataIntegrity(format!(
            "document under '{key}' unreadable: {e}"
        ))),
    }
}

/// Checks that `key` holds a real document before a gated page initializes.
pub fn check_gate(store: &Store, key: &str) -> GateOutcome {
    match load_document(store, key) {
        Ok(doc) => GateOutcome::Allowed(doc),
        Err(e) => {
            warn!("Gate check failed: {e}");
            GateOutcome::Redirect(Redirect {
                to: ENTRY_PAGE,
                message: "Please upload your CV first to access this page.".to_string(),
            })
        }
    }
}

/// Gate helper for flow constructors: the document, or the redirect.
pub fn require_document(store: &Store, key: &str) -> Result<Value, Redirect> {
    match check_gate(store, key) {
        GateOutcome::Allowed(doc) => Ok(doc),
        GateOutcome::Redirect(redirect) => Err(redirect),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CV_DATA_KEY;

    fn store_with(raw: Option<&str>) -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path().join("store.json")).unwrap();
        if let Some(raw) = raw {
            let value: Value = serde_json::from_str(raw).unwrap();
            store.set_json(CV_DATA_KEY, &value).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn test_missing_key_redirects_to_entry_page() {
        let (_dir, store) = store_with(None);
        match check_gate(&store, CV_DATA_KEY) {
            GateOutcome::Redirect(redirect) => {
                assert_eq!(redirect.to, ENTRY_PAGE);
                assert!(redirect.message.contains("upload your CV"));
            }
            GateOutcome::Allowed(_) => panic!("expected redirect"),
        }
    }

    #[test]
    fn test_empty_object_placeholder_redirects() {
        let (_dir, store) = store_with(Some("{}"));
        assert!(!check_gate(&store, CV_DATA_KEY).is_allowed());
    }

    #[test]
    fn test_null_placeholder_redirects() {
        let (_dir, store) = store_with(Some("null"));
        assert!(!check_gate(&store, CV_DATA_KEY).is_allowed());
    }

    #[test]
    fn test_load_document_reports_data_integrity() {
        let (_dir, store) = store_with(None);
        let e = load_document(&store, CV_DATA_KEY).unwrap_err();
        assert!(matches!(e, crate::errors::AppError::DataIntegrity(_)));
    }

    #[test]
    fn test_real_document_is_allowed() {
        let (_dir, store) = store_with(Some(r#"{"personal_info":{"name":"Alice"}}"#));
        assert!(check_gate(&store, CV_DATA_KEY).is_allowed());
    }
}
