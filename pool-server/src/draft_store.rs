//! In-flight work that survives a restart: the configurator selection and
//! the estimate being edited. One JSON file per key in the drafts
//! directory.

use std::path::{Path, PathBuf};

use pool_core::Selection;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, PartialEq)]
pub enum DraftStoreError {
    #[error("Unknown draft '{0}'")]
    UnknownKey(String),

    #[error("Invalid draft: {0}")]
    Invalid(String),

    #[error("Draft I/O error: {0}")]
    Io(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftKey {
    /// The wizard selection.
    Selection,
    /// The estimate currently open in the editor.
    CurrentEstimate,
}

impl DraftKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Selection => "pool-estimate-selection",
            Self::CurrentEstimate => "mos-pool-current-estimate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pool-estimate-selection" => Some(Self::Selection),
            "mos-pool-current-estimate" => Some(Self::CurrentEstimate),
            _ => None,
        }
    }

    /// A selection draft must deserialize as a [`Selection`]; the current
    /// estimate is stored as given.
    fn check(
        &self,
        value: &Value,
    ) -> Result<(), DraftStoreError> {
        match self {
            Self::Selection => serde_json::from_value::<Selection>(value.clone())
                .map(|_| ())
                .map_err(|e| DraftStoreError::Invalid(e.to_string())),
            Self::CurrentEstimate if value.is_object() => Ok(()),
            Self::CurrentEstimate => Err(DraftStoreError::Invalid(
                "current estimate must be a JSON object".to_string(),
            )),
        }
    }
}

pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file(
        &self,
        key: DraftKey,
    ) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }

    /// The stored draft, or `None` when nothing readable is stored.
    pub async fn get(
        &self,
        key: DraftKey,
    ) -> Option<Value> {
        let path = self.file(key);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) => {
                debug!(key = key.as_str(), error = %e, "No stored draft");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "Stored draft is not valid JSON");
                None
            }
        }
    }

    pub async fn put(
        &self,
        key: DraftKey,
        value: &Value,
    ) -> Result<(), DraftStoreError> {
        key.check(value)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DraftStoreError::Io(e.to_string()))?;
        let text =
            serde_json::to_string_pretty(value).map_err(|e| DraftStoreError::Invalid(e.to_string()))?;
        tokio::fs::write(self.file(key), text)
            .await
            .map_err(|e| DraftStoreError::Io(e.to_string()))?;
        info!(key = key.as_str(), "Draft saved");
        Ok(())
    }

    /// Returns whether a draft was stored.
    pub async fn clear(
        &self,
        key: DraftKey,
    ) -> Result<bool, DraftStoreError> {
        match tokio::fs::remove_file(self.file(key)).await {
            Ok(()) => {
                info!(key = key.as_str(), "Draft cleared");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DraftStoreError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn key_round_trips_through_str() {
        for key in [DraftKey::Selection, DraftKey::CurrentEstimate] {
            assert_eq!(DraftKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(DraftKey::parse("theme"), None);
    }

    #[tokio::test]
    async fn put_get_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = DraftStore::new(dir.path().join("drafts"));
        let selection = json!({
            "material": {"id": "composite", "name": "Композит"},
            "bowl": {"name": "Чаша 6x3", "price": "450000"}
        });

        assert_eq!(store.get(DraftKey::Selection).await, None);

        store.put(DraftKey::Selection, &selection).await.unwrap();
        assert_eq!(store.get(DraftKey::Selection).await, Some(selection));
        assert_eq!(store.get(DraftKey::CurrentEstimate).await, None);

        assert_eq!(store.clear(DraftKey::Selection).await, Ok(true));
        assert_eq!(store.clear(DraftKey::Selection).await, Ok(false));
        assert_eq!(store.get(DraftKey::Selection).await, None);
    }

    #[tokio::test]
    async fn selection_draft_must_be_a_selection() {
        let dir = tempfile::tempdir().unwrap();
        let store = DraftStore::new(dir.path());

        let result = store
            .put(DraftKey::Selection, &json!({"material": {"name": 5}}))
            .await;

        assert!(matches!(result, Err(DraftStoreError::Invalid(_))));
        assert_eq!(store.get(DraftKey::Selection).await, None);
    }

    #[tokio::test]
    async fn current_estimate_must_be_an_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = DraftStore::new(dir.path());

        assert!(matches!(
            store.put(DraftKey::CurrentEstimate, &json!([1, 2])).await,
            Err(DraftStoreError::Invalid(_))
        ));
        assert_eq!(
            store
                .put(DraftKey::CurrentEstimate, &json!({"customItems": []}))
                .await,
            Ok(())
        );
    }

    #[tokio::test]
    async fn corrupt_draft_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = DraftStore::new(dir.path());
        std::fs::write(dir.path().join("mos-pool-current-estimate.json"), "{").unwrap();

        assert_eq!(store.get(DraftKey::CurrentEstimate).await, None);
    }
}
