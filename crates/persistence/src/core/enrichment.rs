//! Label enrichment.
//!
//! Producers often send an operation type code without its display text.
//! Before a record is written the service looks the code up in a dictionary
//! and fills the label in.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use crate::error::{BackendError, StorageResult};

/// Resolves codes to human readable labels.
#[async_trait]
pub trait LabelResolver: Send + Sync {
    /// Looks up a single code.
    async fn resolve_label(&self, code: &str) -> StorageResult<Option<String>>;

    /// Returns the whole code to label mapping.
    ///
    /// Batch writes call this once instead of [`resolve_label`] per record.
    ///
    /// [`resolve_label`]: LabelResolver::resolve_label
    async fn resolve_all_labels(&self) -> StorageResult<HashMap<String, String>>;
}

/// A [`LabelResolver`] backed by a fixed in-process dictionary.
#[derive(Debug, Clone, Default)]
pub struct DictionaryLabelResolver {
    labels: HashMap<String, String>,
}

impl DictionaryLabelResolver {
    /// Creates a resolver over the given mapping.
    pub fn new<I, K, V>(labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            labels: labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Creates a resolver that knows no labels.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads a JSON object of `code -> label` from a file.
    pub fn from_json_file(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| BackendError::Internal {
            backend_name: "dictionary".to_string(),
            message: format!("failed to read {}: {}", path.display(), e),
            source: Some(Box::new(e)),
        })?;
        let labels: HashMap<String, String> = serde_json::from_str(&raw)?;
        tracing::debug!(path = %path.display(), count = labels.len(), "Loaded label dictionary");
        Ok(Self { labels })
    }

    /// Number of known codes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if no codes are known.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[async_trait]
impl LabelResolver for DictionaryLabelResolver {
    async fn resolve_label(&self, code: &str) -> StorageResult<Option<String>> {
        Ok(self.labels.get(code).cloned())
    }

    async fn resolve_all_labels(&self) -> StorageResult<HashMap<String, String>> {
        Ok(self.labels.clone())
    }
}
