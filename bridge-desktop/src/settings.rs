//! Settings Storage backed by a flat JSON document

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    settings::SettingsStore,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

/// JSON settings store implementation
///
/// Keeps every setting as a string in a flat JSON object. When opened from a
/// path, each write rewrites the whole document, which matches how editor
/// plugins persist their `data.json`.
pub struct JsonSettingsStore {
    path: Option<PathBuf>,
    values: RwLock<BTreeMap<String, String>>,
}

impl JsonSettingsStore {
    /// Create a store that lives only in memory
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create an in-memory store pre-populated with `pairs`
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            path: None,
            values: RwLock::new(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Open (or lazily create) a store persisted at `path`
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let values = match tokio::fs::read(&path).await {
            Ok(data) => Self::parse_document(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(BridgeError::Io(e)),
        };

        debug!(keys = values.len(), "Opened settings document");

        Ok(Self {
            path: Some(path),
            values: RwLock::new(values),
        })
    }

    fn parse_document(data: &[u8]) -> Result<BTreeMap<String, String>> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }

        let document: Map<String, Value> = serde_json::from_slice(data).map_err(|e| {
            BridgeError::OperationFailed(format!("Settings document is not a JSON object: {}", e))
        })?;

        Ok(document
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(s) => Some((key, s)),
                Value::Null => None,
                other => Some((key, other.to_string())),
            })
            .collect())
    }

    async fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(values).map_err(|e| {
            BridgeError::OperationFailed(format!("Failed to serialize settings: {}", e))
        })?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value.to_string());
        self.persist(&values).await
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().await;
        if values.remove(key).is_some() {
            self.persist(&values).await?;
        }
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.values.read().await.keys().cloned().collect())
    }
}
