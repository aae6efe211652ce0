//! Settings Storage Abstraction
//!
//! User preferences (provider credentials, endpoint overrides, the default
//! artist) are owned and persisted by the host. The core only reads them, once
//! per enrichment invocation.

use async_trait::async_trait;

use crate::error::Result;

/// Key-value settings storage trait
///
/// Abstracts platform-specific preferences/settings storage:
/// - Desktop: config files or an in-memory snapshot handed over by the host
/// - Editor plugins: the plugin's own data file
///
/// # Example
///
/// ```ignore
/// use bridge_traits::settings::SettingsStore;
///
/// async fn save_credential(store: &dyn SettingsStore) -> Result<()> {
///     store.set_string("providers.openai.credential", "sk-...").await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Store a string value
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a string value
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Delete a setting
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a setting exists
    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_string(key).await?.is_some())
    }

    /// List all setting keys
    async fn list_keys(&self) -> Result<Vec<String>>;
}
