//! External Song-Information Providers
//!
//! This module holds the provider catalogue and the registry snapshot handed
//! to the aggregation engine:
//! - [`KNOWN_PROVIDERS`] - the fixed, ordered list of provider descriptors
//! - [`EnrichmentSettings`] - user-configured credentials and overrides
//! - [`ProviderRegistry`] - one [`ProviderConfig`] per known provider
//!
//! Adding a provider means adding one descriptor to [`KNOWN_PROVIDERS`].

pub mod client;

pub use client::ProviderClient;

use bridge_traits::settings::SettingsStore;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::error::Result;

/// Placeholder replaced by the URL-encoded metadata JSON
pub const METADATA_PLACEHOLDER: &str = "{metadata}";

/// Settings key holding the default artist
pub const DEFAULT_ARTIST_KEY: &str = "defaultArtist";

/// Static description of a provider the core knows how to call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Stable identifier used in settings keys
    pub name: &'static str,
    pub display_name: &'static str,
    /// Default endpoint template
    pub endpoint: &'static str,
}

/// Every known provider, in declaration order
///
/// The order here is the order of outcomes and of the merged text.
pub const KNOWN_PROVIDERS: [ProviderDescriptor; 6] = [
    ProviderDescriptor {
        name: "openai",
        display_name: "OpenAI",
        endpoint: "https://api.openai.com/v1/completions?metadata={metadata}",
    },
    ProviderDescriptor {
        name: "anthropic",
        display_name: "Anthropic",
        endpoint: "https://api.anthropic.com/v1/complete?metadata={metadata}",
    },
    ProviderDescriptor {
        name: "mistral",
        display_name: "Mistral",
        endpoint: "https://api.mistral.ai/v1/completions?metadata={metadata}",
    },
    ProviderDescriptor {
        name: "cohere",
        display_name: "Cohere",
        endpoint: "https://api.cohere.ai/v1/generate?metadata={metadata}",
    },
    ProviderDescriptor {
        name: "groq",
        display_name: "Groq",
        endpoint: "https://api.groq.com/openai/v1/completions?metadata={metadata}",
    },
    ProviderDescriptor {
        name: "perplexity",
        display_name: "Perplexity",
        endpoint: "https://api.perplexity.ai/completions?metadata={metadata}",
    },
];

/// Settings key for a provider's credential
pub fn credential_key(provider: &str) -> String {
    format!("providers.{}.credential", provider)
}

/// Settings key for a provider's endpoint override
pub fn endpoint_key(provider: &str) -> String {
    format!("providers.{}.endpoint", provider)
}

/// One provider entry in a registry snapshot
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub name: String,
    /// Bearer credential; empty means unconfigured
    pub credential: String,
    pub endpoint_template: String,
}

impl ProviderConfig {
    /// Create a provider entry. The credential is trimmed.
    pub fn new(
        name: impl Into<String>,
        credential: impl AsRef<str>,
        endpoint_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            credential: credential.as_ref().trim().to_string(),
            endpoint_template: endpoint_template.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.credential.is_empty()
    }

    /// Expand the endpoint template with already URL-encoded metadata
    ///
    /// Templates without a `{metadata}` placeholder get it appended as the
    /// `metadata` query parameter.
    pub fn endpoint_url(&self, encoded_metadata: &str) -> String {
        if self.endpoint_template.contains(METADATA_PLACEHOLDER) {
            return self
                .endpoint_template
                .replace(METADATA_PLACEHOLDER, encoded_metadata);
        }

        let separator = if self.endpoint_template.contains('?') {
            if self.endpoint_template.ends_with('?') || self.endpoint_template.ends_with('&') {
                ""
            } else {
                "&"
            }
        } else {
            "?"
        };

        format!(
            "{}{}metadata={}",
            self.endpoint_template, separator, encoded_metadata
        )
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("configured", &self.is_configured())
            .field("endpoint_template", &self.endpoint_template)
            .finish()
    }
}

/// User-configured provider settings
///
/// Credentials and endpoint overrides are keyed by provider name. Can be
/// deserialized from a host's camelCase settings document or loaded from a
/// [`SettingsStore`].
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrichmentSettings {
    pub credentials: BTreeMap<String, String>,
    pub endpoints: BTreeMap<String, String>,
    pub default_artist: Option<String>,
}

impl EnrichmentSettings {
    pub fn with_credential(
        mut self,
        provider: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        self.credentials.insert(provider.into(), credential.into());
        self
    }

    pub fn with_endpoint(
        mut self,
        provider: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.endpoints.insert(provider.into(), template.into());
        self
    }

    pub fn with_default_artist(mut self, artist: impl Into<String>) -> Self {
        self.default_artist = Some(artist.into());
        self
    }

    /// Read every known provider's keys plus the default artist
    pub async fn load(store: &dyn SettingsStore) -> Result<Self> {
        let mut settings = Self::default();

        for descriptor in KNOWN_PROVIDERS.iter() {
            if let Some(credential) = store.get_string(&credential_key(descriptor.name)).await? {
                settings
                    .credentials
                    .insert(descriptor.name.to_string(), credential);
            }
            if let Some(endpoint) = store.get_string(&endpoint_key(descriptor.name)).await? {
                settings
                    .endpoints
                    .insert(descriptor.name.to_string(), endpoint);
            }
        }

        settings.default_artist = store.get_string(DEFAULT_ARTIST_KEY).await?;

        debug!(
            credentials = settings.credentials.len(),
            endpoint_overrides = settings.endpoints.len(),
            "Loaded enrichment settings"
        );

        Ok(settings)
    }

    /// Default artist, if set to something non-blank
    pub fn default_artist(&self) -> Option<&str> {
        self.default_artist
            .as_deref()
            .map(str::trim)
            .filter(|artist| !artist.is_empty())
    }
}

impl fmt::Debug for EnrichmentSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let configured: Vec<_> = self
            .credentials
            .iter()
            .filter(|(_, credential)| !credential.trim().is_empty())
            .map(|(name, _)| name.as_str())
            .collect();

        f.debug_struct("EnrichmentSettings")
            .field("configured", &configured)
            .field("endpoints", &self.endpoints)
            .field("default_artist", &self.default_artist)
            .finish()
    }
}

/// Immutable snapshot of every known provider for one invocation
///
/// Holds one entry per descriptor, configured or not, so the engine can
/// report a `Skipped` outcome in the right slot for unconfigured ones.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<ProviderConfig>,
}

impl ProviderRegistry {
    /// Build the snapshot for [`KNOWN_PROVIDERS`] from user settings
    pub fn from_settings(settings: &EnrichmentSettings) -> Self {
        Self::from_descriptors(&KNOWN_PROVIDERS, settings)
    }

    /// Build a snapshot for an arbitrary descriptor list
    pub fn from_descriptors(
        descriptors: &[ProviderDescriptor],
        settings: &EnrichmentSettings,
    ) -> Self {
        let providers = descriptors
            .iter()
            .map(|descriptor| {
                let credential = settings
                    .credentials
                    .get(descriptor.name)
                    .map(String::as_str)
                    .unwrap_or_default();

                let endpoint = settings
                    .endpoints
                    .get(descriptor.name)
                    .map(|e| e.trim())
                    .filter(|e| !e.is_empty())
                    .unwrap_or(descriptor.endpoint);

                ProviderConfig::new(descriptor.name, credential, endpoint)
            })
            .collect();

        Self { providers }
    }

    /// Build a snapshot from explicit entries, keeping their order
    pub fn from_configs(providers: Vec<ProviderConfig>) -> Self {
        Self { providers }
    }

    /// Every entry, configured or not, in registry order
    pub fn entries(&self) -> &[ProviderConfig] {
        &self.providers
    }

    /// Only the configured entries, in registry order
    pub fn configured(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter().filter(|p| p.is_configured())
    }

    pub fn configured_count(&self) -> usize {
        self.configured().count()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        Store {}

        #[async_trait]
        impl SettingsStore for Store {
            async fn set_string(&self, key: &str, value: &str) -> BridgeResult<()>;
            async fn get_string(&self, key: &str) -> BridgeResult<Option<String>>;
            async fn delete(&self, key: &str) -> BridgeResult<()>;
            async fn list_keys(&self) -> BridgeResult<Vec<String>>;
        }
    }

    #[test]
    fn test_known_providers_are_unique_and_templated() {
        let mut names: Vec<_> = KNOWN_PROVIDERS.iter().map(|p| p.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), KNOWN_PROVIDERS.len());

        for descriptor in KNOWN_PROVIDERS.iter() {
            assert!(descriptor.endpoint.starts_with("https://"));
            assert!(descriptor.endpoint.contains(METADATA_PLACEHOLDER));
        }
    }

    #[test]
    fn test_registry_keeps_every_provider_in_order() {
        let settings = EnrichmentSettings::default().with_credential("cohere", "key");
        let registry = ProviderRegistry::from_settings(&settings);

        let names: Vec<_> = registry.entries().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "openai",
                "anthropic",
                "mistral",
                "cohere",
                "groq",
                "perplexity",
            ]
        );
        assert_eq!(registry.configured_count(), 1);
        assert_eq!(registry.configured().next().unwrap().name, "cohere");
    }

    #[test]
    fn test_blank_credentials_are_unconfigured() {
        let settings = EnrichmentSettings::default()
            .with_credential("openai", "   ")
            .with_credential("groq", "")
            .with_credential("mistral", "  sk-mistral \n");
        let registry = ProviderRegistry::from_settings(&settings);

        let configured: Vec<_> = registry.configured().collect();
        assert_eq!(configured.len(), 1);
        assert_eq!(configured[0].name, "mistral");
        assert_eq!(configured[0].credential, "sk-mistral");
    }

    #[test]
    fn test_endpoint_override_and_blank_override() {
        let settings = EnrichmentSettings::default()
            .with_endpoint("openai", "http://localhost:8080/info?m={metadata}")
            .with_endpoint("anthropic", "  ");
        let registry = ProviderRegistry::from_settings(&settings);

        assert_eq!(
            registry.entries()[0].endpoint_template,
            "http://localhost:8080/info?m={metadata}"
        );
        assert_eq!(
            registry.entries()[1].endpoint_template,
            KNOWN_PROVIDERS[1].endpoint
        );
    }

    #[test]
    fn test_endpoint_url_expansion() {
        let templated = ProviderConfig::new("a", "k", "https://x.test/info?q={metadata}");
        assert_eq!(
            templated.endpoint_url("%7B%7D"),
            "https://x.test/info?q=%7B%7D"
        );

        let bare = ProviderConfig::new("b", "k", "https://x.test/info");
        assert_eq!(
            bare.endpoint_url("%7B%7D"),
            "https://x.test/info?metadata=%7B%7D"
        );

        let with_query = ProviderConfig::new("c", "k", "https://x.test/info?v=2");
        assert_eq!(
            with_query.endpoint_url("%7B%7D"),
            "https://x.test/info?v=2&metadata=%7B%7D"
        );
    }

    #[test]
    fn test_debug_never_prints_credentials() {
        let config = ProviderConfig::new("openai", "sk-very-secret", "https://x.test");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("configured: true"));

        let settings = EnrichmentSettings::default().with_credential("openai", "sk-very-secret");
        assert!(!format!("{:?}", settings).contains("sk-very-secret"));
    }

    #[test]
    fn test_default_artist_is_trimmed() {
        assert_eq!(EnrichmentSettings::default().default_artist(), None);
        assert_eq!(
            EnrichmentSettings::default()
                .with_default_artist("   ")
                .default_artist(),
            None
        );
        assert_eq!(
            EnrichmentSettings::default()
                .with_default_artist(" Unknown Artist ")
                .default_artist(),
            Some("Unknown Artist")
        );
    }

    #[test]
    fn test_settings_deserialize_from_camel_case() {
        let json = r#"{
            "credentials": {"openai": "sk-1"},
            "endpoints": {"groq": "https://groq.test/{metadata}"},
            "defaultArtist": "Unknown Artist"
        }"#;
        let settings: EnrichmentSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.credentials.get("openai").unwrap(), "sk-1");
        assert_eq!(settings.default_artist(), Some("Unknown Artist"));

        let empty: EnrichmentSettings = serde_json::from_str("{}").unwrap();
        assert!(empty.credentials.is_empty());
    }

    #[tokio::test]
    async fn test_load_reads_expected_keys() {
        let mut store = MockStore::new();
        store
            .expect_get_string()
            .with(eq("providers.anthropic.credential"))
            .returning(|_| Ok(Some("sk-ant".to_string())));
        store
            .expect_get_string()
            .with(eq("providers.perplexity.endpoint"))
            .returning(|_| Ok(Some("https://pplx.test/{metadata}".to_string())));
        store
            .expect_get_string()
            .with(eq(DEFAULT_ARTIST_KEY))
            .returning(|_| Ok(Some("Unknown Artist".to_string())));
        store.expect_get_string().returning(|_| Ok(None));

        let settings = EnrichmentSettings::load(&store).await.unwrap();

        assert_eq!(settings.credentials.len(), 1);
        assert_eq!(settings.credentials.get("anthropic").unwrap(), "sk-ant");
        assert_eq!(
            settings.endpoints.get("perplexity").unwrap(),
            "https://pplx.test/{metadata}"
        );
        assert_eq!(settings.default_artist(), Some("Unknown Artist"));
    }

    #[tokio::test]
    async fn test_load_propagates_store_errors() {
        let mut store = MockStore::new();
        store.expect_get_string().returning(|_| {
            Err(bridge_traits::BridgeError::NotAvailable(
                "settings locked".to_string(),
            ))
        });

        let result = EnrichmentSettings::load(&store).await;
        assert!(matches!(
            result,
            Err(crate::error::MetadataError::Bridge(_))
        ));
    }
}
