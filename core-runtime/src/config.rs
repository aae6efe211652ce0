//! # Core Configuration Module
//!
//! Provides configuration management for the song-info core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! holding every host capability and tuning knob the enrichment pipeline
//! needs. It enforces fail-fast validation so a missing bridge is reported
//! when the host loads the core, not when the first file is dropped.
//!
//! ## Required Dependencies
//!
//! - `SettingsStore` - provider credentials and the default artist
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - provider requests (desktop default: reqwest)
//! - `EditorSink` - insertion of the finished text (hosts may insert themselves)
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let config = CoreConfig::builder()
//!     .settings_store(Arc::new(my_settings))
//!     .http_client(Arc::new(my_http_client))
//!     .provider_timeout(Duration::from_secs(20))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{EditorSink, HttpClient, SettingsStore};
use std::sync::Arc;
use std::time::Duration;

/// Default per-provider timeout
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest per-provider timeout accepted by validation
pub const MAX_PROVIDER_TIMEOUT: Duration = Duration::from_secs(300);

/// Default user agent sent with provider requests
pub const DEFAULT_USER_AGENT: &str = concat!("song-info-core/", env!("CARGO_PKG_VERSION"));

/// Core configuration for the song-info core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// HTTP client used for every provider request
    pub http_client: Arc<dyn HttpClient>,

    /// Host-owned settings (credentials, endpoint overrides, default artist)
    pub settings_store: Arc<dyn SettingsStore>,

    /// Destination for finished text, if the core should insert it
    pub editor: Option<Arc<dyn EditorSink>>,

    /// Upper bound on a single provider call
    pub provider_timeout: Duration,

    /// User agent sent with provider requests
    pub user_agent: String,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let editor = self.editor.as_ref().map(|_| "EditorSink { ... }");
        f.debug_struct("CoreConfig")
            .field("http_client", &"HttpClient { ... }")
            .field("settings_store", &"SettingsStore { ... }")
            .field("editor", &editor)
            .field("provider_timeout", &self.provider_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Provider timeout is non-zero and at most [`MAX_PROVIDER_TIMEOUT`]
    /// - User agent is non-empty and a valid header value
    pub fn validate(&self) -> Result<()> {
        if self.provider_timeout.is_zero() {
            return Err(Error::Config(
                "Provider timeout must be greater than 0ms".to_string(),
            ));
        }

        if self.provider_timeout > MAX_PROVIDER_TIMEOUT {
            return Err(Error::Config(format!(
                "Provider timeout exceeds maximum of {} seconds",
                MAX_PROVIDER_TIMEOUT.as_secs()
            )));
        }

        if self.user_agent.trim().is_empty() {
            return Err(Error::Config("User agent cannot be empty".to_string()));
        }

        if self.user_agent.chars().any(|c| c.is_control()) {
            return Err(Error::Config(
                "User agent cannot contain control characters".to_string(),
            ));
        }

        Ok(())
    }
}

fn settings_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "SettingsStore".to_string(),
        message: "SettingsStore implementation is required to read provider credentials. \
                 Editor plugins: wrap the plugin's settings object. \
                 Desktop: use bridge_desktop::JsonSettingsStore."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::new().map_err(Error::HttpClient)?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: enable the 'desktop-shims' feature to use ReqwestHttpClient. \
                 Other hosts: inject a platform-native adapter."
            .to_string(),
    })
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    settings_store: Option<Arc<dyn SettingsStore>>,
    editor: Option<Arc<dyn EditorSink>>,
    provider_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl CoreConfigBuilder {
    /// Sets the HTTP client implementation.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the settings store implementation (required).
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    /// Sets the editor sink that receives finished text.
    pub fn editor(mut self, editor: Arc<dyn EditorSink>) -> Self {
        self.editor = Some(editor);
        self
    }

    /// Sets the per-provider timeout.
    pub fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = Some(timeout);
        self
    }

    /// Sets the user agent sent to providers.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No `SettingsStore` was provided
    /// - No `HttpClient` was provided and no platform default is available
    /// - Tuning values are out of range
    pub fn build(self) -> Result<CoreConfig> {
        let settings_store = self
            .settings_store
            .ok_or_else(settings_store_missing_error)?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let config = CoreConfig {
            http_client,
            settings_store,
            editor: self.editor,
            provider_timeout: self.provider_timeout.unwrap_or(DEFAULT_PROVIDER_TIMEOUT),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        };

        config.validate()?;

        Ok(config)
    }
}
