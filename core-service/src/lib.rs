//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP, settings,
//! editor) into the song-info enrichment pipeline. Editor plugins hand over the
//! dropped file's name and bytes; the service reads a fresh settings snapshot,
//! runs the pipeline and, when asked, inserts the resulting text.
//!
//! Desktop builds typically enable the `desktop-shims` feature (which depends
//! on `bridge-desktop`) and can start from [`bootstrap_desktop`].

pub mod error;

pub use error::{CoreError, Result};

pub use core_metadata::{
    AudioFile, EnrichmentReport, EnrichmentSettings, ProviderOutcome, ProviderStatus,
    SongMetadata,
};
pub use core_runtime::config::{CoreConfig, CoreConfigBuilder};

use bytes::Bytes;
use core_metadata::{EnrichmentPipeline, MetadataError, ProviderRegistry};
use core_runtime::logging::strip_path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    config: CoreConfig,
    pipeline: Arc<EnrichmentPipeline>,
}

impl CoreService {
    /// Create a new service from a validated configuration.
    pub fn new(config: CoreConfig) -> Self {
        let pipeline = EnrichmentPipeline::with_http_client(
            Arc::clone(&config.http_client),
            config.user_agent.clone(),
            config.provider_timeout,
        );
        Self::with_pipeline(config, pipeline)
    }

    /// Create a service around a custom pipeline (e.g. substituted decoders).
    pub fn with_pipeline(config: CoreConfig, pipeline: EnrichmentPipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Access the configuration the service was built with.
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Whether a dropped file is worth enriching.
    pub fn is_eligible(&self, filename: &str) -> bool {
        core_metadata::is_eligible(filename)
    }

    /// Read the current provider settings from the host store.
    pub async fn load_settings(&self) -> Result<EnrichmentSettings> {
        EnrichmentSettings::load(self.config.settings_store.as_ref())
            .await
            .map_err(|e| match e {
                MetadataError::Bridge(bridge) => CoreError::Settings(bridge.to_string()),
                other => CoreError::Metadata(other),
            })
    }

    /// Enrich a file using the settings currently in the host store.
    #[instrument(skip(self, filename, bytes), fields(file = %strip_path(filename)))]
    pub async fn enrich_file(
        &self,
        filename: &str,
        bytes: impl Into<Bytes>,
    ) -> Result<EnrichmentReport> {
        let settings = self.load_settings().await?;
        self.enrich_with_settings(&AudioFile::new(filename, bytes), &settings)
            .await
    }

    /// Enrich a file against an explicit settings snapshot.
    pub async fn enrich_with_settings(
        &self,
        file: &AudioFile,
        settings: &EnrichmentSettings,
    ) -> Result<EnrichmentReport> {
        let registry = ProviderRegistry::from_settings(settings);
        let report = self
            .pipeline
            .enrich_with_defaults(file, &registry, settings.default_artist())
            .await?;
        Ok(report)
    }

    /// Enrich a file and insert the text through the configured editor.
    ///
    /// Nothing is inserted when no provider produced text; the report still
    /// tells the host which providers failed.
    #[instrument(skip(self, filename, bytes), fields(file = %strip_path(filename)))]
    pub async fn enrich_into_editor(
        &self,
        filename: &str,
        bytes: impl Into<Bytes>,
    ) -> Result<EnrichmentReport> {
        let editor = self
            .config
            .editor
            .clone()
            .ok_or_else(|| CoreError::CapabilityMissing {
                capability: "EditorSink".to_string(),
                message: "Configure an EditorSink with CoreConfig::builder().editor(..) \
                         or insert EnrichmentReport::text yourself."
                    .to_string(),
            })?;

        let report = self.enrich_file(filename, bytes).await?;

        if report.has_text() {
            editor.insert_text(&report.text).await?;
            info!(
                invocation_id = %report.invocation_id,
                chars = report.text.chars().count(),
                "Inserted song information"
            );
        } else {
            info!(
                invocation_id = %report.invocation_id,
                "No song information found"
            );
        }

        Ok(report)
    }
}

/// Convenience bootstrapper for desktop hosts.
///
/// Opens (or creates) a JSON settings document at `settings_path` and uses
/// the reqwest-backed HTTP client.
///
/// ```ignore
/// let core = core_service::bootstrap_desktop("~/.config/song-info/data.json").await?;
/// let report = core.enrich_file("song.mp3", bytes).await?;
/// ```
#[cfg(feature = "desktop-shims")]
pub async fn bootstrap_desktop(settings_path: impl AsRef<std::path::Path>) -> Result<CoreService> {
    let settings_store = bridge_desktop::JsonSettingsStore::open(settings_path)
        .await
        .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;

    let config = CoreConfig::builder()
        .settings_store(Arc::new(settings_store))
        .build()?;

    Ok(CoreService::new(config))
}
