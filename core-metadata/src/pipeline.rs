//! End-to-end enrichment of one audio file.
//!
//! FileGate → MetadataExtractor → AggregationEngine → ResultComposer. Only a
//! rejected or undecodable file aborts the pipeline; every provider fault is
//! already folded into its outcome by the time the text is composed.

use bridge_traits::http::HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::aggregation::{AggregationEngine, ProviderOutcome, ProviderResult, ProviderStatus};
use crate::composer::compose;
use crate::error::{MetadataError, ProviderFailure, Result};
use crate::extractor::{normalize_text, AudioFile, MetadataExtractor, SongMetadata};
use crate::file_gate::is_eligible;
use crate::providers::{ProviderClient, ProviderRegistry};

/// Everything one invocation produced
#[derive(Debug, Clone)]
pub struct EnrichmentReport {
    /// Correlates log lines of one invocation
    pub invocation_id: Uuid,
    /// Metadata that was sent to providers
    pub metadata: SongMetadata,
    /// One entry per registry provider, in registry order
    pub results: Vec<ProviderResult>,
    /// Newline-joined text of all successful providers
    pub text: String,
}

impl EnrichmentReport {
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Names of providers that answered with text
    pub fn succeeded(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|r| r.outcome.is_success())
            .map(|r| r.provider.as_str())
    }

    /// Providers that were queried but produced nothing, with the reason
    pub fn failed(&self) -> impl Iterator<Item = (&str, &ProviderFailure)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            ProviderOutcome::Failure(failure) => Some((r.provider.as_str(), failure)),
            _ => None,
        })
    }

    pub fn statuses(&self) -> Vec<ProviderStatus> {
        self.results.iter().map(ProviderResult::status).collect()
    }
}

/// Composes the extraction, aggregation and composition stages
pub struct EnrichmentPipeline {
    extractor: MetadataExtractor,
    engine: AggregationEngine,
}

impl EnrichmentPipeline {
    pub fn new(extractor: MetadataExtractor, engine: AggregationEngine) -> Self {
        Self { extractor, engine }
    }

    /// Pipeline with lofty decoders and the given transport
    pub fn with_http_client(
        http_client: Arc<dyn HttpClient>,
        user_agent: impl Into<String>,
        provider_timeout: Duration,
    ) -> Self {
        let client = ProviderClient::new(http_client, user_agent)
            .with_request_timeout(provider_timeout);
        Self::new(
            MetadataExtractor::new(),
            AggregationEngine::new(client).with_provider_timeout(provider_timeout),
        )
    }

    pub fn extractor(&self) -> &MetadataExtractor {
        &self.extractor
    }

    pub fn engine(&self) -> &AggregationEngine {
        &self.engine
    }

    /// Gate and decode a file
    pub fn extract(&self, file: &AudioFile) -> Result<SongMetadata> {
        if !is_eligible(&file.filename) {
            return Err(MetadataError::UnsupportedFormat(file.filename.clone()));
        }
        self.extractor.extract(file)
    }

    /// Run the whole pipeline for one file
    pub async fn enrich(
        &self,
        file: &AudioFile,
        registry: &ProviderRegistry,
    ) -> Result<EnrichmentReport> {
        self.enrich_with_defaults(file, registry, None).await
    }

    /// Run the whole pipeline, filling a missing artist from `default_artist`
    ///
    /// The default is normalized like a decoded tag; a blank one leaves the
    /// artist unknown.
    pub async fn enrich_with_defaults(
        &self,
        file: &AudioFile,
        registry: &ProviderRegistry,
        default_artist: Option<&str>,
    ) -> Result<EnrichmentReport> {
        let invocation_id = Uuid::new_v4();
        let span = info_span!(
            "enrichment",
            %invocation_id,
            file = %core_runtime::logging::strip_path(&file.filename),
        );

        async move {
            let mut metadata = self.extract(file)?;

            if metadata.artist.is_none() {
                metadata.artist = default_artist.and_then(normalize_text);
            }

            Ok::<_, MetadataError>(self.run(invocation_id, metadata, registry).await)
        }
        .instrument(span)
        .await
    }

    /// Aggregate and compose for metadata obtained elsewhere
    pub async fn enrich_metadata(
        &self,
        metadata: SongMetadata,
        registry: &ProviderRegistry,
    ) -> EnrichmentReport {
        let invocation_id = Uuid::new_v4();
        let span = info_span!("enrichment", %invocation_id);
        self.run(invocation_id, metadata, registry)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        invocation_id: Uuid,
        metadata: SongMetadata,
        registry: &ProviderRegistry,
    ) -> EnrichmentReport {
        let results = self.engine.aggregate(&metadata, registry).await;
        let text = compose(&results);

        info!(
            text_len = text.len(),
            providers = results.len(),
            "Enrichment finished"
        );

        EnrichmentReport {
            invocation_id,
            metadata,
            results,
            text,
        }
    }
}

impl std::fmt::Debug for EnrichmentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentPipeline")
            .field("extractor", &self.extractor)
            .field("provider_timeout", &self.engine.provider_timeout())
            .finish()
    }
}
