//! Provider Fan-Out / Fan-In
//!
//! The [`AggregationEngine`] queries every configured provider concurrently
//! and waits for all of them, whatever their individual outcome. Each
//! provider runs as its own tokio task with its own timeout, so a slow,
//! failing or panicking provider cannot cancel or corrupt the others.
//!
//! ## Guarantees
//!
//! - Exactly one [`ProviderResult`] per registry entry, in registry order
//! - Unconfigured entries are `Skipped` without any network call
//! - Provider faults become `Failure` outcomes; `aggregate` itself never fails
//! - One attempt per provider; no retries, no backoff

use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, instrument, warn};

use crate::error::ProviderFailure;
use crate::extractor::SongMetadata;
use crate::providers::{ProviderClient, ProviderConfig, ProviderRegistry};

pub use core_runtime::config::DEFAULT_PROVIDER_TIMEOUT;

/// Terminal state of one provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// Provider answered with non-empty text
    Success(String),
    /// Provider was queried but produced no usable text
    Failure(ProviderFailure),
    /// Provider has no credential and was not queried
    Skipped,
}

impl ProviderOutcome {
    /// Text of a successful outcome
    pub fn text(&self) -> Option<&str> {
        match self {
            ProviderOutcome::Success(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProviderOutcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ProviderOutcome::Failure(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ProviderOutcome::Skipped)
    }

    /// Short label used in logs and host status reports
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderOutcome::Success(_) => "success",
            ProviderOutcome::Failure(_) => "failure",
            ProviderOutcome::Skipped => "skipped",
        }
    }
}

impl From<Result<String, ProviderFailure>> for ProviderOutcome {
    fn from(result: Result<String, ProviderFailure>) -> Self {
        match result {
            Ok(text) => ProviderOutcome::Success(text),
            Err(failure) => ProviderOutcome::Failure(failure),
        }
    }
}

/// Outcome tagged with the provider that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResult {
    pub provider: String,
    pub outcome: ProviderOutcome,
}

/// Serializable per-provider status for host UIs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub provider: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ProviderResult {
    pub fn status(&self) -> ProviderStatus {
        ProviderStatus {
            provider: self.provider.clone(),
            status: self.outcome.kind(),
            reason: match &self.outcome {
                ProviderOutcome::Failure(failure) => Some(failure.to_string()),
                _ => None,
            },
        }
    }
}

/// Aborts the wrapped provider tasks when dropped
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Concurrent provider fan-out with full failure isolation
#[derive(Clone)]
pub struct AggregationEngine {
    client: ProviderClient,
    provider_timeout: Duration,
}

impl AggregationEngine {
    pub fn new(client: ProviderClient) -> Self {
        Self {
            client,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Override the per-provider timeout
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn provider_timeout(&self) -> Duration {
        self.provider_timeout
    }

    /// Query every configured provider and collect one outcome per entry
    ///
    /// Requests are spawned as independent tasks before any of them is
    /// awaited; the call returns once all have reached a terminal state.
    /// Dropping the returned future aborts any provider still in flight.
    /// Must be called from within a tokio runtime.
    #[instrument(
        skip_all,
        fields(providers = registry.len(), configured = registry.configured_count())
    )]
    pub async fn aggregate(
        &self,
        metadata: &SongMetadata,
        registry: &ProviderRegistry,
    ) -> Vec<ProviderResult> {
        let started = Instant::now();
        let metadata = Arc::new(metadata.clone());

        let tasks: Vec<_> = registry
            .entries()
            .iter()
            .map(|provider| {
                let handle = provider
                    .is_configured()
                    .then(|| self.spawn_query(provider.clone(), Arc::clone(&metadata)));
                (provider.name.clone(), handle)
            })
            .collect();

        let _in_flight = AbortOnDrop(
            tasks
                .iter()
                .filter_map(|(_, handle)| handle.as_ref().map(JoinHandle::abort_handle))
                .collect(),
        );

        let results = join_all(tasks.into_iter().map(|(provider, handle)| async move {
            let outcome = match handle {
                None => {
                    debug!(provider = %provider, "Provider not configured, skipping");
                    ProviderOutcome::Skipped
                }
                Some(handle) => match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!(provider = %provider, error = %e, "Provider task aborted");
                        ProviderOutcome::Failure(ProviderFailure::TaskAborted(e.to_string()))
                    }
                },
            };
            ProviderResult { provider, outcome }
        }))
        .await;

        info!(
            succeeded = results.iter().filter(|r| r.outcome.is_success()).count(),
            failed = results.iter().filter(|r| r.outcome.is_failure()).count(),
            skipped = results.iter().filter(|r| r.outcome.is_skipped()).count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Provider aggregation complete"
        );

        results
    }

    fn spawn_query(
        &self,
        provider: ProviderConfig,
        metadata: Arc<SongMetadata>,
    ) -> JoinHandle<ProviderOutcome> {
        let client = self.client.clone();
        let timeout = self.provider_timeout;

        tokio::spawn(async move {
            let started = Instant::now();
            let query = client.query(&provider, &metadata);
            let outcome = match tokio::time::timeout(timeout, query).await {
                Ok(result) => ProviderOutcome::from(result),
                Err(_) => ProviderOutcome::Failure(ProviderFailure::Timeout(timeout)),
            };

            match &outcome {
                ProviderOutcome::Failure(failure) => warn!(
                    provider = %provider.name,
                    reason = %failure,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Provider failed"
                ),
                _ => debug!(
                    provider = %provider.name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Provider answered"
                ),
            }

            outcome
        })
    }
}
