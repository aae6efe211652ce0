//! Provider Completion Client
//!
//! Issues the single request made to a provider and turns whatever comes back
//! into either completion text or a typed [`ProviderFailure`].
//!
//! ## Wire Contract
//!
//! - `GET` to the provider's endpoint template, with the metadata JSON
//!   URL-encoded into the `{metadata}` placeholder
//! - `Authorization: Bearer <credential>`
//! - `Content-Type: application/json`
//! - Response body: `{"choices": [{"text": "..."}, ...]}`; the first
//!   choice's text is used
//!
//! No retries: one attempt per provider per invocation.

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::ProviderConfig;
use crate::error::ProviderFailure;
use crate::extractor::SongMetadata;

/// Longest response body echoed back inside a failure reason
const MAX_ERROR_BODY_CHARS: usize = 256;

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

/// Client shared by every provider task of an aggregation
#[derive(Clone)]
pub struct ProviderClient {
    http_client: Arc<dyn HttpClient>,
    user_agent: String,
    request_timeout: Option<Duration>,
}

impl ProviderClient {
    pub fn new(http_client: Arc<dyn HttpClient>, user_agent: impl Into<String>) -> Self {
        Self {
            http_client,
            user_agent: user_agent.into(),
            request_timeout: None,
        }
    }

    /// Ask the transport to give up after `timeout` as well
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the HTTP request for one provider
    pub fn build_request(
        &self,
        provider: &ProviderConfig,
        metadata: &SongMetadata,
    ) -> Result<HttpRequest, ProviderFailure> {
        if !provider.is_configured() {
            return Err(ProviderFailure::InvalidRequest(format!(
                "provider {} has no credential",
                provider.name
            )));
        }

        let payload = metadata.to_json().map_err(|e| {
            ProviderFailure::InvalidRequest(format!("metadata serialization: {}", e))
        })?;
        let url = provider.endpoint_url(&urlencoding::encode(&payload));

        let mut request = HttpRequest::new(HttpMethod::Get, url)
            .bearer_token(provider.credential.as_str())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("User-Agent", self.user_agent.as_str());

        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        Ok(request)
    }

    /// Query one provider for song information
    ///
    /// Returns the trimmed text of the first completion, or the reason there
    /// is none.
    pub async fn query(
        &self,
        provider: &ProviderConfig,
        metadata: &SongMetadata,
    ) -> Result<String, ProviderFailure> {
        let request = self.build_request(provider, metadata)?;

        debug!(provider = %provider.name, "Querying provider");

        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(provider = %provider.name, error = %e, "Provider request failed");
            ProviderFailure::Transport(e.to_string())
        })?;

        Self::completion_text(&response)
    }

    /// Extract the completion text from a provider response
    pub fn completion_text(response: &HttpResponse) -> Result<String, ProviderFailure> {
        if !response.is_success() {
            let body = String::from_utf8_lossy(&response.body);
            return Err(ProviderFailure::HttpStatus {
                status: response.status,
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let completion: CompletionResponse = serde_json::from_slice(&response.body)
            .map_err(|e| ProviderFailure::MalformedBody(e.to_string()))?;

        let first = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderFailure::MalformedBody("no completions returned".to_string()))?;

        let text = first.text.trim();
        if text.is_empty() {
            return Err(ProviderFailure::EmptyCompletion);
        }

        Ok(text.to_string())
    }
}
