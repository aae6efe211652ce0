use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode {format} buffer: {message}")]
    Decode { format: String, message: String },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

pub type Result<T> = std::result::Result<T, MetadataError>;

/// Reason a single provider call produced no text.
///
/// Carried inside [`ProviderOutcome::Failure`](crate::aggregation::ProviderOutcome)
/// and never returned as an `Err` from the pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    #[error("Response contained an empty completion")]
    EmptyCompletion,

    #[error("Provider did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Provider task aborted: {0}")]
    TaskAborted(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
