//! Errors raised while assembling the runtime.

use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    /// The bundled HTTP client could not be constructed
    #[error("Default HTTP client unavailable: {0}")]
    HttpClient(#[source] BridgeError),
}

pub type Result<T> = std::result::Result<T, Error>;
