//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `SettingsStore` backed by a JSON document, in memory or on disk
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{JsonSettingsStore, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = Arc::new(ReqwestHttpClient::new()?);
//!     let settings = Arc::new(JsonSettingsStore::open("data.json").await?);
//!
//!     // Use in core configuration
//! }
//! ```

mod http;
mod settings;

pub use http::ReqwestHttpClient;
pub use settings::JsonSettingsStore;
