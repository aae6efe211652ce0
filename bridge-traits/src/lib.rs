//! # Host Bridge Traits
//!
//! Capability traits the host application must provide to the song-info core.
//!
//! ## Overview
//!
//! The enrichment core never talks to the network, the settings file or the
//! open document directly. Each of those is a trait defined here and
//! implemented by the host (or by `bridge-desktop` for native builds).
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - One-shot async HTTP requests to providers
//! - [`SettingsStore`](settings::SettingsStore) - Host-owned key-value preferences
//! - [`EditorSink`](editor::EditorSink) - Insert finished text at the cursor
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform-specific errors into it with actionable messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single handle can be shared by
//! concurrently running provider tasks.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         todo!()
//!     }
//! }
//! ```

pub mod editor;
pub mod error;
pub mod http;
pub mod logging;
pub mod settings;

pub use error::BridgeError;

pub use editor::EditorSink;
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use settings::SettingsStore;
