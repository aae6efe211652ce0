//! Workspace umbrella crate.
//!
//! Re-exports the song-info core façade so host applications can depend on
//! `songinfo-workspace` and pick a feature set without wiring each crate
//! individually:
//!
//! - `desktop-shims` (default): reqwest HTTP client and JSON settings store
//! - `core`: the façade only; the host injects every bridge itself

#[cfg(any(feature = "core", feature = "desktop-shims"))]
pub use core_service::*;
