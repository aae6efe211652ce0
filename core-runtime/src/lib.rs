//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the song-info core:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the enrichment crates depend
//! on. It validates the host capabilities up front and establishes the
//! logging conventions used throughout the system.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
