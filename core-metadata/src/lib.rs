//! # Song Information Enrichment
//!
//! Turns a dropped audio file into human-readable song information by asking
//! several independent providers about its tags.
//!
//! ## Overview
//!
//! This module handles:
//! - Deciding which dropped files are eligible audio (`file_gate`)
//! - Audio tag extraction from in-memory buffers (`extractor`)
//! - The provider catalogue and per-invocation registry snapshot (`providers`)
//! - Concurrent provider fan-out with per-provider isolation (`aggregation`)
//! - Merging successful answers into one text block (`composer`)
//! - Wiring the stages together (`pipeline`)

pub mod aggregation;
pub mod composer;
pub mod error;
pub mod extractor;
pub mod file_gate;
pub mod pipeline;
pub mod providers;

pub use aggregation::{AggregationEngine, ProviderOutcome, ProviderResult, ProviderStatus};
pub use composer::compose;
pub use error::{MetadataError, ProviderFailure, Result};
pub use extractor::{AudioFile, LoftyDecoder, MetadataExtractor, SongMetadata, TagDecoder};
pub use file_gate::{is_eligible, AudioFormat};
pub use pipeline::{EnrichmentPipeline, EnrichmentReport};
pub use providers::{
    EnrichmentSettings, ProviderClient, ProviderConfig, ProviderDescriptor, ProviderRegistry,
    KNOWN_PROVIDERS,
};
