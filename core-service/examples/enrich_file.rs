//! Enrich an audio file from the command line.
//!
//! Credentials are read from the environment, one variable per provider:
//! `SONGINFO_OPENAI_KEY`, `SONGINFO_ANTHROPIC_KEY`, `SONGINFO_MISTRAL_KEY`,
//! `SONGINFO_COHERE_KEY`, `SONGINFO_GROQ_KEY`, `SONGINFO_PERPLEXITY_KEY`.
//! `SONGINFO_DEFAULT_ARTIST` sets the fallback artist.
//!
//! Run with:
//! ```bash
//! SONGINFO_OPENAI_KEY=sk-... cargo run --example enrich_file -- path/to/song.mp3
//!
//! # JSON logs
//! cargo run --example enrich_file -- path/to/song.flac json
//! ```

use anyhow::{bail, Context};
use bridge_desktop::JsonSettingsStore;
use bridge_traits::logging::LogLevel;
use core_metadata::providers::{credential_key, DEFAULT_ARTIST_KEY, KNOWN_PROVIDERS};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_service::{CoreConfig, CoreService, ProviderOutcome};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        bail!("usage: enrich_file <audio-file> [pretty|json|compact]");
    };

    let format = match args.get(2).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        _ => LogFormat::Pretty,
    };
    init_logging(
        LoggingConfig::default()
            .with_format(format)
            .with_level(LogLevel::Info),
    )?;

    let mut pairs: Vec<(String, String)> = KNOWN_PROVIDERS
        .iter()
        .filter_map(|descriptor| {
            let var = format!("SONGINFO_{}_KEY", descriptor.name.to_uppercase());
            env::var(var)
                .ok()
                .map(|key| (credential_key(descriptor.name), key))
        })
        .collect();
    if let Ok(artist) = env::var("SONGINFO_DEFAULT_ARTIST") {
        pairs.push((DEFAULT_ARTIST_KEY.to_string(), artist));
    }

    let config = CoreConfig::builder()
        .settings_store(Arc::new(JsonSettingsStore::from_pairs(pairs)))
        .build()?;
    let service = CoreService::new(config);

    if !service.is_eligible(path) {
        bail!("{} is not an mp3, wav or flac file", path);
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path))?;
    let report = service.enrich_file(path, bytes).await?;

    println!("{}", serde_json::to_string_pretty(&report.metadata)?);
    for result in &report.results {
        match &result.outcome {
            ProviderOutcome::Success(_) => println!("  {:<12} ok", result.provider),
            ProviderOutcome::Failure(reason) => {
                println!("  {:<12} failed: {}", result.provider, reason)
            }
            ProviderOutcome::Skipped => println!("  {:<12} not configured", result.provider),
        }
    }

    if report.has_text() {
        println!("\n{}", report.text);
    } else {
        println!("\nNo song information found.");
    }

    Ok(())
}
