//! Fan-out/fan-in behaviour across the full provider catalogue

mod common;

use common::ScriptedProviders;
use core_metadata::{
    compose, AggregationEngine, EnrichmentSettings, ProviderClient, ProviderConfig,
    ProviderFailure, ProviderOutcome, ProviderRegistry, SongMetadata, KNOWN_PROVIDERS,
};
use std::sync::Arc;
use std::time::Duration;

fn engine(http: &Arc<ScriptedProviders>) -> AggregationEngine {
    AggregationEngine::new(ProviderClient::new(http.clone(), "aggregation-tests"))
}

fn unknown_artist() -> SongMetadata {
    SongMetadata {
        artist: Some("Unknown Artist".to_string()),
        ..SongMetadata::default()
    }
}

/// Settings where the first `n` known providers answer with their own name
fn first_n_configured(n: usize) -> EnrichmentSettings {
    KNOWN_PROVIDERS
        .iter()
        .take(n)
        .fold(EnrichmentSettings::default(), |settings, descriptor| {
            settings
                .with_credential(descriptor.name, format!("key-{}", descriptor.name))
                .with_endpoint(
                    descriptor.name,
                    format!("https://ok-{}.test/{{metadata}}", descriptor.name),
                )
        })
}

#[tokio::test(start_paused = true)]
async fn test_one_outcome_per_provider_for_every_configured_count() {
    for n in 0..=KNOWN_PROVIDERS.len() {
        let http = Arc::new(ScriptedProviders::new());
        let registry = ProviderRegistry::from_settings(&first_n_configured(n));

        let results = engine(&http).aggregate(&unknown_artist(), &registry).await;

        assert_eq!(results.len(), KNOWN_PROVIDERS.len());
        for (result, descriptor) in results.iter().zip(KNOWN_PROVIDERS.iter()) {
            assert_eq!(result.provider, descriptor.name);
        }
        assert_eq!(results.iter().filter(|r| r.outcome.is_success()).count(), n);
        assert_eq!(
            results.iter().filter(|r| r.outcome.is_skipped()).count(),
            KNOWN_PROVIDERS.len() - n
        );
        assert_eq!(http.calls(), n);
    }
}

#[tokio::test(start_paused = true)]
async fn test_nothing_configured_yields_six_skipped_and_empty_text() {
    let http = Arc::new(ScriptedProviders::new());
    let registry = ProviderRegistry::from_settings(&EnrichmentSettings::default());

    let results = engine(&http).aggregate(&unknown_artist(), &registry).await;

    assert_eq!(results.len(), 6);
    for result in &results {
        assert_eq!(result.outcome, ProviderOutcome::Skipped);
    }
    assert_eq!(compose(&results), "");
    assert_eq!(http.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_single_configured_provider_text_is_exact() {
    const ENDPOINT: &str = "https://ok-A_song_by_Unknown_Artist.test/{metadata}";
    let http = Arc::new(ScriptedProviders::new());
    let settings = EnrichmentSettings::default()
        .with_credential("mistral", "sk-mistral")
        .with_endpoint("mistral", ENDPOINT);
    let registry = ProviderRegistry::from_settings(&settings);

    let results = engine(&http).aggregate(&unknown_artist(), &registry).await;

    assert_eq!(compose(&results), "A song by Unknown Artist");
    assert_eq!(results.iter().filter(|r| r.outcome.is_skipped()).count(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_body_contributes_nothing() {
    let http = Arc::new(ScriptedProviders::new());
    let registry = ProviderRegistry::from_configs(vec![
        ProviderConfig::new("good", "k", "https://ok-X.test/{metadata}"),
        ProviderConfig::new("bad", "k", "https://malformed.test/{metadata}"),
    ]);

    let results = engine(&http).aggregate(&unknown_artist(), &registry).await;

    assert!(matches!(
        results[1].outcome,
        ProviderOutcome::Failure(ProviderFailure::MalformedBody(_))
    ));
    assert_eq!(compose(&results), "X");
}

#[tokio::test(start_paused = true)]
async fn test_failing_provider_does_not_affect_the_others() {
    let hosts = ["ok-a.test", "ok-b.test", "ok-c.test", "ok-d.test"];

    for failing in 0..hosts.len() {
        for broken_host in ["down.test", "malformed.test", "error.test"] {
            let http = Arc::new(ScriptedProviders::new());
            let registry = ProviderRegistry::from_configs(
                hosts
                    .iter()
                    .enumerate()
                    .map(|(i, host)| {
                        let host = if i == failing { broken_host } else { host };
                        ProviderConfig::new(
                            format!("p{i}"),
                            "k",
                            format!("https://{host}/{{metadata}}"),
                        )
                    })
                    .collect(),
            );

            let results = engine(&http).aggregate(&unknown_artist(), &registry).await;

            for (i, result) in results.iter().enumerate() {
                if i == failing {
                    assert!(result.outcome.is_failure(), "{broken_host} should fail");
                } else {
                    let expected = hosts[i].trim_start_matches("ok-").trim_end_matches(".test");
                    assert_eq!(result.outcome.text(), Some(expected));
                }
            }
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_requests_run_concurrently() {
    let http = Arc::new(ScriptedProviders::new());
    let registry = ProviderRegistry::from_settings(&first_n_configured(6));

    let results = engine(&http).aggregate(&unknown_artist(), &registry).await;

    assert!(results.iter().all(|r| r.outcome.is_success()));
    assert_eq!(http.max_in_flight(), 6);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_a_failure_in_its_own_slot() {
    let http = Arc::new(ScriptedProviders::new());
    let registry = ProviderRegistry::from_configs(vec![
        ProviderConfig::new("slow", "k", "https://slow.test/{metadata}"),
        ProviderConfig::new("fast", "k", "https://ok-fast.test/{metadata}"),
    ]);

    let results = engine(&http)
        .with_provider_timeout(Duration::from_secs(1))
        .aggregate(&unknown_artist(), &registry)
        .await;

    assert_eq!(
        results[0].outcome,
        ProviderOutcome::Failure(ProviderFailure::Timeout(Duration::from_secs(1)))
    );
    assert_eq!(results[1].outcome.text(), Some("fast"));
    assert_eq!(compose(&results), "fast");
}

#[tokio::test(start_paused = true)]
async fn test_repeated_runs_compose_identically() {
    let registry = ProviderRegistry::from_settings(&first_n_configured(4));

    let mut texts = Vec::new();
    for _ in 0..5 {
        let http = Arc::new(ScriptedProviders::new());
        let results = engine(&http).aggregate(&unknown_artist(), &registry).await;
        texts.push(compose(&results));
    }

    assert!(texts.iter().all(|t| t == &texts[0]));
    assert_eq!(texts[0], "openai\nanthropic\nmistral\ncohere");
}
