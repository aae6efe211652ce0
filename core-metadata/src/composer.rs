//! Merges per-provider outcomes into the text handed to the editor.

use crate::aggregation::ProviderResult;

/// Separator placed between successful provider texts
pub const SEPARATOR: &str = "\n";

/// Join the text of every `Success` outcome, in order, with newlines.
///
/// Failures and skipped providers contribute nothing. No successes yields an
/// empty string; there is never a leading or trailing separator.
pub fn compose(results: &[ProviderResult]) -> String {
    results
        .iter()
        .filter_map(|result| result.outcome.text())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::ProviderOutcome;
    use crate::error::ProviderFailure;

    fn result(provider: &str, outcome: ProviderOutcome) -> ProviderResult {
        ProviderResult {
            provider: provider.to_string(),
            outcome,
        }
    }

    #[test]
    fn test_only_successes_are_joined_in_order() {
        let empty = ProviderOutcome::Failure(ProviderFailure::EmptyCompletion);
        let results = vec![
            result("a", ProviderOutcome::Success("first".to_string())),
            result("b", empty),
            result("c", ProviderOutcome::Skipped),
            result("d", ProviderOutcome::Success("second".to_string())),
        ];

        assert_eq!(compose(&results), "first\nsecond");
    }

    #[test]
    fn test_no_successes_is_empty() {
        assert_eq!(compose(&[]), "");

        let failed = ProviderOutcome::Failure(ProviderFailure::Transport("x".into()));
        let results = [result("a", ProviderOutcome::Skipped), result("b", failed)];
        assert_eq!(compose(&results), "");
    }

    #[test]
    fn test_single_success_has_no_separator() {
        const TEXT: &str = "A song by Unknown Artist";
        let results = vec![
            result("a", ProviderOutcome::Skipped),
            result("b", ProviderOutcome::Success(TEXT.to_string())),
            result("c", ProviderOutcome::Skipped),
        ];

        assert_eq!(compose(&results), TEXT);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let results = vec![
            result("a", ProviderOutcome::Success("x".to_string())),
            result("b", ProviderOutcome::Success("y".to_string())),
        ];

        let first = compose(&results);
        for _ in 0..10 {
            assert_eq!(compose(&results), first);
        }
    }
}
