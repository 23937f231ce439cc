//! One-shot search-term extraction for the encyclopedia lookup.

use tracing::{debug, instrument, warn};

use super::config::ExtractionConfig;
use crate::model::{SamplingParams, TextModel};
use crate::prompt::build_search_term_prompt;

/// Ask the model for one encyclopedia search phrase describing `episode_text`.
///
/// Single attempt, no validation. Any failure (transport, safety refusal,
/// empty answer) yields `None`, meaning "skip enrichment".
#[instrument(skip(model, episode_text, config))]
pub async fn extract_search_term_with<M: TextModel>(
    model: &M,
    episode_text: &str,
    config: &ExtractionConfig,
) -> Option<String> {
    let prompt = build_search_term_prompt(episode_text);
    let params = SamplingParams::new(config.search_term_temperature)
        .max_output_tokens(config.max_output_tokens);

    match model.generate(&prompt, params).await {
        Ok(text) => {
            let term = text.trim();
            if term.is_empty() {
                debug!("Model returned an empty search term");
                None
            } else {
                debug!(term, "Extracted search term");
                Some(term.to_string())
            }
        }
        Err(e) => {
            warn!(error = %e, "Search term extraction failed");
            None
        }
    }
}

/// [`extract_search_term_with`] using the default extraction settings
pub async fn extract_search_term<M: TextModel>(model: &M, episode_text: &str) -> Option<String> {
    extract_search_term_with(model, episode_text, &ExtractionConfig::default()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GatewayError, MockModel};

    #[tokio::test]
    async fn test_returns_trimmed_text_from_one_call() {
        let model = MockModel::always_text("  Schlacht bei Carrhae\n");
        let term = extract_search_term(&model, "Crassus gegen die Parther").await;

        assert_eq!(term.as_deref(), Some("Schlacht bei Carrhae"));
        let calls = model.calls().await;
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].params.wants_json());
        assert!(calls[0].prompt.contains("Crassus gegen die Parther"));
    }

    #[tokio::test]
    async fn test_failures_yield_none_without_retry() {
        for reply in [
            Err(GatewayError::Transport("dns".into())),
            Err(GatewayError::SafetyRejected("SAFETY".into())),
            Err(GatewayError::EmptyResponse),
            Ok("   ".to_string()),
        ] {
            let model = MockModel::always(reply);
            assert_eq!(extract_search_term(&model, "text").await, None);
            assert_eq!(model.call_count().await, 1);
        }
    }
}
