//! The date-extraction loop: one baseline attempt, then bounded retries at rising temperature.

use tracing::{debug, info, instrument, warn};

use super::config::ExtractionConfig;
use super::label::DateRange;
use super::parser::ModelOutcome;
use crate::model::{SamplingParams, TextModel};
use crate::prompt::build_date_prompt;

/// One gateway round trip inside the loop. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub temperature: f32,
    /// Raw model text; `None` when the call failed
    pub raw_response: Option<String>,
    pub outcome: ModelOutcome,
}

impl Attempt {
    /// The accepted range, if this attempt produced one
    pub fn parsed(&self) -> Option<&DateRange> {
        match &self.outcome {
            ModelOutcome::Parsed(range) => Some(range),
            _ => None,
        }
    }
}

/// Result of a full run of the loop
#[derive(Debug, Clone, PartialEq)]
pub struct DateExtraction {
    /// The accepted range, or the `Unknown` sentinel pair
    pub range: DateRange,
    /// Every attempt made, baseline first
    pub attempts: Vec<Attempt>,
}

impl DateExtraction {
    pub fn succeeded(&self) -> bool {
        self.attempts.last().is_some_and(|a| a.outcome.is_parsed())
    }

    /// The outcome of the final attempt, which explains an `Unknown` result
    pub fn last_outcome(&self) -> Option<&ModelOutcome> {
        self.attempts.last().map(|a| &a.outcome)
    }
}

/// Runs the date-extraction loop against any [`TextModel`]
#[derive(Debug, Clone, Default)]
pub struct DateExtractor {
    config: ExtractionConfig,
}

impl DateExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Infer the historical time span discussed in `episode_text`.
    ///
    /// The prompt is built once and reused. The baseline attempt runs at the
    /// baseline temperature; on failure up to `max_attempts` retries follow at
    /// [`ExtractionConfig::retry_temperature`]. The first attempt whose
    /// `start_date` is a valid year wins. Transport failures, safety refusals
    /// and malformed output all use up one attempt each. When every attempt
    /// fails the result is the `Unknown` sentinel pair; this never errors.
    #[instrument(skip(self, model, episode_text), fields(max_attempts = self.config.max_attempts))]
    pub async fn run<M: TextModel>(&self, model: &M, episode_text: &str) -> DateExtraction {
        let prompt = build_date_prompt(episode_text);
        let mut attempts = Vec::with_capacity(self.config.max_attempts + 1);

        let baseline = self
            .attempt(model, &prompt, self.config.baseline_temperature, 0)
            .await;
        if let Some(range) = baseline.parsed().cloned() {
            attempts.push(baseline);
            return DateExtraction { range, attempts };
        }
        attempts.push(baseline);

        for retry in 0..self.config.max_attempts {
            let temperature = self.config.retry_temperature(retry);
            let attempt = self.attempt(model, &prompt, temperature, retry + 1).await;
            if let Some(range) = attempt.parsed().cloned() {
                attempts.push(attempt);
                return DateExtraction { range, attempts };
            }
            attempts.push(attempt);
        }

        warn!(
            attempts = attempts.len(),
            "No valid start date after all attempts, falling back to Unknown"
        );
        DateExtraction {
            range: DateRange::unknown(),
            attempts,
        }
    }

    async fn attempt<M: TextModel>(
        &self,
        model: &M,
        prompt: &str,
        temperature: f32,
        attempt: usize,
    ) -> Attempt {
        let params = SamplingParams::new(temperature)
            .json()
            .max_output_tokens(self.config.max_output_tokens);
        let temperature = params.temperature();

        let reply = model.generate(prompt, params).await;
        let outcome = ModelOutcome::classify(&reply);

        match &outcome {
            ModelOutcome::Parsed(range) => {
                info!(attempt, temperature, start = %range.start, end = %range.end, "Date range accepted")
            }
            ModelOutcome::Malformed(reason) => {
                debug!(attempt, temperature, %reason, "Model output rejected")
            }
            ModelOutcome::Transport(message) => {
                warn!(attempt, temperature, %message, "Model call failed")
            }
            ModelOutcome::SafetyRejected(reason) => {
                warn!(attempt, temperature, %reason, "Model refused to answer")
            }
        }

        Attempt {
            temperature,
            raw_response: reply.ok(),
            outcome,
        }
    }
}

/// Infer the date range of `episode_text` with default sampling settings and
/// `max_attempts` retries after the baseline attempt.
pub async fn extract_date_range<M: TextModel>(
    model: &M,
    episode_text: &str,
    max_attempts: usize,
) -> DateRange {
    let config = ExtractionConfig::builder().max_attempts(max_attempts).build();
    DateExtractor::new(config)
        .run(model, episode_text)
        .await
        .range
}
