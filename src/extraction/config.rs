//! # Extraction Configuration Module
//!
//! Sampling settings for the date-extraction loop and the search-term call,
//! with a builder in the same style as the crawler configuration.

use crate::model::{DEFAULT_MAX_OUTPUT_TOKENS, clamp_temperature};

/// Configuration for the extraction calls
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Temperature of the first attempt and of the first retry
    pub baseline_temperature: f32,

    /// Temperature added per retry
    pub temperature_step: f32,

    /// Upper bound for any retry temperature
    pub max_temperature: f32,

    /// Number of retries after the baseline attempt
    pub max_attempts: usize,

    /// Output token budget per call
    pub max_output_tokens: i32,

    /// Temperature of the one-shot search-term call
    pub search_term_temperature: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            baseline_temperature: 0.3,
            temperature_step: 0.1,
            max_temperature: 1.0,
            max_attempts: 4,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            search_term_temperature: 0.3,
        }
    }
}

impl ExtractionConfig {
    /// Create a new builder
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder::new()
    }

    /// Temperature of retry `retry_index` (0-based among retries):
    /// `min(baseline + step * retry_index, max_temperature)`, clamped to `[0.0, 1.0]`.
    pub fn retry_temperature(&self, retry_index: usize) -> f32 {
        let raw = self.baseline_temperature + self.temperature_step * retry_index as f32;
        clamp_temperature(raw.min(self.max_temperature))
    }
}

/// Builder for ExtractionConfig
#[derive(Debug, Default)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    pub fn baseline_temperature(mut self, temperature: f32) -> Self {
        self.config.baseline_temperature = temperature;
        self
    }

    pub fn temperature_step(mut self, step: f32) -> Self {
        self.config.temperature_step = step;
        self
    }

    pub fn max_temperature(mut self, temperature: f32) -> Self {
        self.config.max_temperature = temperature;
        self
    }

    /// Set the number of retries after the baseline attempt
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.config.max_attempts = max_attempts;
        self
    }

    pub fn max_output_tokens(mut self, max_output_tokens: i32) -> Self {
        self.config.max_output_tokens = max_output_tokens;
        self
    }

    pub fn search_term_temperature(mut self, temperature: f32) -> Self {
        self.config.search_term_temperature = temperature;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ExtractionConfig {
        self.config
    }
}
