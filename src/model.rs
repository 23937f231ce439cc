//! # LLM Gateway Module
//!
//! This module provides the single seam through which prompts reach a generative model.
//!
//! ## Key Components
//!
//! - `TextModel`: the gateway trait, one prompt and one set of sampling parameters per call
//! - `SamplingParams`: temperature (clamped to `[0.0, 1.0]`), output budget and output format
//! - `GatewayError`: transport failure, safety refusal or empty answer
//! - `GeminiModel`: the production gateway backed by the Gemini REST client
//! - `MockModel`: a scripted gateway for tests
//!
//! The gateway never retries and never caches. Retrying is the caller's job.

use std::future::Future;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::gemini::Client;
use crate::gemini::prelude::{Content, GenerationConfig};

pub mod mock_model;

pub use mock_model::MockModel;

/// Nucleus sampling is left wide open; only the temperature varies between calls.
const TOP_P: f32 = 1.0;

/// Greedy top-k.
const TOP_K: i32 = 1;

/// Output budget used by both extraction steps
pub const DEFAULT_MAX_OUTPUT_TOKENS: i32 = 2048;

/// Failure categories surfaced by a gateway call
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    /// Network, timeout, HTTP status or decoding failure
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service refused to answer on content-policy grounds
    #[error("safety filter rejected the request: {0}")]
    SafetyRejected(String),

    /// The service answered without any text candidate
    #[error("model returned no text")]
    EmptyResponse,
}

impl From<crate::error::Error> for GatewayError {
    fn from(err: crate::error::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

/// Sampling parameters for one gateway call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    temperature: f32,
    max_output_tokens: i32,
    json_output: bool,
}

impl SamplingParams {
    /// Free-text output at the given temperature
    pub fn new(temperature: f32) -> Self {
        Self {
            temperature: clamp_temperature(temperature),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            json_output: false,
        }
    }

    /// Ask the service for a JSON answer
    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Override the output token budget
    pub fn max_output_tokens(mut self, max_output_tokens: i32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn output_token_budget(&self) -> i32 {
        self.max_output_tokens
    }

    pub fn wants_json(&self) -> bool {
        self.json_output
    }
}

/// Clamp a temperature into `[0.0, 1.0]`. NaN collapses to `0.0`.
pub fn clamp_temperature(temperature: f32) -> f32 {
    if temperature.is_nan() {
        0.0
    } else {
        temperature.clamp(0.0, 1.0)
    }
}

/// A generative text service
pub trait TextModel {
    /// Send one prompt, get back the raw text of the first answer candidate
    fn generate(
        &self,
        prompt: &str,
        params: SamplingParams,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;
}

/// Gateway backed by the Gemini `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiModel {
    client: Client,
    model: String,
}

impl GeminiModel {
    pub fn new(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    fn generation_config(params: SamplingParams) -> GenerationConfig {
        GenerationConfig {
            temperature: Some(params.temperature()),
            top_p: Some(TOP_P),
            top_k: Some(TOP_K),
            max_output_tokens: Some(params.output_token_budget()),
            response_mime_type: params
                .wants_json()
                .then(|| "application/json".to_string()),
        }
    }
}

impl TextModel for GeminiModel {
    #[instrument(skip(self, prompt), fields(model = %self.model, temperature = params.temperature()))]
    async fn generate(&self, prompt: &str, params: SamplingParams) -> Result<String, GatewayError> {
        let content = Content::new().with_role("user").with_text(prompt);

        let response = self
            .client
            .models()
            .generate_content(
                &self.model,
                vec![content],
                Some(Self::generation_config(params)),
            )
            .await?;

        if let Some(reason) = response.safety_block() {
            warn!(%reason, "Gemini refused to answer");
            return Err(GatewayError::SafetyRejected(reason));
        }

        match response.text() {
            Some(text) => {
                debug!("Received {} characters", text.len());
                Ok(text)
            }
            None => Err(GatewayError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::prelude::HttpOptions;
    use mockito::{Matcher, Server};

    fn gemini_for(server: &mockito::ServerGuard) -> GeminiModel {
        let options = HttpOptions {
            base_url: server.url(),
            ..Default::default()
        };
        GeminiModel::new(
            Client::with_options("test-key", options).unwrap(),
            "gemini-pro",
        )
    }

    #[test]
    fn test_temperature_is_clamped() {
        assert_eq!(SamplingParams::new(1.7).temperature(), 1.0);
        assert_eq!(SamplingParams::new(-0.2).temperature(), 0.0);
        assert_eq!(SamplingParams::new(f32::NAN).temperature(), 0.0);
        assert_eq!(SamplingParams::new(0.4).temperature(), 0.4);
    }

    #[test]
    fn test_generation_config_fixes_top_p_and_top_k() {
        let config = GeminiModel::generation_config(SamplingParams::new(0.5).json());
        assert_eq!(config.top_p, Some(1.0));
        assert_eq!(config.top_k, Some(1));
        assert_eq!(config.temperature, Some(0.5));
        assert_eq!(config.max_output_tokens, Some(2048));
        assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));

        let config = GeminiModel::generation_config(SamplingParams::new(0.5));
        assert_eq!(config.response_mime_type, None);
    }

    #[tokio::test]
    async fn test_generate_returns_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-pro:generateContent")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "generation_config": {"top_k": 1, "top_p": 1.0}
            })))
            .with_status(200)
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "Schlacht bei Carrhae"}]}}]}"#)
            .create_async()
            .await;

        let model = gemini_for(&server);
        let text = model
            .generate("prompt", SamplingParams::new(0.3))
            .await
            .unwrap();
        assert_eq!(text, "Schlacht bei Carrhae");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_reads_thinking_model_answer() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-pro:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"candidates": [{"content": {"role": "model", "parts": [
                    {"text": "Die Reformation beginnt 1517.", "thought": true},
                    {"text": "{\"start_date\": \"+1517\", ", "thoughtSignature": "CiQB"},
                    {"text": "\"end_date\": \"+1555\"}"}
                ]}, "finishReason": "STOP"}]}"#,
            )
            .create_async()
            .await;

        let model = gemini_for(&server);
        let text = model
            .generate("prompt", SamplingParams::new(0.3).json())
            .await
            .unwrap();
        assert_eq!(text, r#"{"start_date": "+1517", "end_date": "+1555"}"#);
    }

    #[tokio::test]
    async fn test_generate_surfaces_safety_rejection() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-pro:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let model = gemini_for(&server);
        let result = model.generate("prompt", SamplingParams::new(0.3)).await;
        assert_eq!(result, Err(GatewayError::SafetyRejected("SAFETY".to_string())));
    }

    #[tokio::test]
    async fn test_generate_maps_empty_and_transport_failures() {
        let mut server = Server::new_async().await;
        let _empty = server
            .mock("POST", "/v1beta/models/gemini-pro:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let model = gemini_for(&server);
        let result = model.generate("prompt", SamplingParams::new(0.3)).await;
        assert_eq!(result, Err(GatewayError::EmptyResponse));

        let _failing = server
            .mock("POST", "/v1beta/models/gemini-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;
        let options = HttpOptions {
            base_url: server.url(),
            ..Default::default()
        };
        let model = GeminiModel::new(
            Client::with_options("test-key", options).unwrap(),
            "gemini-flash",
        );
        let result = model.generate("prompt", SamplingParams::new(0.3)).await;
        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }
}
