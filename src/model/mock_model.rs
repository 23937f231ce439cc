//! # Mock Text Model for Testing
//!
//! Provides a `MockModel` that implements the `TextModel` trait for use in tests.
//! Replies are scripted in call order; every call is recorded so tests can assert
//! how many round trips happened and at which temperature.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{GatewayError, SamplingParams, TextModel};

/// One recorded gateway call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub prompt: String,
    pub params: SamplingParams,
}

#[derive(Debug, Default)]
struct MockState {
    replies: VecDeque<Result<String, GatewayError>>,
    fallback: Option<Result<String, GatewayError>>,
    calls: Vec<RecordedCall>,
}

/// A mock model for testing purposes.
///
/// Scripted replies are consumed front to back. Once they run out the fallback
/// reply is returned for every further call (an empty string if none was set).
#[derive(Debug, Clone, Default)]
pub struct MockModel {
    state: Arc<Mutex<MockState>>,
}

impl MockModel {
    /// Creates a new mock model that answers every call with an empty string.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that gives the same reply to every call.
    pub fn always(reply: Result<String, GatewayError>) -> Self {
        Self::from_state(MockState {
            fallback: Some(reply),
            ..Default::default()
        })
    }

    /// A mock that answers `text` to every call.
    pub fn always_text(text: &str) -> Self {
        Self::always(Ok(text.to_string()))
    }

    /// A mock that plays back `replies` in order.
    pub fn with_replies(replies: impl IntoIterator<Item = Result<String, GatewayError>>) -> Self {
        Self::from_state(MockState {
            replies: replies.into_iter().collect(),
            ..Default::default()
        })
    }

    fn from_state(state: MockState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Queue one more reply.
    pub async fn push_reply(&self, reply: Result<String, GatewayError>) {
        self.state.lock().await.replies.push_back(reply);
    }

    /// Every call made so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.state.lock().await.calls.len()
    }

    /// Temperatures of all calls so far, in call order.
    pub async fn temperatures(&self) -> Vec<f32> {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .map(|call| call.params.temperature())
            .collect()
    }
}

impl TextModel for MockModel {
    async fn generate(&self, prompt: &str, params: SamplingParams) -> Result<String, GatewayError> {
        let mut state = self.state.lock().await;
        state.calls.push(RecordedCall {
            prompt: prompt.to_string(),
            params,
        });
        match state.replies.pop_front() {
            Some(reply) => reply,
            None => state.fallback.clone().unwrap_or_else(|| Ok(String::new())),
        }
    }
}
