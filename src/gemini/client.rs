//! Client implementation for the Gemini API
//!
//! This module provides the main client interface for interacting with the Gemini API.

use crate::error::Result;
use crate::gemini::http::HttpClient;
use crate::gemini::models::ModelsService;
use crate::gemini::types::HttpOptions;

/// Client for the Gemini API
///
/// This is the main entry point for interacting with the Gemini API.
#[derive(Clone)]
pub struct Client {
    http_client: HttpClient,
}

impl Client {
    /// Create a new client with an API key for the Gemini Developer API
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, HttpOptions::default())
    }

    /// Create a new client with custom HTTP options
    pub fn with_options(api_key: impl Into<String>, options: HttpOptions) -> Result<Self> {
        let http_client = HttpClient::with_api_key_and_options(api_key.into(), options)?;
        Ok(Self { http_client })
    }

    /// Create a new client with client-side rate limiting
    ///
    /// # Examples
    ///
    /// ```
    /// use zeitsprung::gemini::Client;
    ///
    /// let client = Client::with_api_key_rate_limited("your-api-key", 30).unwrap();
    /// ```
    pub fn with_api_key_rate_limited(
        api_key: impl Into<String>,
        requests_per_minute: u32,
    ) -> Result<Self> {
        let options = HttpOptions {
            requests_per_minute: Some(requests_per_minute),
            ..Default::default()
        };
        Self::with_options(api_key, options)
    }

    /// Access the models service
    pub fn models(&self) -> ModelsService {
        ModelsService::new(self.http_client.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_with_api_key() {
        assert!(Client::with_api_key("test-api-key").is_ok());
    }

    #[test]
    fn test_client_creation_with_zero_quota_disables_limiter() {
        assert!(Client::with_api_key_rate_limited("test-api-key", 0).is_ok());
    }
}
