//! Error types for the zeitsprung crate

use thiserror::Error;

/// Result type for zeitsprung operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for zeitsprung operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Please retry after {retry_after_secs} seconds")]
    RateLimit {
        /// Seconds to wait before retrying
        retry_after_secs: u64,
    },

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Page fetching or extraction error
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Encyclopedia lookup error
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Result file error
    #[error("Write error: {0}")]
    Write(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
