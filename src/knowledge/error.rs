//! Error types for the knowledge lookup module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for encyclopedia lookups
#[derive(Debug, Error)]
pub enum LookupError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API returned status {0}")]
    Status(u16),

    /// The API answered with JSON of an unexpected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl From<LookupError> for CrateError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Http(e) => CrateError::Http(e),
            _ => CrateError::Lookup(err.to_string()),
        }
    }
}
