//! Process-wide settings, read once at startup and passed down by reference.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;

use crate::error::{Error, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_WIKIPEDIA_LANG: &str = "de";
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 30;
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Page fetch and Wikipedia requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Application settings loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Gemini API key; only commands that call the model need it
    pub api_key: Option<String>,
    pub model: String,
    pub wikipedia_lang: String,
    /// Client-side limit for model calls
    pub requests_per_minute: u32,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            wikipedia_lang: DEFAULT_WIKIPEDIA_LANG.to_string(),
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Settings {
    /// Load settings from the environment, reading a `.env` file first if present
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through `lookup`, which maps a variable name to its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let requests_per_minute = match non_empty("GAG_REQUESTS_PER_MINUTE") {
            Some(value) => value.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "GAG_REQUESTS_PER_MINUTE must be a positive number, got '{}'",
                    value
                ))
            })?,
            None => defaults.requests_per_minute,
        };
        if requests_per_minute == 0 {
            return Err(Error::Config(
                "GAG_REQUESTS_PER_MINUTE must be a positive number, got '0'".to_string(),
            ));
        }

        Ok(Self {
            api_key: non_empty("GEMINI_API_KEY"),
            model: non_empty("GAG_MODEL").unwrap_or(defaults.model),
            wikipedia_lang: non_empty("GAG_WIKIPEDIA_LANG").unwrap_or(defaults.wikipedia_lang),
            requests_per_minute,
            output_dir: non_empty("GAG_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        })
    }

    /// The API key, or a configuration error naming the missing variable
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Config("GEMINI_API_KEY must be set".to_string()))
    }
}
