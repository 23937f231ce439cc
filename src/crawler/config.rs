//! # Crawler Configuration Module
//!
//! This module provides configuration options for fetching and reading episode
//! pages: request identity and timeout, the CSS selectors for title and body
//! text, and the boilerplate phrases that cut the summary short. It uses a
//! builder pattern for flexible configuration.

use std::time::Duration;

/// Configuration for the episode page crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// User agent to use for requests
    pub user_agent: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// CSS selector of the episode title
    pub title_selector: String,

    /// CSS selector of the element holding the show notes
    pub content_selector: String,

    /// Number of leading paragraphs that make up the summary
    pub summary_paragraphs: usize,

    /// The summary is cut at the first occurrence of each of these, in order
    pub cut_phrases: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("zeitsprung/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            title_selector: "h1.page-title".to_string(),
            content_selector: "div.entry-content".to_string(),
            summary_paragraphs: 2,
            cut_phrases: vec![
                "Vielen Dank".to_string(),
                "AUS UNSERER WERBUNG".to_string(),
                "Weiterlesen".to_string(),
            ],
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    /// Set the CSS selector of the title element
    pub fn title_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.title_selector = selector.into();
        self
    }

    /// Set the CSS selector of the content element
    pub fn content_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.content_selector = selector.into();
        self
    }

    /// Set how many paragraphs form the summary
    pub fn summary_paragraphs(mut self, paragraphs: usize) -> Self {
        self.config.summary_paragraphs = paragraphs;
        self
    }

    /// Set the phrases at which the summary is cut
    pub fn cut_phrases(mut self, phrases: Vec<String>) -> Self {
        self.config.cut_phrases = phrases;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Get the timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
