//! # Episode Page Crawler Module
//!
//! This module fetches podcast episode pages and extracts the two pieces of
//! text the rest of the pipeline works with: the episode title and a short
//! summary taken from the show notes.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: request identity, timeout, selectors and cut phrases
//! - `EpisodeCrawler`: fetches a page and runs the extraction on it
//! - `extract_episode`: extraction from raw markup, usable without a network
//! - `EpisodePage`: the extracted title and summary
//!
//! A page without show notes is an extraction failure; the caller decides
//! what to record for it.

mod config;
mod content_extraction;
mod error;
mod fetch;

pub use config::{CrawlerConfig, CrawlerConfigBuilder};
pub use content_extraction::{cut_at_phrases, extract_episode};
pub use error::CrawlError;
pub use fetch::EpisodeCrawler;

use serde::{Deserialize, Serialize};

/// Title and summary of one episode page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodePage {
    /// Title of the episode, empty when the page has none
    pub title: String,

    /// First paragraphs of the show notes, without boilerplate
    pub summary: String,
}

impl EpisodePage {
    /// The text handed to the model: title and summary on labelled lines
    pub fn to_prompt_text(&self) -> String {
        format!("Titel: {}\nZusammenfassung: {}", self.title, self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_text() {
        let page = EpisodePage {
            title: "GAG270: Die Hanse".to_string(),
            summary: "Kaufleute im Ostseeraum.".to_string(),
        };
        assert_eq!(
            page.to_prompt_text(),
            "Titel: GAG270: Die Hanse\nZusammenfassung: Kaufleute im Ostseeraum."
        );
    }
}
