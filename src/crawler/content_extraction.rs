//! Content extraction functionality for the crawler module

use crate::crawler::config::CrawlerConfig;
use crate::crawler::error::CrawlError;
use crate::crawler::EpisodePage;
use scraper::{Html, Selector};
use tracing::debug;

fn parse_selector(selector: &str) -> Result<Selector, CrawlError> {
    Selector::parse(selector).map_err(|e| {
        CrawlError::HtmlParse(format!("Failed to parse selector '{}': {}", selector, e))
    })
}

/// Extract title and summary from the markup of an episode page
///
/// # Arguments
///
/// * `html` - The raw page markup
/// * `config` - Selectors and cut phrases to apply
///
/// # Returns
///
/// The episode's title (empty when the page has none) and its summary.
/// A page without the content element, or whose summary ends up empty,
/// is an extraction failure.
pub fn extract_episode(html: &str, config: &CrawlerConfig) -> Result<EpisodePage, CrawlError> {
    let document = Html::parse_document(html);

    let title_selector = parse_selector(&config.title_selector)?;
    let title = document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let content_selector = parse_selector(&config.content_selector)?;
    let paragraph_selector = parse_selector("p")?;

    let content = document.select(&content_selector).next().ok_or_else(|| {
        CrawlError::ContentExtraction(format!(
            "Content element '{}' not found",
            config.content_selector
        ))
    })?;

    let summary = content
        .select(&paragraph_selector)
        .take(config.summary_paragraphs)
        .map(|paragraph| paragraph.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");
    let summary = cut_at_phrases(&summary, &config.cut_phrases);

    if summary.is_empty() {
        return Err(CrawlError::ContentExtraction(
            "Episode summary is empty".to_string(),
        ));
    }

    debug!(title = %title, summary_len = summary.len(), "Extracted episode page");
    Ok(EpisodePage { title, summary })
}

/// Cut `text` at the first occurrence of each phrase in turn, trimming after every cut
pub fn cut_at_phrases(text: &str, phrases: &[String]) -> String {
    let mut text = text.trim();
    for phrase in phrases {
        if let Some(pos) = text.find(phrase.as_str()) {
            text = text[..pos].trim();
        }
    }
    text.to_string()
}
