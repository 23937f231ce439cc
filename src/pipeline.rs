//! # Episode Pipeline
//!
//! Processes a range of episodes strictly one after another:
//! fetch the page, optionally enrich the text with a Wikipedia introduction,
//! infer the date range and append one record to the result files.
//!
//! Every episode yields exactly one record. A page that cannot be fetched or
//! read still produces an undated record in the error file.

use std::ops::RangeInclusive;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

use crate::crawler::{EpisodeCrawler, EpisodePage};
use crate::episode::{DEFAULT_BASE_URL, episode_url_with_base};
use crate::extraction::{DateExtractor, ExtractionConfig, extract_search_term_with};
use crate::knowledge::{WikiArticle, WikipediaClient};
use crate::model::TextModel;
use crate::output::{Destination, EpisodeRecord, ResultWriter, WriteError};

/// Counts for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Episodes attempted
    pub processed: usize,
    /// Records written to the success file
    pub dated: usize,
    /// Records written to the error file, or not written at all
    pub failed: usize,
}

/// One episode after its record was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedEpisode {
    pub number: u32,
    pub record: EpisodeRecord,
    pub destination: Destination,
}

/// Append the Wikipedia introduction to episode text
pub fn enrich_text(text: &str, article: &WikiArticle) -> String {
    format!(
        "{}\nWikipedia-Informationen: {}: {}",
        text, article.title, article.summary
    )
}

/// Drives episodes through crawler, enrichment, date extraction and writer
pub struct EpisodePipeline<M> {
    crawler: EpisodeCrawler,
    wikipedia: Option<WikipediaClient>,
    model: M,
    writer: ResultWriter,
    extractor: DateExtractor,
    base_url: String,
}

impl<M: TextModel> EpisodePipeline<M> {
    /// Pipeline without enrichment, using the default extraction settings
    pub fn new(crawler: EpisodeCrawler, model: M, writer: ResultWriter) -> Self {
        Self {
            crawler,
            wikipedia: None,
            model,
            writer,
            extractor: DateExtractor::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Enrich episode text through this Wikipedia client
    pub fn with_wikipedia(mut self, wikipedia: WikipediaClient) -> Self {
        self.wikipedia = Some(wikipedia);
        self
    }

    pub fn with_extraction_config(mut self, config: ExtractionConfig) -> Self {
        self.extractor = DateExtractor::new(config);
        self
    }

    /// Site the episode URLs are built for
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn writer(&self) -> &ResultWriter {
        &self.writer
    }

    /// Build the record for episode `number` without writing it
    #[instrument(skip(self), fields(episode = number))]
    pub async fn build_record(&self, number: u32) -> EpisodeRecord {
        let url = episode_url_with_base(&self.base_url, number);

        let page = match self.crawler.fetch_episode(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(%url, error = %e, "Could not read episode page");
                return EpisodeRecord::undated(String::new(), url);
            }
        };

        let text = self.episode_text(&page).await;
        let extraction = self.extractor.run(&self.model, &text).await;
        if !extraction.succeeded() {
            warn!(
                attempts = extraction.attempts.len(),
                last = extraction.last_outcome().map(|o| o.kind()).unwrap_or("none"),
                "Episode stays undated"
            );
        }

        EpisodeRecord::new(page.title, page.summary, extraction.range, url)
    }

    /// Build the record for episode `number` and append it to the matching file
    pub async fn process_episode(&self, number: u32) -> Result<ProcessedEpisode, WriteError> {
        let record = self.build_record(number).await;
        let destination = self.writer.write(&record)?;
        Ok(ProcessedEpisode {
            number,
            record,
            destination,
        })
    }

    /// Process every episode in `episodes`, in order.
    ///
    /// A failed write is logged and counted; the run continues with the next
    /// episode. When `progress` is given, every finished episode is reported
    /// with its destination, `None` meaning the write failed.
    #[instrument(skip(self, progress))]
    pub async fn run(
        &self,
        episodes: RangeInclusive<u32>,
        progress: Option<mpsc::Sender<(u32, Option<Destination>)>>,
    ) -> RunSummary {
        let mut summary = RunSummary::default();

        for number in episodes {
            summary.processed += 1;
            let destination = match self.process_episode(number).await {
                Ok(processed) => {
                    match processed.destination {
                        Destination::Dated => summary.dated += 1,
                        Destination::Errors => summary.failed += 1,
                    }
                    Some(processed.destination)
                }
                Err(e) => {
                    error!(episode = number, error = %e, "Failed to write episode record");
                    summary.failed += 1;
                    None
                }
            };

            if let Some(sender) = &progress {
                let _ = sender.send((number, destination)).await;
            }
        }

        info!(
            processed = summary.processed,
            dated = summary.dated,
            failed = summary.failed,
            "Finished episode range"
        );
        summary
    }

    async fn episode_text(&self, page: &EpisodePage) -> String {
        let text = page.to_prompt_text();
        let Some(wikipedia) = &self.wikipedia else {
            return text;
        };

        let Some(term) =
            extract_search_term_with(&self.model, &text, self.extractor.config()).await
        else {
            return text;
        };

        match wikipedia.lookup(&term).await {
            Ok(outcome) => match outcome.into_article() {
                Some(article) => enrich_text(&text, &article),
                None => text,
            },
            Err(e) => {
                warn!(%term, error = %e, "Wikipedia lookup failed");
                text
            }
        }
    }
}
