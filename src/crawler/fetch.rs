//! Fetching episode pages over HTTP

use reqwest::Client as ReqwestClient;
use tracing::{debug, info, instrument};
use url::Url;

use crate::crawler::content_extraction::extract_episode;
use crate::crawler::error::CrawlError;
use crate::crawler::{CrawlerConfig, EpisodePage};

/// Fetches episode pages and extracts their title and summary
#[derive(Debug, Clone)]
pub struct EpisodeCrawler {
    client: ReqwestClient,
    config: CrawlerConfig,
}

impl EpisodeCrawler {
    /// Create a crawler with the given configuration
    pub fn new(config: CrawlerConfig) -> Result<Self, CrawlError> {
        let client = ReqwestClient::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Download the page at `url` as UTF-8 text
    #[instrument(skip(self))]
    pub async fn fetch_html(&self, url: &str) -> Result<String, CrawlError> {
        let url = Url::parse(url)?;
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        debug!("Fetched {} bytes", bytes.len());
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Fetch the page at `url` and extract the episode's title and summary
    #[instrument(skip(self))]
    pub async fn fetch_episode(&self, url: &str) -> Result<EpisodePage, CrawlError> {
        let html = self.fetch_html(url).await?;
        let page = extract_episode(&html, &self.config)?;
        info!(title = %page.title, "Crawled episode page");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const PAGE: &str = r#"<html><body>
        <h1 class="page-title">ZS93: Der Schachtürke</h1>
        <div class="entry-content"><p>Wien, 1770: Wolfgang von Kempelen baut einen Automaten.</p></div>
    </body></html>"#;

    #[tokio::test]
    async fn test_fetch_episode() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/podcast/zs93/")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(PAGE)
            .expect(1)
            .create_async()
            .await;

        let crawler = EpisodeCrawler::new(CrawlerConfig::default()).unwrap();
        let page = crawler
            .fetch_episode(&format!("{}/podcast/zs93/", server.url()))
            .await
            .unwrap();

        assert_eq!(page.title, "ZS93: Der Schachtürke");
        assert!(page.summary.starts_with("Wien, 1770"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_not_found_is_a_status_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/archiv/gag999/")
            .with_status(404)
            .create_async()
            .await;

        let crawler = EpisodeCrawler::new(CrawlerConfig::default()).unwrap();
        let result = crawler
            .fetch_episode(&format!("{}/archiv/gag999/", server.url()))
            .await;
        assert!(matches!(result, Err(CrawlError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let crawler = EpisodeCrawler::new(CrawlerConfig::default()).unwrap();
        let result = crawler.fetch_episode("not a url").await;
        assert!(matches!(result, Err(CrawlError::UrlParse(_))));
    }
}
