//! Wikipedia lookups through the MediaWiki action API

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use url::Url;

use super::error::LookupError;

/// An encyclopedia article reduced to what the pipeline appends to episode text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiArticle {
    pub title: String,
    /// Plain-text introduction of the article
    pub summary: String,
}

/// What a lookup found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(WikiArticle),
    /// No search hit, or the hit has no page
    NotFound,
    /// The best hit is a disambiguation page; no candidate is picked
    Ambiguous(String),
}

impl LookupOutcome {
    /// The article, if exactly one was found
    pub fn into_article(self) -> Option<WikiArticle> {
        match self {
            LookupOutcome::Found(article) => Some(article),
            LookupOutcome::NotFound | LookupOutcome::Ambiguous(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    query: Option<PageQuery>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default)]
    pages: HashMap<String, WikiPage>,
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    title: String,
    extract: Option<String>,
    missing: Option<serde_json::Value>,
    pageprops: Option<PageProps>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    disambiguation: Option<serde_json::Value>,
}

/// Client for one language edition of Wikipedia
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: ReqwestClient,
    endpoint: Url,
}

impl WikipediaClient {
    /// Client for `https://{language}.wikipedia.org`
    pub fn new(language: &str, timeout: Duration) -> Result<Self, LookupError> {
        let endpoint = format!("https://{}.wikipedia.org/w/api.php", language);
        Self::with_endpoint(&endpoint, timeout)
    }

    /// Client for an arbitrary `api.php` endpoint
    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Result<Self, LookupError> {
        let client = ReqwestClient::builder()
            .user_agent(format!("zeitsprung/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
        })
    }

    /// Search for `term` and return the introduction of the best matching article
    #[instrument(skip(self))]
    pub async fn lookup(&self, term: &str) -> Result<LookupOutcome, LookupError> {
        let Some(title) = self.search_title(term).await? else {
            info!("No Wikipedia article found");
            return Ok(LookupOutcome::NotFound);
        };

        let outcome = self.fetch_summary(&title).await?;
        match &outcome {
            LookupOutcome::Found(article) => info!(title = %article.title, "Found Wikipedia article"),
            LookupOutcome::Ambiguous(title) => info!(%title, "Search term is ambiguous"),
            LookupOutcome::NotFound => info!(%title, "Wikipedia page is missing"),
        }
        Ok(outcome)
    }

    async fn search_title(&self, term: &str) -> Result<Option<String>, LookupError> {
        let response: SearchResponse = self
            .get(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", term),
                ("srlimit", "1"),
                ("format", "json"),
                ("utf8", "1"),
            ])
            .await?;

        Ok(response
            .query
            .and_then(|query| query.search.into_iter().next())
            .map(|hit| hit.title))
    }

    async fn fetch_summary(&self, title: &str) -> Result<LookupOutcome, LookupError> {
        let response: PageResponse = self
            .get(&[
                ("action", "query"),
                ("prop", "extracts|pageprops"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
                ("utf8", "1"),
            ])
            .await?;

        let query = response
            .query
            .ok_or_else(|| LookupError::UnexpectedResponse("missing 'query'".to_string()))?;

        let Some(page) = query
            .pages
            .into_iter()
            .filter(|(id, page)| id != "-1" && page.missing.is_none())
            .map(|(_, page)| page)
            .next()
        else {
            return Ok(LookupOutcome::NotFound);
        };

        if page
            .pageprops
            .as_ref()
            .is_some_and(|props| props.disambiguation.is_some())
        {
            return Ok(LookupOutcome::Ambiguous(page.title));
        }

        Ok(LookupOutcome::Found(WikiArticle {
            title: page.title,
            summary: page.extract.unwrap_or_default().trim().to_string(),
        }))
    }

    async fn get<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, LookupError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        debug!("Wikipedia answered with {} bytes", text.len());
        serde_json::from_str(&text).map_err(|e| LookupError::UnexpectedResponse(e.to_string()))
    }
}
