//! Article retrieval from the news API.
//!
//! This module owns the single outbound HTTP call the crate makes: one GET
//! against the `/everything` endpoint per requested page. It translates the
//! active filter into query parameters, normalizes the response into a
//! [`Page`], and collapses every failure mode into the crate's one fetch
//! error. The [`NewsSource`] trait is the seam the feed coordinator consumes,
//! so coordinator tests can run against a scripted source instead of HTTP.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{Article, Filter, Page};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// Source of paginated article data
///
/// The coordinator talks to its source through this trait (trait object for
/// pluggable implementations).
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch one page of articles for a filter
    ///
    /// `page` is 1-based. Implementations decide whether the returned
    /// [`Page::next_page`] advances or ends pagination.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] when the page could not be retrieved.
    async fn fetch_page(&self, filter: &Filter, page: u32) -> Result<Page>;
}

/// Response envelope of the news API
///
/// Success bodies carry `status: "ok"` and the article list; failure bodies
/// carry `status: "error"` and a message. Unknown fields (totals, error
/// codes) are ignored.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<Article>,
    message: Option<String>,
}

/// Adapter for the news API `/everything` endpoint
///
/// Holds the validated configuration and a reqwest client built once at
/// construction. Cheap to clone via the feed's `Arc`.
#[derive(Debug)]
pub struct NewsApiSource {
    /// Validated configuration (API key, endpoint, query defaults)
    config: Config,

    /// HTTP client for article requests
    http_client: reqwest::Client,
}

impl NewsApiSource {
    /// Create a new source adapter
    ///
    /// # Arguments
    /// * `config` - Feed configuration; validated before any request is made
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the configuration is invalid or the HTTP
    /// client cannot be created
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent("newshub news client")
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {e}"),
                key: None,
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// The configuration this source was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn everything_url(&self) -> String {
        format!("{}/everything", self.config.endpoint.trim_end_matches('/'))
    }

    /// Build the query parameters for a filter and page number
    ///
    /// Policy:
    /// - a non-empty search term is always sent as `q`, whatever the category
    /// - a mapped category restricts results via `sources`; `All` and
    ///   unmapped categories send no `sources` parameter
    /// - when the request would otherwise carry neither `q` nor `sources`
    ///   (empty term with no source restriction), the configured fallback
    ///   query is sent instead, since the upstream rejects unconstrained
    ///   requests
    fn build_query(&self, filter: &Filter, page: u32) -> Vec<(&'static str, String)> {
        let sources = self.config.sources_for(filter.category);

        let mut params = Vec::with_capacity(8);

        if !filter.search_term.is_empty() {
            params.push(("q", filter.search_term.clone()));
        } else if sources.is_none() {
            params.push(("q", self.config.fallback_query.clone()));
        }

        if let Some(sources) = sources {
            params.push(("sources", sources.to_string()));
        }

        params.push(("searchIn", self.config.search_in.clone()));
        params.push(("sortBy", self.config.sort_by.clone()));
        params.push(("language", self.config.language.clone()));
        params.push(("pageSize", self.config.page_size.to_string()));
        params.push(("page", page.to_string()));
        params.push(("apiKey", self.config.api_key.clone()));

        params
    }

    fn next_page_after(&self, page: u32, returned: usize) -> Option<u32> {
        if self.config.detect_end_of_results && (returned as u64) < u64::from(self.config.page_size)
        {
            return None;
        }
        Some(page + 1)
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    async fn fetch_page(&self, filter: &Filter, page: u32) -> Result<Page> {
        let url = self.everything_url();
        let params = self.build_query(filter, page);

        debug!(
            page,
            category = %filter.category,
            search_term = %filter.search_term,
            "Fetching article page"
        );

        let response = self.http_client.get(&url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            // Failure bodies usually carry a useful message; fall back to the
            // bare status when they don't.
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiResponse>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_else(|| format!("news API returned HTTP {}", status.as_u16()));

            warn!(page, status = status.as_u16(), "News API request failed");
            return Err(Error::fetch(message));
        }

        let body: ApiResponse = response.json().await?;

        if body.status != "ok" {
            let message = body
                .message
                .unwrap_or_else(|| "Invalid API response".to_string());
            warn!(page, %message, "News API rejected the request");
            return Err(Error::fetch(message));
        }

        let next_page = self.next_page_after(page, body.articles.len());

        debug!(
            page,
            articles = body.articles.len(),
            has_next = next_page.is_some(),
            "Fetched article page"
        );

        Ok(Page {
            articles: body.articles,
            next_page,
        })
    }
}
