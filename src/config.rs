//! Configuration types for newshub

use crate::error::{Error, Result};
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, time::Duration};

/// Main configuration for the news feed
///
/// Only `api_key` is required; every other field has a default matching the
/// upstream NewsAPI conventions. The whole struct serializes to flat JSON so
/// it can be loaded from a config file or assembled in code.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// API key for the news API (required, must be non-empty)
    ///
    /// Injected here rather than read from any global so two feeds can run
    /// against two keys in one process.
    pub api_key: String,

    /// Base URL of the news API (default: "https://newsapi.org/v2")
    ///
    /// The adapter appends `/everything` to this. Points at a mock server in
    /// tests.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Articles requested per page (default: 10)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Article language filter (default: "en")
    #[serde(default = "default_language")]
    pub language: String,

    /// Fields searched by the query term (default: "title,description,content")
    #[serde(default = "default_search_in")]
    pub search_in: String,

    /// Result ordering (default: "publishedAt", newest first)
    #[serde(default = "default_sort_by")]
    pub sort_by: String,

    /// Query term sent when no search term or category restricts the request
    /// (default: "news")
    ///
    /// The upstream rejects requests with neither `q` nor `sources`, so the
    /// unfiltered feed needs a non-empty query.
    #[serde(default = "default_fallback_query")]
    pub fallback_query: String,

    /// Category to source-identifier mapping (comma-separated upstream IDs)
    ///
    /// Categories absent from this table place no source restriction at all:
    /// the request is sent without a `sources` parameter. The defaults cover
    /// politics, technology, sports and business; entertainment and health
    /// are deliberately unmapped.
    #[serde(default = "default_category_sources")]
    pub category_sources: HashMap<Category, String>,

    /// HTTP request timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Treat a page shorter than `page_size` as the end of results
    /// (default: false)
    ///
    /// The upstream reports inflated totals, so by default the feed always
    /// offers a next page and lets the consumer stop scrolling. Enabling this
    /// ends pagination when a fetch returns fewer articles than requested.
    #[serde(default)]
    pub detect_end_of_results: bool,
}

impl Config {
    /// Create a configuration with the given API key and all defaults
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Source identifiers configured for a category, if any
    ///
    /// `Category::All` and unmapped categories return `None`, meaning no
    /// source restriction is applied.
    pub fn sources_for(&self, category: Category) -> Option<&str> {
        if category == Category::All {
            return None;
        }
        self.category_sources.get(&category).map(String::as_str)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the API key is empty, the page size is
    /// zero, or the endpoint is not a valid absolute URL.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::config("api_key must not be empty", "api_key"));
        }
        if self.page_size == 0 {
            return Err(Error::config("page_size must be at least 1", "page_size"));
        }
        if let Err(e) = url::Url::parse(&self.endpoint) {
            return Err(Error::config(
                format!("endpoint is not a valid URL: {e}"),
                "endpoint",
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            page_size: default_page_size(),
            language: default_language(),
            search_in: default_search_in(),
            sort_by: default_sort_by(),
            fallback_query: default_fallback_query(),
            category_sources: default_category_sources(),
            request_timeout: default_request_timeout(),
            detect_end_of_results: false,
        }
    }
}

// Default value functions
fn default_endpoint() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_language() -> String {
    "en".to_string()
}

fn default_search_in() -> String {
    "title,description,content".to_string()
}

fn default_sort_by() -> String {
    "publishedAt".to_string()
}

fn default_fallback_query() -> String {
    "news".to_string()
}

fn default_category_sources() -> HashMap<Category, String> {
    HashMap::from([
        (Category::Politics, "bbc-news,the-guardian-uk".to_string()),
        (Category::Technology, "techcrunch,wired".to_string()),
        (Category::Sports, "espn,bbc-sport".to_string()),
        (Category::Business, "bloomberg,financial-times".to_string()),
    ])
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
