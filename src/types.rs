//! Core types for newshub

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// News category selectable in the feed
///
/// `All` places no category restriction. The remaining variants correspond to
/// the pill-style filters a presentation layer renders; whether a variant
/// restricts the upstream query depends on the configured category-to-source
/// table (see [`Config::category_sources`](crate::Config::category_sources)).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// No category restriction (default)
    #[default]
    All,
    /// Politics and world affairs
    Politics,
    /// Technology
    Technology,
    /// Sports
    Sports,
    /// Business and finance
    Business,
    /// Entertainment
    Entertainment,
    /// Health
    Health,
}

impl Category {
    /// Every category, in presentation order
    pub const ALL: [Category; 7] = [
        Category::All,
        Category::Politics,
        Category::Technology,
        Category::Sports,
        Category::Business,
        Category::Entertainment,
        Category::Health,
    ];

    /// Lowercase name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Politics => "politics",
            Category::Technology => "technology",
            Category::Sports => "sports",
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing a [`Category`] from a string fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(String);

impl std::str::FromStr for Category {
    type Err = ParseCategoryError;

    /// Case-insensitive parse of a category name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Category::All),
            "politics" => Ok(Category::Politics),
            "technology" => Ok(Category::Technology),
            "sports" => Ok(Category::Sports),
            "business" => Ok(Category::Business),
            "entertainment" => Ok(Category::Entertainment),
            "health" => Ok(Category::Health),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

/// Active filter combination
///
/// The filter is the pagination identity: any change to either field
/// invalidates every previously fetched page. An empty `search_term` means no
/// term is set. The default value is the reset state (`All`, no term).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    /// Selected category
    #[serde(default)]
    pub category: Category,

    /// Free-text search term (empty = unset)
    #[serde(default)]
    pub search_term: String,
}

impl Filter {
    /// Create a filter from a category and search term
    pub fn new(category: Category, search_term: impl Into<String>) -> Self {
        Self {
            category,
            search_term: search_term.into(),
        }
    }
}

/// Publisher of an article, as reported by the news API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    /// Upstream source identifier (absent for unindexed publishers)
    pub id: Option<String>,

    /// Human-readable publisher name
    pub name: String,
}

/// A single news article
///
/// Field names follow the upstream JSON (camelCase on the wire). Articles are
/// immutable once fetched; the `url` is the closest thing to an identifier
/// the upstream provides, and duplicates across pages are preserved as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Publisher information
    pub source: ArticleSource,

    /// Author byline (frequently absent)
    pub author: Option<String>,

    /// Headline
    pub title: String,

    /// Short description (absent for some publishers)
    pub description: Option<String>,

    /// Canonical link to the article
    pub url: String,

    /// Lead image URL
    pub url_to_image: Option<String>,

    /// Publication timestamp
    pub published_at: DateTime<Utc>,

    /// Truncated article body
    pub content: Option<String>,
}

/// One fetched page of results
///
/// Produced by the source adapter for a (filter, page number) pair and never
/// mutated afterwards. `next_page` is the page number a continuation fetch
/// should request; `None` ends pagination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Articles in upstream order
    pub articles: Vec<Article>,

    /// Page number to fetch next, if any
    pub next_page: Option<u32>,
}

/// Feed status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    /// Initial fetch for the active filter is outstanding
    #[default]
    Pending,
    /// The most recent fetch failed
    Error,
    /// At least one page is loaded and the last fetch succeeded
    Success,
}

/// One consistent view of the feed for rendering
///
/// Taken under a single lock so the article list, status and flags never
/// disagree with each other mid-update.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedSnapshot {
    /// Filter the snapshot belongs to
    pub filter: Filter,

    /// Current status
    pub status: FeedStatus,

    /// All fetched articles, flattened across pages in fetch order
    pub articles: Vec<Article>,

    /// Whether another page is available
    pub has_more: bool,

    /// Whether a continuation fetch is currently in flight
    pub is_fetching_more: bool,

    /// Message of the most recent failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Event emitted as the feed session changes
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A new fetch session started (filter change, first load, or reload)
    SessionReset {
        /// Filter the new session fetches for
        filter: Filter,
    },

    /// A page was fetched and appended
    PageLoaded {
        /// Page number that was fetched
        page: u32,
        /// Number of articles on this page
        article_count: usize,
        /// Total articles across the session after appending
        total_articles: usize,
    },

    /// A fetch failed (initial or continuation)
    FetchFailed {
        /// Page number that failed
        page: u32,
        /// Error message
        error: String,
    },
}
