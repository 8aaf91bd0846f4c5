//! # newshub
//!
//! Embeddable backend for news-reader front ends: filtered search against a
//! news API with infinite-scroll pagination.
//!
//! ## Design Philosophy
//!
//! newshub is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to events, no polling required
//! - **Sensible defaults** - An API key is the only required configuration
//! - **Testable at the seams** - The article source is a trait, so the
//!   coordinator can be driven by a stub
//!
//! The crate covers the part of a news reader with an actual contract: query
//! construction against the upstream API, session-scoped pagination, filter
//! resets, stale-response discarding, and visibility-driven continuation.
//! Rendering stays with the embedding application.
//!
//! ## Quick Start
//!
//! ```no_run
//! use newshub::{Category, Config, Filter, NewsFeed, ScrollDriver};
//! use tokio::sync::watch;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let feed = NewsFeed::new(Config::new("my-api-key"))?;
//!
//!     // Subscribe to events
//!     let mut events = feed.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     // Load the first page, then narrow to a category
//!     feed.refresh().await?;
//!     feed.set_filter(Filter::new(Category::Technology, "robots")).await?;
//!
//!     // Let a visibility signal drive further pages
//!     let (visibility_tx, visibility_rx) = watch::channel(false);
//!     let shutdown = CancellationToken::new();
//!     tokio::spawn(ScrollDriver::new(feed.clone(), visibility_rx, shutdown.clone()).run());
//!
//!     // The presentation layer reports "load-more region visible"
//!     visibility_tx.send(true)?;
//!
//!     for article in feed.articles().await {
//!         println!("{}", article.title);
//!     }
//!
//!     shutdown.cancel();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Pagination coordinator
pub mod feed;
/// Visibility-driven continuation fetching
pub mod sentinel;
/// Article retrieval from the news API
pub mod source;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use feed::NewsFeed;
pub use sentinel::ScrollDriver;
pub use source::{NewsApiSource, NewsSource};
pub use types::{
    Article, ArticleSource, Category, Event, FeedSnapshot, FeedStatus, Filter, Page,
    ParseCategoryError,
};
