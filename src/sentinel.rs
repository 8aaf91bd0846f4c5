//! Visibility-driven continuation fetching
//!
//! This module connects a "load-more region is visible" signal to the feed's
//! [`fetch_next`](crate::NewsFeed::fetch_next). The presentation layer owns a
//! `tokio::sync::watch::Sender<bool>` and reports visibility through it,
//! re-sending `true` after a re-render while the region is still on screen;
//! [`ScrollDriver`] consumes the receiver and fetches the next page whenever
//! the region is visible and more pages exist.
//!
//! Fetch gating (at most one continuation in flight) lives inside
//! [`NewsFeed::fetch_next`](crate::NewsFeed::fetch_next), not here, so a
//! manual "load more" control can call the same entry point concurrently
//! without breaking the invariant.
//!
//! # Example
//!
//! ```no_run
//! use newshub::{Config, NewsFeed, ScrollDriver};
//! use tokio::sync::watch;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let feed = NewsFeed::new(Config::new("my-api-key"))?;
//! feed.refresh().await?;
//!
//! let (visibility_tx, visibility_rx) = watch::channel(false);
//! let shutdown = CancellationToken::new();
//!
//! let driver = ScrollDriver::new(feed.clone(), visibility_rx, shutdown.clone());
//! let handle = tokio::spawn(driver.run());
//!
//! // The presentation layer reports visibility as the user scrolls
//! visibility_tx.send(true)?;
//!
//! // ... later, on teardown
//! shutdown.cancel();
//! handle.await?;
//! # Ok(())
//! # }
//! ```

use crate::feed::NewsFeed;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Drives automatic pagination from a visibility signal
///
/// Consumes visibility reports and invokes the feed's `fetch_next` when the
/// load-more region is visible, more pages exist, and no fetch is already in
/// flight. Fetch errors are logged and do not stop the driver; the feed
/// records them in its session either way.
pub struct ScrollDriver {
    /// Feed to fetch continuation pages on
    feed: NewsFeed,

    /// Visibility reports from the presentation layer
    visibility: watch::Receiver<bool>,

    /// Cancelled on shutdown
    shutdown: CancellationToken,
}

impl ScrollDriver {
    /// Create a driver for a feed and a visibility channel
    ///
    /// # Arguments
    /// * `feed` - Feed handle to fetch continuation pages on
    /// * `visibility` - Receiver of "load-more region visible" reports
    /// * `shutdown` - Token that stops the driver when cancelled
    pub fn new(
        feed: NewsFeed,
        visibility: watch::Receiver<bool>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            feed,
            visibility,
            shutdown,
        }
    }

    /// Run the driver event loop
    ///
    /// Processes visibility reports until the shutdown token is cancelled or
    /// the sender is dropped. Should be spawned as a tokio task.
    pub async fn run(mut self) {
        info!("Scroll driver started");

        loop {
            // Act on the current value first so a region that is already
            // visible at startup (or still visible after a fetch) triggers a
            // fetch without waiting for the next report.
            if *self.visibility.borrow_and_update() {
                self.fetch_if_needed().await;
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Scroll driver shutting down");
                    break;
                }
                changed = self.visibility.changed() => {
                    if changed.is_err() {
                        // Sender dropped; the presentation layer is gone.
                        debug!("Visibility sender dropped");
                        break;
                    }
                }
            }
        }

        info!("Scroll driver stopped");
    }

    /// Fetch the next page if the session offers one and nothing is in flight
    ///
    /// `fetch_next` enforces the at-most-one-fetch policy itself; the checks
    /// here only avoid calling it (and logging) when there is nothing to do.
    async fn fetch_if_needed(&self) {
        if !self.feed.has_more().await {
            debug!("Load-more region visible but no further pages exist");
            return;
        }
        if self.feed.is_fetching_more().await {
            debug!("Load-more region visible but a fetch is already in flight");
            return;
        }

        match self.feed.fetch_next().await {
            Ok(true) => debug!("Visibility report triggered a continuation fetch"),
            Ok(false) => debug!("Continuation fetch skipped, nothing to do"),
            Err(e) => {
                // The feed records the failure; the user retries by scrolling
                // again or via an explicit reload.
                warn!(error = %e, "Visibility-triggered fetch failed");
            }
        }
    }
}
