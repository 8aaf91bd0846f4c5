//! Pagination coordinator for the news feed.
//!
//! [`NewsFeed`] owns the fetch session: the ordered pages fetched for the
//! active filter, the feed status, and the in-flight bookkeeping that keeps
//! continuation fetches single-file. It is cloneable (all state is
//! Arc-wrapped) so a presentation layer, a scroll driver and background tasks
//! can share one feed.
//!
//! Session rules:
//! - the filter is the pagination identity; changing it discards every
//!   fetched page and restarts at page 1
//! - at most one continuation fetch is outstanding at a time; overlapping
//!   `fetch_next` calls are no-ops
//! - a continuation failure keeps the already-fetched pages and leaves the
//!   next page fetchable, so a later attempt can retry
//! - completions belonging to a superseded session are discarded via a
//!   generation counter


use crate::config::Config;
use crate::error::Result;
use crate::source::{NewsApiSource, NewsSource};
use crate::types::{Article, Event, FeedSnapshot, FeedStatus, Filter, Page};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

/// Fetch session state for the active filter
struct Session {
    /// Filter the session belongs to
    filter: Filter,
    /// Bumped on every reset; stale completions carry an older value
    generation: u64,
    /// Pages fetched so far, in fetch order
    pages: Vec<Page>,
    /// Current status
    status: FeedStatus,
    /// Whether a continuation fetch is in flight
    fetching_more: bool,
    /// Message of the most recent failure
    last_error: Option<String>,
}

impl Session {
    fn new(filter: Filter) -> Self {
        Self {
            filter,
            generation: 0,
            pages: Vec::new(),
            status: FeedStatus::Pending,
            fetching_more: false,
            last_error: None,
        }
    }

    /// Discard everything and start a fresh session for `filter`
    fn reset(&mut self, filter: Filter) {
        self.filter = filter;
        self.generation += 1;
        self.pages.clear();
        self.status = FeedStatus::Pending;
        self.fetching_more = false;
        self.last_error = None;
    }

    /// Page number a continuation fetch should request, if any
    fn next_page(&self) -> Option<u32> {
        self.pages.last().and_then(|page| page.next_page)
    }

    fn article_count(&self) -> usize {
        self.pages.iter().map(|page| page.articles.len()).sum()
    }

    fn flattened_articles(&self) -> Vec<Article> {
        self.pages
            .iter()
            .flat_map(|page| page.articles.iter().cloned())
            .collect()
    }
}

/// News feed instance (cloneable - all fields are Arc-wrapped)
///
/// # Examples
///
/// ```no_run
/// use newshub::{Category, Config, Filter, NewsFeed};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let feed = NewsFeed::new(Config::new("my-api-key"))?;
///
///     // Subscribe to events
///     let mut events = feed.subscribe();
///     tokio::spawn(async move {
///         while let Ok(event) = events.recv().await {
///             println!("Event: {:?}", event);
///         }
///     });
///
///     // Initial load, then narrow to a category
///     feed.refresh().await?;
///     feed.set_filter(Filter::new(Category::Technology, "")).await?;
///
///     for article in feed.articles().await {
///         println!("{}", article.title);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct NewsFeed {
    /// Article source (trait object for pluggable implementations)
    source: Arc<dyn NewsSource>,
    /// Fetch session for the active filter
    session: Arc<RwLock<Session>>,
    /// Event broadcast channel sender (multiple subscribers supported)
    event_tx: broadcast::Sender<Event>,
}

impl NewsFeed {
    /// Create a feed backed by the news API
    ///
    /// The feed starts with the default filter (all categories, no search
    /// term) and an empty session; call [`refresh`](Self::refresh) to load
    /// the first page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configuration
    /// is invalid.
    pub fn new(config: Config) -> Result<Self> {
        let source = Arc::new(NewsApiSource::new(config)?);
        Ok(Self::with_source(source))
    }

    /// Create a feed on top of an arbitrary article source
    pub fn with_source(source: Arc<dyn NewsSource>) -> Self {
        // Buffer sized generously; subscribers that fall behind lose the
        // oldest events, which only matters for very slow consumers.
        let (event_tx, _rx) = broadcast::channel(1000);

        Self {
            source,
            session: Arc::new(RwLock::new(Session::new(Filter::default()))),
            event_tx,
        }
    }

    /// Subscribe to feed events
    ///
    /// Each subscriber receives all events from the moment of subscription.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Restart the session for the current filter
    ///
    /// Discards every fetched page, returns the feed to `pending`, and
    /// fetches page 1 again. This is the full-reload affordance behind a
    /// "try again" control, and the way to issue the very first load.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if page 1 could not be loaded. The failure is
    /// also recorded in the session (status `error`, message in
    /// [`last_error`](Self::last_error)).
    pub async fn refresh(&self) -> Result<()> {
        let (generation, filter) = {
            let mut session = self.session.write().await;
            let filter = session.filter.clone();
            session.reset(filter.clone());
            (session.generation, filter)
        };

        info!(category = %filter.category, search_term = %filter.search_term, "Reloading feed");
        self.emit_event(Event::SessionReset {
            filter: filter.clone(),
        });

        self.load_first_page(generation, filter).await
    }

    /// Switch to a new filter combination
    ///
    /// A changed filter discards the entire session and fetches page 1 for
    /// the new combination. Setting the filter the session already has is a
    /// no-op: no pages are discarded and no request is made.
    ///
    /// Any fetch still in flight for the previous filter is implicitly
    /// superseded; its completion is discarded when it arrives.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if page 1 for the new filter could not be
    /// loaded (the session records the failure either way).
    pub async fn set_filter(&self, filter: Filter) -> Result<()> {
        let generation = {
            let mut session = self.session.write().await;
            if session.filter == filter {
                debug!(category = %filter.category, "Filter unchanged, keeping session");
                return Ok(());
            }
            session.reset(filter.clone());
            session.generation
        };

        info!(category = %filter.category, search_term = %filter.search_term, "Filter changed");
        self.emit_event(Event::SessionReset {
            filter: filter.clone(),
        });

        self.load_first_page(generation, filter).await
    }

    /// Fetch the next page of the current session
    ///
    /// No-ops (returning `Ok(false)`) when a continuation fetch is already
    /// in flight, or when the session has no next page: before the first
    /// page has loaded, after the initial load failed, or once pagination
    /// has ended. At most one continuation fetch is outstanding at any time,
    /// however many callers race on this method.
    ///
    /// # Returns
    ///
    /// `Ok(true)` when a page was fetched and appended, `Ok(false)` when
    /// there was nothing to do.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when the request fails. Previously fetched
    /// pages are kept, the status moves to `error`, and the same page stays
    /// fetchable so a later call can retry.
    pub async fn fetch_next(&self) -> Result<bool> {
        let (generation, filter, page) = {
            let mut session = self.session.write().await;
            if session.fetching_more {
                debug!("Continuation fetch already in flight");
                return Ok(false);
            }
            let Some(page) = session.next_page() else {
                debug!("No next page to fetch");
                return Ok(false);
            };
            session.fetching_more = true;
            (session.generation, session.filter.clone(), page)
        };

        let result = self.source.fetch_page(&filter, page).await;

        let mut session = self.session.write().await;
        if session.generation != generation {
            // The session was reset while this fetch was in flight. The
            // reset already cleared the in-flight flag; the result belongs
            // to a dead session.
            debug!(page, "Discarding stale continuation fetch");
            return Ok(false);
        }
        session.fetching_more = false;

        match result {
            Ok(fetched) => {
                let article_count = fetched.articles.len();
                session.pages.push(fetched);
                session.status = FeedStatus::Success;
                session.last_error = None;
                let total_articles = session.article_count();
                drop(session);

                info!(page, articles = article_count, "Loaded continuation page");
                self.emit_event(Event::PageLoaded {
                    page,
                    article_count,
                    total_articles,
                });
                Ok(true)
            }
            Err(e) => {
                session.status = FeedStatus::Error;
                session.last_error = Some(e.to_string());
                drop(session);

                warn!(page, error = %e, "Continuation fetch failed");
                self.emit_event(Event::FetchFailed {
                    page,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// All fetched articles, flattened across pages in fetch order
    ///
    /// No de-duplication and no reordering: the list is exactly the
    /// concatenation of each page's articles.
    pub async fn articles(&self) -> Vec<Article> {
        self.session.read().await.flattened_articles()
    }

    /// Whether the session offers another page
    pub async fn has_more(&self) -> bool {
        self.session.read().await.next_page().is_some()
    }

    /// Whether a continuation fetch is currently in flight
    pub async fn is_fetching_more(&self) -> bool {
        self.session.read().await.fetching_more
    }

    /// Current feed status
    pub async fn status(&self) -> FeedStatus {
        self.session.read().await.status
    }

    /// Message of the most recent failure, if any
    pub async fn last_error(&self) -> Option<String> {
        self.session.read().await.last_error.clone()
    }

    /// The active filter
    pub async fn filter(&self) -> Filter {
        self.session.read().await.filter.clone()
    }

    /// One consistent view of the whole feed
    ///
    /// Everything a presentation layer renders, read under a single lock so
    /// the fields never disagree with each other.
    pub async fn snapshot(&self) -> FeedSnapshot {
        let session = self.session.read().await;
        FeedSnapshot {
            filter: session.filter.clone(),
            status: session.status,
            articles: session.flattened_articles(),
            has_more: session.next_page().is_some(),
            is_fetching_more: session.fetching_more,
            error: session.last_error.clone(),
        }
    }

    /// Fetch page 1 for a freshly reset session
    async fn load_first_page(&self, generation: u64, filter: Filter) -> Result<()> {
        let result = self.source.fetch_page(&filter, 1).await;

        let mut session = self.session.write().await;
        if session.generation != generation {
            debug!("Discarding stale initial fetch");
            return Ok(());
        }

        match result {
            Ok(fetched) => {
                let article_count = fetched.articles.len();
                session.pages.push(fetched);
                session.status = FeedStatus::Success;
                session.last_error = None;
                let total_articles = session.article_count();
                drop(session);

                info!(articles = article_count, "Loaded first page");
                self.emit_event(Event::PageLoaded {
                    page: 1,
                    article_count,
                    total_articles,
                });
                Ok(())
            }
            Err(e) => {
                session.status = FeedStatus::Error;
                session.last_error = Some(e.to_string());
                drop(session);

                warn!(error = %e, "Initial page fetch failed");
                self.emit_event(Event::FetchFailed {
                    page: 1,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Emit an event to all active subscribers
    pub(crate) fn emit_event(&self, event: Event) {
        // send() returns Err if there are no receivers, which is fine - we just drop the event
        self.event_tx.send(event).ok();
    }
}
