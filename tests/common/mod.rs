//! Common test utilities for newshub integration tests

use newshub::{Config, Event, NewsFeed};
use serde_json::json;
use tokio::time::{Duration, timeout};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointed at a mock server, with all other defaults
#[allow(dead_code)]
pub fn test_config(server: &MockServer) -> Config {
    Config {
        endpoint: server.uri(),
        ..Config::new("integration-test-key")
    }
}

/// One article in the upstream JSON shape, tagged by page and index
#[allow(dead_code)]
pub fn article_json(page: u32, n: u32) -> serde_json::Value {
    json!({
        "source": {"id": "techcrunch", "name": "TechCrunch"},
        "author": "Integration Reporter",
        "title": format!("Page {page} article {n}"),
        "description": "A summary",
        "url": format!("https://example.com/p{page}/a{n}"),
        "urlToImage": null,
        "publishedAt": "2024-03-01T08:30:00Z",
        "content": null
    })
}

/// Successful response body carrying `count` articles for `page`
#[allow(dead_code)]
pub fn ok_body(page: u32, count: u32) -> serde_json::Value {
    json!({
        "status": "ok",
        "totalResults": 99999,
        "articles": (0..count).map(|n| article_json(page, n)).collect::<Vec<_>>()
    })
}

/// API-level failure body (the upstream reports errors inside the JSON)
#[allow(dead_code)]
pub fn error_body(message: &str) -> serde_json::Value {
    json!({
        "status": "error",
        "code": "unexpectedError",
        "message": message
    })
}

/// Mount a full page of results for a specific page number
#[allow(dead_code)]
pub async fn mount_page(server: &MockServer, page: u32, count: u32) {
    Mock::given(method("GET"))
        .and(path("/everything"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(page, count)))
        .mount(server)
        .await;
}

/// Wait for the next `PageLoaded` event, failing the test after 5 seconds
#[allow(dead_code)]
pub async fn wait_for_page_loaded(
    events: &mut tokio::sync::broadcast::Receiver<Event>,
) -> (u32, usize) {
    loop {
        let event = timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("timed out waiting for a PageLoaded event")
            .expect("event channel closed");
        if let Event::PageLoaded {
            page,
            total_articles,
            ..
        } = event
        {
            return (page, total_articles);
        }
    }
}

/// Feed against the mock server with page 1 already loaded
#[allow(dead_code)]
pub async fn loaded_feed(server: &MockServer) -> NewsFeed {
    let feed = NewsFeed::new(test_config(server)).expect("test config must be valid");
    feed.refresh().await.expect("initial load must succeed");
    feed
}
