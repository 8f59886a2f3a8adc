//! Integration tests for the fetch lifecycle: mode selection, cache reuse,
//! request ordering and failure handling.
//!
//! Each test starts its own wiremock server and counts backend calls, so the
//! "exactly one network call" rules are checked against real HTTP traffic.

use newsdesk::api::{ApiError, BackendClient};
use newsdesk::app::{App, AppEvent, Command};
use newsdesk::config::Config;
use newsdesk::dispatch::{Decision, FetchDispatcher};
use newsdesk::query::{Category, Mode, Query, Series};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config {
        api_base_url: server.uri(),
        ..Config::default()
    }
}

fn articles_json(range: std::ops::Range<usize>, skip_image_every: Option<usize>) -> Value {
    let items: Vec<Value> = range
        .map(|i| {
            let image = match skip_image_every {
                Some(n) if i % n == n - 1 => Value::Null,
                _ => json!(format!("https://img.example/{i}.jpg")),
            };
            json!({
                "title": format!("Story {i}"),
                "description": "desc",
                "content": format!("Body {i}"),
                "image": image,
                "url": format!("https://news.example/{i}"),
                "source": { "name": "Wire" },
                "credibility": { "score": 1.5, "matched_links": [format!("https://mirror.example/{i}")] }
            })
        })
        .collect();
    Value::Array(items)
}

async fn mount_trending(server: &MockServer, limit: u32, body: Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/news"))
        .and(query_param("topic", "trending"))
        .and(query_param("limit", limit.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

/// Run a command to completion and feed its event back.
async fn complete(app: &mut App, command: Option<Command>) {
    if let Some(command) = command {
        let event = command.run(app.client.clone()).await;
        app.handle_event(event);
    }
}

// ============================================================================
// Dispatcher against the real client
// ============================================================================

#[tokio::test]
async fn test_trending_six_items_one_without_image() {
    let server = MockServer::start().await;
    mount_trending(&server, 5, articles_json(0..6, Some(3)), 1).await;

    let client = BackendClient::new(&config_for(&server)).unwrap();
    let mut dispatcher = FetchDispatcher::new();
    let shown = dispatcher
        .resolve(&client, Query::new(Series::Trending, 5))
        .await
        .unwrap();

    // 6 returned, items 2 and 5 lack an image, 4 remain.
    assert_eq!(shown.len(), 4);
    assert!(shown.iter().all(|a| a.has_image()));
}

#[tokio::test]
async fn test_slider_five_ten_five_issues_one_extra_call() {
    let server = MockServer::start().await;
    mount_trending(&server, 5, articles_json(0..5, None), 1).await;
    mount_trending(&server, 10, articles_json(0..10, None), 1).await;

    let client = BackendClient::new(&config_for(&server)).unwrap();
    let mut dispatcher = FetchDispatcher::new();

    assert_eq!(dispatcher.resolve(&client, Query::new(Series::Trending, 5)).await.unwrap().len(), 5);
    assert_eq!(dispatcher.resolve(&client, Query::new(Series::Trending, 10)).await.unwrap().len(), 10);

    let decision = dispatcher.evaluate(Query::new(Series::Trending, 5));
    assert_eq!(decision, Decision::Reuse { shown: 5 });
    assert_eq!(dispatcher.visible().len(), 5);
    // MockServer verifies the `.expect(1)` counts on drop.
}

#[tokio::test]
async fn test_topic_is_sent_escaped_and_decoded_by_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/news"))
        .and(query_param("topic", "AI & chips"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_json(0..3, None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(&config_for(&server)).unwrap();
    let mut dispatcher = FetchDispatcher::new();
    let shown = dispatcher
        .resolve(&client, Query::new(Series::Topic("AI & chips".into()), 5))
        .await
        .unwrap();
    assert_eq!(shown.len(), 3);
}

#[tokio::test]
async fn test_failure_keeps_previous_results() {
    let server = MockServer::start().await;
    mount_trending(&server, 5, articles_json(0..5, None), 1).await;
    Mock::given(method("GET"))
        .and(path("/api/news"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(&config_for(&server)).unwrap();
    let mut dispatcher = FetchDispatcher::new();
    dispatcher.resolve(&client, Query::new(Series::Trending, 5)).await.unwrap();

    let err = dispatcher
        .resolve(&client, Query::new(Series::Trending, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::HttpStatus { status: 503, .. }));
    assert!(!dispatcher.is_loading());
    assert_eq!(dispatcher.visible().len(), 5);
    assert_eq!(dispatcher.cache_entry().unwrap().fetched_limit, 5);
}

// ============================================================================
// Through the App coordinator
// ============================================================================

#[tokio::test]
async fn test_favorite_empty_category_is_neutral() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/favorite-topics"))
        .and(query_param("category", "business"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "No articles found for business."})))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = App::new(&config_for(&server)).unwrap();
    assert!(app.select_mode(Mode::Favorite).is_none());
    let command = app.choose_category(Category::Business);
    complete(&mut app, command).await;

    assert!(app.notice.is_none());
    assert!(app.shows_no_results());
}

#[tokio::test]
async fn test_overlapping_fetches_apply_latest_only() {
    let server = MockServer::start().await;
    mount_trending(&server, 5, articles_json(0..5, None), 1).await;
    mount_trending(&server, 10, articles_json(100..110, None), 1).await;
    mount_trending(&server, 15, articles_json(200..215, None), 1).await;

    let mut app = App::new(&config_for(&server)).unwrap();
    let first = app.select_mode(Mode::Trending);
    complete(&mut app, first).await;

    // Two fetches issued back to back; the older one arrives last.
    let older = app.set_limit(10).unwrap();
    let newer = app.set_limit(15).unwrap();
    let newer_event = newer.run(app.client.clone()).await;
    let older_event = older.run(app.client.clone()).await;
    app.handle_event(newer_event);
    app.handle_event(older_event);

    assert_eq!(app.visible().len(), 15);
    assert_eq!(app.visible()[0].url, "https://news.example/200");
    assert!(!app.is_loading());
}

#[tokio::test]
async fn test_mode_switch_discards_late_response() {
    let server = MockServer::start().await;
    mount_trending(&server, 5, articles_json(0..5, None), 1).await;

    let mut app = App::new(&config_for(&server)).unwrap();
    let trending = app.select_mode(Mode::Trending).unwrap();
    assert!(app.select_mode(Mode::Topic).is_none());

    let late = trending.run(app.client.clone()).await;
    app.handle_event(late);
    assert!(app.visible().is_empty());
    assert!(!app.is_loading());
}

#[tokio::test]
async fn test_malformed_body_raises_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/news"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let mut app = App::new(&config_for(&server)).unwrap();
    let command = app.select_mode(Mode::Trending);
    complete(&mut app, command).await;
    assert!(app.notice.as_deref().unwrap().starts_with("Could not load news"));
    assert!(!app.is_loading());
}

#[tokio::test]
async fn test_cancelled_settlement_event_releases_loading() {
    let server = MockServer::start().await;
    let mut app = App::new(&config_for(&server)).unwrap();
    let command = app.select_mode(Mode::Trending).unwrap();
    assert!(app.is_loading());
    app.handle_event(command.cancelled());
    assert!(!app.is_loading());
    assert!(matches!(command.cancelled(), AppEvent::FetchSettled { .. }));
}
