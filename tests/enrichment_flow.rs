//! Integration tests for per-article enrichment through the App coordinator:
//! summaries, saving, link expansion and removal from the saved browser.

use newsdesk::app::{App, Command, View};
use newsdesk::config::Config;
use newsdesk::query::Mode;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn articles_json() -> Value {
    json!([
        {
            "title": "Rates held",
            "content": "The central bank kept rates unchanged.",
            "image": "https://img.example/1.jpg",
            "url": "https://news.example/1",
            "publisher": "Example Times",
            "credibility": { "score": 2.4, "matched_links": ["https://mirror.example/1", "https://news.example/1"] }
        },
        {
            "title": "No body here",
            "content": null,
            "image": "https://img.example/2.jpg",
            "url": "https://news.example/2",
            "credibility": { "score": 0.5, "matched_links": [] }
        }
    ])
}

/// Start a server with the trending feed mounted and an app showing it.
async fn loaded_app() -> (MockServer, App) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/news"))
        .and(query_param("topic", "trending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_json()))
        .mount(&server)
        .await;

    let config = Config {
        api_base_url: server.uri(),
        ..Config::default()
    };
    let mut app = App::new(&config).unwrap();
    let command = app.select_mode(Mode::Trending);
    complete(&mut app, command).await;
    assert_eq!(app.visible().len(), 2);
    (server, app)
}

async fn complete(app: &mut App, command: Option<Command>) {
    if let Some(command) = command {
        let event = command.run(app.client.clone()).await;
        app.handle_event(event);
    }
}

// ============================================================================
// Summary
// ============================================================================

#[tokio::test]
async fn test_summary_fetched_once_then_toggled() {
    let (server, mut app) = loaded_app().await;
    Mock::given(method("POST"))
        .and(path("/api/summarize"))
        .and(body_partial_json(json!({"content": "The central bank kept rates unchanged."})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summary": "Rates unchanged."})))
        .expect(1)
        .mount(&server)
        .await;

    let command = app.request_summary();
    assert!(matches!(command, Some(Command::Summarize(_))));
    complete(&mut app, command).await;

    let key = app.visible()[0].key();
    let state = app.enrichment.state(&key).unwrap();
    assert_eq!(state.summary.as_deref(), Some("Rates unchanged."));
    assert!(state.summary_visible);

    // Hide and show again without touching the network.
    assert!(app.request_summary().is_none());
    assert!(!app.enrichment.state(&key).unwrap().summary_visible);
    assert!(app.request_summary().is_none());
    assert!(app.enrichment.state(&key).unwrap().summary_visible);
}

#[tokio::test]
async fn test_summary_without_content_never_calls_backend() {
    let (server, mut app) = loaded_app().await;
    Mock::given(method("POST"))
        .and(path("/api/summarize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summary": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    app.nav_down();
    assert!(app.request_summary().is_none());
    assert_eq!(app.status_message.as_ref().unwrap().0, "No content to summarize");
}

#[tokio::test]
async fn test_summary_failure_is_reported_and_retryable() {
    let (server, mut app) = loaded_app().await;
    Mock::given(method("POST"))
        .and(path("/api/summarize"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "model offline"})))
        .expect(2)
        .mount(&server)
        .await;

    let command = app.request_summary();
    complete(&mut app, command).await;
    let key = app.visible()[0].key();
    let state = app.enrichment.state(&key).unwrap();
    assert!(!state.summary_loading);
    assert!(!state.summary_visible);
    assert!(state.summary.is_none());
    assert!(app.status_message.as_ref().unwrap().0.contains("model offline"));

    let retry = app.request_summary();
    assert!(matches!(retry, Some(Command::Summarize(_))));
    complete(&mut app, retry).await;
}

// ============================================================================
// Save and remove
// ============================================================================

#[tokio::test]
async fn test_save_posts_article_fields_once() {
    let (server, mut app) = loaded_app().await;
    Mock::given(method("POST"))
        .and(path("/api/save-article"))
        .and(body_partial_json(json!({
            "title": "Rates held",
            "url": "https://news.example/1",
            "image": "https://img.example/1.jpg",
            "publisher": "Example Times",
            "credibility": { "score": 2.4 }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "Article saved."})))
        .expect(1)
        .mount(&server)
        .await;

    let command = app.save_selected();
    complete(&mut app, command).await;
    assert!(app.enrichment.is_saved(&app.visible()[0].key()));

    // Disabled for the rest of the session.
    assert!(app.save_selected().is_none());
}

#[tokio::test]
async fn test_save_failure_then_retry_succeeds() {
    let (server, mut app) = loaded_app().await;
    Mock::given(method("POST"))
        .and(path("/api/save-article"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/save-article"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "Article already saved."})))
        .expect(1)
        .mount(&server)
        .await;

    let command = app.save_selected();
    complete(&mut app, command).await;
    assert!(app.notice.is_some());
    assert!(!app.enrichment.is_saved(&app.visible()[0].key()));
    app.dismiss_notice();

    let command = app.save_selected();
    complete(&mut app, command).await;
    assert!(app.enrichment.is_saved(&app.visible()[0].key()));
}

#[tokio::test]
async fn test_remove_from_saved_view_reenables_save() {
    let (server, mut app) = loaded_app().await;
    Mock::given(method("POST"))
        .and(path("/api/save-article"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/saved-articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "title": "Rates held", "url": "https://news.example/1" }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/delete-article"))
        .and(query_param("url", "https://news.example/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Article deleted."})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/saved-articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let command = app.save_selected();
    complete(&mut app, command).await;

    let command = app.open_saved_view();
    assert_eq!(app.view, View::Saved);
    complete(&mut app, command).await;
    assert_eq!(app.saved.items().len(), 1);

    let command = app.remove_selected_saved();
    assert!(matches!(command, Some(Command::RemoveSaved { .. })));
    complete(&mut app, command).await;
    assert!(app.saved.items().is_empty());
    assert_eq!(app.status_message.as_ref().unwrap().0, "Article deleted.");

    app.close_saved_view();
    assert!(!app.enrichment.is_saved(&app.visible()[0].key()));
    assert!(matches!(app.save_selected(), Some(Command::Save(_))));
}

#[tokio::test]
async fn test_saved_list_marks_displayed_articles() {
    let (server, mut app) = loaded_app().await;
    Mock::given(method("GET"))
        .and(path("/api/saved-articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "title": "No body here", "link": "https://news.example/2" }
        ])))
        .mount(&server)
        .await;

    let command = app.open_saved_view();
    complete(&mut app, command).await;

    assert!(app.enrichment.is_saved(&app.visible()[1].key()));
    assert!(!app.enrichment.is_saved(&app.visible()[0].key()));
}

// ============================================================================
// Expansion
// ============================================================================

#[tokio::test]
async fn test_link_expansion_single_slot_and_reset() {
    let (_server, mut app) = loaded_app().await;

    assert!(app.toggle_links());
    assert_eq!(app.visible()[0].alternate_links(), vec!["https://mirror.example/1"]);

    // Second article has no alternate links; the first stays expanded.
    app.nav_down();
    assert!(!app.toggle_links());
    assert!(app.enrichment.is_expanded(&app.visible()[0].key()));

    app.nav_up();
    assert!(!app.toggle_links());
    assert!(app.enrichment.expanded().is_none());

    app.toggle_links();
    app.select_mode(Mode::Topic);
    assert!(app.enrichment.expanded().is_none());
}
