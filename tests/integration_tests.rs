//! Integration tests for tvmaze-browser.
//!
//! These tests drive the browser state machine through a real gateway
//! backed by an in-memory catalog.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tvmaze_browser::api::Catalog;
use tvmaze_browser::browser::{Browser, Mode, Severity};
use tvmaze_browser::config::{expand_episodes_url, Config};
use tvmaze_browser::error::{AppError, Result};
use tvmaze_browser::gateway::{Gateway, GatewayEvent};
use tvmaze_browser::types::{Episode, Listable, Show};

/// In-memory catalog. `failing_show` rejects its first episode request.
struct MemoryCatalog {
    episode_calls: Arc<AtomicUsize>,
    failing_show: Option<u32>,
    failures_left: AtomicUsize,
}

impl MemoryCatalog {
    fn new(episode_calls: Arc<AtomicUsize>) -> Self {
        Self {
            episode_calls,
            failing_show: None,
            failures_left: AtomicUsize::new(0),
        }
    }

    fn failing_once(episode_calls: Arc<AtomicUsize>, show_id: u32) -> Self {
        Self {
            episode_calls,
            failing_show: Some(show_id),
            failures_left: AtomicUsize::new(1),
        }
    }
}

impl Catalog for MemoryCatalog {
    async fn fetch_shows(&self) -> Result<Vec<Show>> {
        Ok(serde_json::from_value(serde_json::json!([
            { "id": 1, "name": "Zeta", "genres": ["Drama"], "summary": "<p>Last one.</p>" },
            { "id": 2, "name": "alpha", "genres": ["Comedy"], "rating": { "average": 8.5 } }
        ]))?)
    }

    async fn fetch_episodes(&self, show_id: u32) -> Result<Vec<Episode>> {
        self.episode_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_show == Some(show_id)
            && self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        {
            return Err(AppError::Status(503));
        }
        Ok(serde_json::from_value(serde_json::json!([
            { "id": show_id * 100 + 1, "season": 1, "number": 1, "name": "Pilot",
              "summary": "<p>It begins.</p>" },
            { "id": show_id * 100 + 2, "season": 1, "number": 2, "name": "Second" }
        ]))?)
    }
}

async fn next_event(rx: &mut UnboundedReceiver<GatewayEvent>) -> GatewayEvent {
    rx.recv().await.expect("gateway channel closed")
}

async fn loaded_browser(
    catalog: MemoryCatalog,
) -> (Browser, Gateway<MemoryCatalog>, UnboundedReceiver<GatewayEvent>) {
    let (gateway, mut rx) = Gateway::new(catalog);
    let mut browser = Browser::new();
    gateway.fetch_show_list();
    browser.handle_event(next_event(&mut rx).await);
    (browser, gateway, rx)
}

/// Open `show_id`, routing any fetch through the gateway.
async fn open(
    browser: &mut Browser,
    gateway: &Gateway<MemoryCatalog>,
    rx: &mut UnboundedReceiver<GatewayEvent>,
    show_id: u32,
) {
    if let Some(ticket) = browser.select_show(show_id) {
        gateway.fetch_episode_list(ticket);
        browser.handle_event(next_event(rx).await);
    }
}

#[tokio::test]
async fn test_catalog_sorted_case_insensitively() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (browser, _gateway, _rx) = loaded_browser(MemoryCatalog::new(calls)).await;

    let names: Vec<_> = browser.shows().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "Zeta"]);
    assert_eq!(browser.count_label(), "Showing 2 of 2 shows");
    assert!(browser.status().is_none());
}

#[tokio::test]
async fn test_open_show_and_filter_episodes() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (mut browser, gateway, mut rx) = loaded_browser(MemoryCatalog::new(calls.clone())).await;

    open(&mut browser, &gateway, &mut rx, 1).await;
    assert_eq!(browser.mode(), Mode::Episodes(1));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let labels: Vec<_> = browser
        .cache()
        .get(1)
        .unwrap()
        .iter()
        .map(|e| e.to_display())
        .collect();
    assert_eq!(labels, vec!["S01E01 - Pilot", "S01E02 - Second"]);

    browser.apply_text_filter("PILOT");
    assert_eq!(browser.visible_ids(), vec![101]);
    assert_eq!(browser.count_label(), "Showing 1 of 2 episodes");
    assert!(browser.reset_visible());

    browser.reset_view();
    assert_eq!(browser.displayed_len(), 2);
    assert!(!browser.reset_visible());
}

#[tokio::test]
async fn test_cached_show_is_not_fetched_again() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (mut browser, gateway, mut rx) = loaded_browser(MemoryCatalog::new(calls.clone())).await;

    open(&mut browser, &gateway, &mut rx, 2).await;
    browser.back_to_shows();
    assert_eq!(browser.mode(), Mode::Shows);
    assert_eq!(browser.count_label(), "Showing 2 of 2 shows");

    assert!(browser.select_show(2).is_none());
    assert_eq!(browser.mode(), Mode::Episodes(2));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached_and_retries() {
    let calls = Arc::new(AtomicUsize::new(0));
    let catalog = MemoryCatalog::failing_once(calls.clone(), 1);
    let (mut browser, gateway, mut rx) = loaded_browser(catalog).await;

    open(&mut browser, &gateway, &mut rx, 1).await;
    assert_eq!(browser.mode(), Mode::Shows);
    assert!(!browser.cache().contains(1));
    let status = browser.status().unwrap();
    assert_eq!(status.severity, Severity::Error);
    assert_eq!(status.message, "Failed to load episodes. Please try again later.");

    open(&mut browser, &gateway, &mut rx, 1).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(browser.mode(), Mode::Episodes(1));
    assert!(browser.cache().contains(1));
    assert!(browser.status().is_none());
}

#[tokio::test]
async fn test_superseded_response_does_not_switch_view() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (mut browser, gateway, mut rx) = loaded_browser(MemoryCatalog::new(calls)).await;

    let first = browser.select_show(1).unwrap();
    let second = browser.select_show(2).unwrap();
    gateway.fetch_episode_list(first);
    gateway.fetch_episode_list(second);

    let mut events = vec![next_event(&mut rx).await, next_event(&mut rx).await];
    // deliver the stale completion last
    events.sort_by_key(|e| matches!(e, GatewayEvent::Episodes { ticket, .. } if ticket.show_id == 1));
    for event in events {
        browser.handle_event(event);
    }

    assert_eq!(browser.mode(), Mode::Episodes(2));
    assert_eq!(
        browser.visible_ids(),
        browser.cache().get(2).unwrap().iter().map(|e| e.id).collect::<Vec<_>>()
    );
    // the stale list was still kept for later
    assert!(browser.cache().contains(1));
}

#[tokio::test]
async fn test_exact_selection_then_filter() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (mut browser, _gateway, _rx) = loaded_browser(MemoryCatalog::new(calls)).await;

    browser.apply_exact_selection(1);
    assert_eq!(browser.visible_ids(), vec![1]);
    assert_eq!(browser.selected_item(), Some(1));

    browser.apply_text_filter("comedy");
    assert_eq!(browser.selected_item(), None);
    assert_eq!(browser.visible_ids(), vec![2]);

    // summary markup is stripped before matching
    browser.apply_text_filter("last one");
    assert_eq!(browser.visible_ids(), vec![1]);
    browser.apply_text_filter("<p>");
    assert_eq!(browser.displayed_len(), 0);
}

#[test]
fn test_config_roundtrip_keeps_endpoints() {
    let config = Config::from_toml(
        r#"
shows_url = "http://localhost:8080/shows"
episodes_url = "http://localhost:8080/shows/{id}/episodes"
timeout_secs = 5
"#,
    )
    .unwrap();

    assert!(config.validate().is_ok());
    assert_eq!(
        expand_episodes_url(&config.episodes_url, 7),
        "http://localhost:8080/shows/7/episodes"
    );
}
