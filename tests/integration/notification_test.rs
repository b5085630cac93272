//! Integration tests for queue event fan-out.

mod helpers;

use std::time::Duration;

use futures::StreamExt;

use waitline_core::config::AppConfig;
use waitline_core::events::{QueueEvent, QueueEventType};
use waitline_core::traits::notifier::{QueueEventStream, QueueNotifier};
use waitline_realtime::for_user;

use helpers::TestApp;

async fn next_event(events: &mut QueueEventStream) -> QueueEvent {
    tokio::time::timeout(Duration::from_secs(1), events.next())
        .await
        .expect("Timed out waiting for event")
        .expect("Event stream closed")
}

async fn assert_quiet(events: &mut QueueEventStream) {
    let next = tokio::time::timeout(Duration::from_millis(50), events.next()).await;
    assert!(next.is_err(), "Unexpected event: {next:?}");
}

#[tokio::test]
async fn test_register_publishes_rank() {
    let app = TestApp::new();
    let mut events = app.runtime.notifier.subscribe("default").await.unwrap();

    app.register_all("default", &[100, 101]).await;

    let first = next_event(&mut events).await;
    assert_eq!(first.event_type, QueueEventType::Registered);
    assert_eq!(first.user_id, 100);
    assert_eq!(first.data, "1");

    let second = next_event(&mut events).await;
    assert_eq!(second.user_id, 101);
    assert_eq!(second.data, "2");
}

#[tokio::test]
async fn test_allow_publishes_admissions_then_ranks() {
    let app = TestApp::new();
    app.register_all("default", &[1, 2, 3, 4]).await;
    let mut events = app.runtime.notifier.subscribe("default").await.unwrap();

    app.runtime.admission.allow("default", 2).await.unwrap();

    let expected = [
        (QueueEventType::Allowed, 1, "true"),
        (QueueEventType::Allowed, 2, "true"),
        (QueueEventType::RankChanged, 3, "1"),
        (QueueEventType::RankChanged, 4, "2"),
    ];
    for (event_type, user_id, data) in expected {
        let event = next_event(&mut events).await;
        assert_eq!(event.event_type, event_type);
        assert_eq!(event.user_id, user_id);
        assert_eq!(event.data, data);
    }
    assert_quiet(&mut events).await;
}

#[tokio::test]
async fn test_rank_change_window_limits_updates() {
    let mut config = AppConfig::default();
    config.notification.rank_change_window = 1;
    let app = TestApp::with_config(config);
    app.register_all("default", &[1, 2, 3, 4]).await;
    let mut events = app.runtime.notifier.subscribe("default").await.unwrap();

    app.runtime.admission.allow("default", 1).await.unwrap();

    assert_eq!(next_event(&mut events).await.event_type, QueueEventType::Allowed);
    let update = next_event(&mut events).await;
    assert_eq!(update.event_type, QueueEventType::RankChanged);
    assert_eq!(update.user_id, 2);
    assert_quiet(&mut events).await;
}

#[tokio::test]
async fn test_empty_allow_is_silent() {
    let app = TestApp::new();
    let mut events = app.runtime.notifier.subscribe("default").await.unwrap();

    assert_eq!(app.runtime.admission.allow("default", 5).await.unwrap(), 0);
    assert_quiet(&mut events).await;
}

#[tokio::test]
async fn test_user_filter() {
    let app = TestApp::new();
    let events = app.runtime.notifier.subscribe("default").await.unwrap();
    let mut mine = for_user(events, 3);

    app.register_all("default", &[1, 2, 3]).await;
    app.runtime.admission.allow("default", 1).await.unwrap();

    let registered = next_event(&mut mine).await;
    assert_eq!(registered.event_type, QueueEventType::Registered);
    assert_eq!(registered.data, "3");

    let moved = next_event(&mut mine).await;
    assert_eq!(moved.event_type, QueueEventType::RankChanged);
    assert_eq!(moved.data, "2");
}

#[tokio::test]
async fn test_subscribers_only_see_their_queue() {
    let app = TestApp::new();
    let mut alpha = app.runtime.notifier.subscribe("alpha").await.unwrap();

    app.register_all("beta", &[1]).await;
    assert_quiet(&mut alpha).await;

    app.register_all("alpha", &[2]).await;
    assert_eq!(next_event(&mut alpha).await.user_id, 2);
}

#[tokio::test]
async fn test_publish_reports_reach() {
    let app = TestApp::new();
    let notifier = &app.runtime.notifier;
    let event = QueueEvent::allowed("default", 1);

    assert_eq!(notifier.publish(&event).await.unwrap(), 0);

    let _a = notifier.subscribe("default").await.unwrap();
    let _b = notifier.subscribe("default").await.unwrap();
    assert_eq!(notifier.publish(&event).await.unwrap(), 2);
}
