//! Integration tests for the admission history log.

mod helpers;

use waitline_core::config::AppConfig;
use waitline_core::types::history::HistoryAction;

use helpers::TestApp;

#[tokio::test]
async fn test_lifecycle_recorded_newest_first() {
    let app = TestApp::new();
    app.register_all("default", &[100]).await;
    app.runtime.admission.allow("default", 1).await.unwrap();

    let entries = app.runtime.history.recent("default", 100, Some(10)).await.unwrap();
    let actions: Vec<HistoryAction> = entries.iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![HistoryAction::Allow, HistoryAction::Register]);

    let entry = &entries[0];
    assert_eq!(entry.queue, "default");
    assert_eq!(entry.user_id, 100);
    assert!(entry.timestamp > 0);
    assert!(!entry.formatted_time.is_empty());
}

#[tokio::test]
async fn test_queue_log_spans_users() {
    let app = TestApp::new();
    app.register_all("default", &[1, 2, 3]).await;
    app.runtime.admission.allow("default", 2).await.unwrap();

    let entries = app
        .runtime
        .history
        .recent_for_queue("default", None)
        .await
        .unwrap();
    assert_eq!(entries.len(), 5);
    assert_eq!(
        entries
            .iter()
            .filter(|e| e.action == HistoryAction::Allow)
            .count(),
        2
    );
    assert_eq!(entries[4].user_id, 1);
    assert_eq!(entries[4].action, HistoryAction::Register);
}

#[tokio::test]
async fn test_limit_and_default_limit() {
    let mut config = AppConfig::default();
    config.history.default_queue_limit = 3;
    let app = TestApp::with_config(config);
    app.register_all("default", &[1, 2, 3, 4, 5]).await;

    let history = &app.runtime.history;
    assert_eq!(history.recent_for_queue("default", None).await.unwrap().len(), 3);
    assert_eq!(history.recent_for_queue("default", Some(2)).await.unwrap().len(), 2);
    assert_eq!(history.recent_for_queue("default", Some(50)).await.unwrap().len(), 5);

    let newest = history.recent_for_queue("default", Some(1)).await.unwrap();
    assert_eq!(newest[0].user_id, 5);
}

#[tokio::test]
async fn test_queue_log_is_bounded() {
    let mut config = AppConfig::default();
    config.history.max_entries_per_queue = 4;
    let app = TestApp::with_config(config);
    app.register_all("default", &[1, 2, 3, 4, 5, 6]).await;

    let entries = app
        .runtime
        .history
        .recent_for_queue("default", Some(100))
        .await
        .unwrap();
    let users: Vec<i64> = entries.iter().map(|e| e.user_id).collect();
    assert_eq!(users, vec![6, 5, 4, 3]);
}

#[tokio::test]
async fn test_failed_registration_not_recorded() {
    let app = TestApp::new();
    app.register_all("default", &[1]).await;
    assert!(app.runtime.admission.register("default", 1, false).await.is_err());

    let entries = app.runtime.history.recent("default", 1, None).await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_empty_logs() {
    let app = TestApp::new();
    let history = &app.runtime.history;
    assert!(history.recent("nowhere", 1, None).await.unwrap().is_empty());
    assert!(history.recent_for_queue("nowhere", None).await.unwrap().is_empty());
    assert!(history.latest("nowhere", 1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_queues_keep_separate_logs() {
    let app = TestApp::new();
    app.register_all("alpha", &[1]).await;
    app.register_all("beta", &[1]).await;
    app.runtime.admission.allow("beta", 1).await.unwrap();

    let alpha = app.runtime.history.latest("alpha", 1).await.unwrap().unwrap();
    let beta = app.runtime.history.latest("beta", 1).await.unwrap().unwrap();
    assert_eq!(alpha.action, HistoryAction::Register);
    assert_eq!(beta.action, HistoryAction::Allow);
}
