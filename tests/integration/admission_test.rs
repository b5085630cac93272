//! Integration tests for registration, batch admission, and rank queries.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use waitline_core::config::AppConfig;
use waitline_core::types::queue::QueueStats;
use waitline_service::QueueError;

use helpers::{FailingNotifier, FlakyStore, TestApp};

fn config_with(capacity: u64, ttl_seconds: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.queue.max_capacity = capacity;
    config.queue.ttl_seconds = ttl_seconds;
    config
}

#[tokio::test]
async fn test_sequential_registrations_get_sequential_ranks() {
    let app = TestApp::new();
    let users: Vec<i64> = (1000..1010).collect();

    let ranks = app.register_all("default", &users).await;
    assert_eq!(ranks, (1..=10).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_mixed_width_ids_keep_registration_order() {
    let app = TestApp::new();
    let admission = &app.runtime.admission;

    for n in 0..50 {
        let queue = format!("room-{n}");
        assert_eq!(app.register_all(&queue, &[9, 10, 100]).await, vec![1, 2, 3]);
        assert_eq!(admission.rank(&queue, 9).await.unwrap(), 1);
        assert_eq!(admission.rank(&queue, 100).await.unwrap(), 3);
    }

    admission.allow("room-0", 2).await.unwrap();
    assert!(admission.is_admitted("room-0", 9).await.unwrap());
    assert!(admission.is_admitted("room-0", 10).await.unwrap());
    assert_eq!(admission.rank("room-0", 100).await.unwrap(), 1);
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let app = TestApp::new();
    let admission = &app.runtime.admission;
    app.register_all("default", &[100, 101]).await;

    let err = admission.register("default", 100, false).await.unwrap_err();
    assert!(matches!(
        err,
        QueueError::AlreadyRegistered { ref queue, user_id: 100 } if queue == "default"
    ));
    assert_eq!(err.code(), "UQ-001");
    assert_eq!(admission.rank("default", 100).await.unwrap(), 1);
    assert_eq!(admission.rank("default", 101).await.unwrap(), 2);
}

#[tokio::test]
async fn test_invalid_input() {
    let app = TestApp::new();
    let admission = &app.runtime.admission;

    assert!(admission.register("", 1, false).await.unwrap_err().is_invalid_input());
    assert!(admission.register("default", 0, false).await.unwrap_err().is_invalid_input());
    assert!(admission.register("default", -7, true).await.unwrap_err().is_invalid_input());
    assert!(matches!(
        admission.allow("default", -1).await,
        Err(QueueError::InvalidCount(-1))
    ));
}

#[tokio::test]
async fn test_allow_admits_lowest_and_compacts_ranks() {
    let app = TestApp::new();
    let admission = &app.runtime.admission;
    app.register_all("default", &[10, 11, 12, 13, 14]).await;

    assert_eq!(admission.allow("default", 3).await.unwrap(), 3);

    for user in [10, 11, 12] {
        assert!(admission.is_admitted("default", user).await.unwrap());
        assert_eq!(admission.rank("default", user).await.unwrap(), -1);
    }
    assert_eq!(admission.rank("default", 13).await.unwrap(), 1);
    assert_eq!(admission.rank("default", 14).await.unwrap(), 2);
}

#[tokio::test]
async fn test_allow_more_than_waiting() {
    let app = TestApp::new();
    let admission = &app.runtime.admission;
    app.register_all("default", &[1, 2]).await;

    assert_eq!(admission.allow("default", 10).await.unwrap(), 2);
    assert_eq!(admission.allow("default", 10).await.unwrap(), 0);
    assert_eq!(admission.allow("empty", 10).await.unwrap(), 0);
    assert_eq!(
        admission.stats("default").await.unwrap(),
        QueueStats {
            waiting: 0,
            admitted: 2
        }
    );
}

#[tokio::test]
async fn test_vip_jumps_the_queue() {
    let app = TestApp::new();
    let admission = &app.runtime.admission;
    app.register_all("default", &[1, 2, 3]).await;

    assert_eq!(admission.register("default", 50, true).await.unwrap(), 1);
    assert_eq!(admission.register("default", 51, true).await.unwrap(), 2);
    assert_eq!(admission.rank("default", 1).await.unwrap(), 3);

    admission.allow("default", 2).await.unwrap();
    assert!(admission.is_admitted("default", 50).await.unwrap());
    assert!(admission.is_admitted("default", 51).await.unwrap());
    assert!(!admission.is_admitted("default", 1).await.unwrap());
}

#[tokio::test]
async fn test_rank_and_admission_of_unknown_users() {
    let app = TestApp::new();
    let admission = &app.runtime.admission;
    app.register_all("default", &[5]).await;

    assert_eq!(admission.rank("default", 99).await.unwrap(), -1);
    assert_eq!(admission.rank("nowhere", 5).await.unwrap(), -1);
    assert!(!admission.is_admitted("default", 99).await.unwrap());
    assert!(!admission.is_admitted("default", 5).await.unwrap());
}

#[tokio::test]
async fn test_waiting_room_walkthrough() {
    let app = TestApp::new();
    let admission = &app.runtime.admission;

    assert_eq!(app.register_all("default", &[100, 101, 102]).await, vec![1, 2, 3]);

    assert_eq!(admission.allow("default", 2).await.unwrap(), 2);
    assert!(admission.is_admitted("default", 100).await.unwrap());
    assert!(admission.is_admitted("default", 101).await.unwrap());
    assert_eq!(admission.rank("default", 102).await.unwrap(), 1);

    // 102 registered before 200 and was not admitted, so it keeps rank 1
    // and the newcomer queues behind it at rank 2.
    assert_eq!(admission.register("default", 200, false).await.unwrap(), 2);
    assert_eq!(admission.rank("default", 102).await.unwrap(), 1);

    admission.allow("default", 1).await.unwrap();
    assert_eq!(admission.rank("default", 200).await.unwrap(), 1);
}

#[tokio::test]
async fn test_reregistration_after_admission() {
    let app = TestApp::new();
    let admission = &app.runtime.admission;
    app.register_all("default", &[7]).await;
    admission.allow("default", 1).await.unwrap();

    assert_eq!(admission.register("default", 7, false).await.unwrap(), 1);
    assert!(admission.is_admitted("default", 7).await.unwrap());
}

#[tokio::test]
async fn test_capacity_limit() {
    let app = TestApp::with_config(config_with(5, 0));
    let admission = &app.runtime.admission;
    app.register_all("default", &[1, 2, 3, 4, 5]).await;

    let err = admission.register("default", 6, false).await.unwrap_err();
    assert!(matches!(err, QueueError::CapacityExceeded { limit: 5, .. }));
    assert_eq!(err.code(), "UQ-005");
    assert_eq!(admission.rank("default", 6).await.unwrap(), -1);
    assert_eq!(admission.stats("default").await.unwrap().waiting, 5);

    // Admission frees a place.
    admission.allow("default", 1).await.unwrap();
    assert_eq!(admission.register("default", 6, false).await.unwrap(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_wait_set_expires() {
    let app = TestApp::with_config(config_with(0, 3));
    let admission = &app.runtime.admission;
    app.register_all("default", &[1]).await;
    assert_eq!(admission.queue_ttl("default").await.unwrap(), 3);

    tokio::time::advance(Duration::from_secs(4)).await;

    assert_eq!(admission.stats("default").await.unwrap().waiting, 0);
    assert_eq!(admission.rank("default", 1).await.unwrap(), -1);
    assert_eq!(admission.queue_ttl("default").await.unwrap(), -1);
}

#[tokio::test(start_paused = true)]
async fn test_registration_refreshes_whole_set_ttl() {
    let app = TestApp::with_config(config_with(0, 3));
    let admission = &app.runtime.admission;
    app.register_all("default", &[1]).await;

    tokio::time::advance(Duration::from_secs(2)).await;
    app.register_all("default", &[2]).await;

    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(admission.stats("default").await.unwrap().waiting, 2);

    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(admission.stats("default").await.unwrap().waiting, 0);
}

#[tokio::test]
async fn test_store_failure_surfaces_on_request_path() {
    let store = Arc::new(FlakyStore::new());
    let app = TestApp::with_store(AppConfig::default(), store.clone());
    let admission = &app.runtime.admission;

    store.fail_on(":wait");
    let err = admission.register("default", 1, false).await.unwrap_err();
    assert!(matches!(err, QueueError::Store(_)));
    assert_eq!(err.code(), "UQ-500");
    assert!(admission.rank("default", 1).await.is_err());

    store.heal();
    assert_eq!(admission.register("default", 1, false).await.unwrap(), 1);
}

#[tokio::test]
async fn test_history_and_notification_failures_do_not_block() {
    let store = Arc::new(FlakyStore::new());
    let notifier = Arc::new(FailingNotifier::default());
    let app = TestApp::with_parts(AppConfig::default(), store.clone(), notifier.clone());
    let admission = &app.runtime.admission;

    store.fail_on("history");
    assert_eq!(admission.register("default", 1, false).await.unwrap(), 1);
    assert_eq!(admission.allow("default", 1).await.unwrap(), 1);
    assert!(admission.is_admitted("default", 1).await.unwrap());
    assert_eq!(notifier.attempts.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_two_phase_allow_loses_users_on_credit_failure() {
    let store = Arc::new(FlakyStore::new());
    let app = TestApp::with_store(AppConfig::default(), store.clone());
    let admission = &app.runtime.admission;
    app.register_all("default", &[1, 2]).await;

    store.fail_on(":proceed");
    assert!(matches!(
        admission.allow("default", 1).await,
        Err(QueueError::Store(_))
    ));

    store.heal();
    assert_eq!(admission.rank("default", 1).await.unwrap(), -1);
    assert!(!admission.is_admitted("default", 1).await.unwrap());
    assert_eq!(admission.rank("default", 2).await.unwrap(), 1);
}

#[tokio::test]
async fn test_atomic_allow_keeps_users_on_failure() {
    let store = Arc::new(FlakyStore::new());
    let mut config = AppConfig::default();
    config.queue.atomic_allow = true;
    let app = TestApp::with_store(config, store.clone());
    let admission = &app.runtime.admission;
    app.register_all("default", &[1, 2]).await;

    store.fail_on(":proceed");
    assert!(admission.allow("default", 1).await.is_err());

    store.heal();
    assert_eq!(admission.rank("default", 1).await.unwrap(), 1);
    assert_eq!(admission.allow("default", 1).await.unwrap(), 1);
    assert!(admission.is_admitted("default", 1).await.unwrap());
}

#[tokio::test]
async fn test_queues_are_independent() {
    let app = TestApp::new();
    let admission = &app.runtime.admission;
    app.register_all("alpha", &[1, 2]).await;
    app.register_all("beta", &[1]).await;

    admission.allow("alpha", 1).await.unwrap();
    assert!(admission.is_admitted("alpha", 1).await.unwrap());
    assert!(!admission.is_admitted("beta", 1).await.unwrap());
    assert_eq!(admission.rank("beta", 1).await.unwrap(), 1);
}
