//! Integration tests for the periodic admission scheduler.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use waitline_core::config::AppConfig;

use helpers::{FlakyStore, TestApp};

fn scheduler_config(quota: u64, batch: usize) -> AppConfig {
    let mut config = AppConfig::default();
    config.scheduler.max_allow_count = quota;
    config.scheduler.scan_batch_size = batch;
    config
}

#[tokio::test]
async fn test_tick_drains_each_queue_by_quota() {
    let app = TestApp::with_config(scheduler_config(2, 100));
    app.register_all("alpha", &[1, 2, 3, 4, 5]).await;
    app.register_all("beta", &[1]).await;

    let report = app.runtime.scheduler.tick().await;
    assert_eq!(report.queues, 2);
    assert_eq!(report.admitted, 3);
    assert_eq!(report.failed, 0);

    let admission = &app.runtime.admission;
    assert_eq!(admission.stats("alpha").await.unwrap().waiting, 3);
    assert!(admission.is_admitted("beta", 1).await.unwrap());
}

#[tokio::test]
async fn test_drained_queues_drop_out_of_discovery() {
    let app = TestApp::with_config(scheduler_config(10, 100));
    app.register_all("alpha", &[1, 2]).await;

    assert_eq!(app.runtime.scheduler.tick().await.queues, 1);
    let report = app.runtime.scheduler.tick().await;
    assert_eq!(report.queues, 0);
    assert_eq!(report.admitted, 0);
}

#[tokio::test]
async fn test_every_queue_visited_once_across_pages() {
    let app = TestApp::with_config(scheduler_config(1, 4));
    for n in 0..25 {
        app.register_all(&format!("queue-{n:02}"), &[1, 2]).await;
    }

    let report = app.runtime.scheduler.tick().await;
    assert_eq!(report.queues, 25);
    assert_eq!(report.admitted, 25);

    for n in 0..25 {
        let stats = app
            .runtime
            .admission
            .stats(&format!("queue-{n:02}"))
            .await
            .unwrap();
        assert_eq!(stats.waiting, 1);
        assert_eq!(stats.admitted, 1);
    }
}

#[tokio::test]
async fn test_tick_reaches_queues_after_drained_ones() {
    for batch in [3, 5, 7] {
        let app = TestApp::with_config(scheduler_config(1, batch));
        let admission = &app.runtime.admission;
        let queues: Vec<String> = (0..20).map(|n| format!("queue-{n:02}")).collect();

        // Proceed and history keys interleave with the wait sets in key order.
        for queue in &queues {
            app.register_all(queue, &[1]).await;
            admission.allow(queue, 1).await.unwrap();
            app.register_all(queue, &[2]).await;
        }

        let report = app.runtime.scheduler.tick().await;
        assert_eq!(report.queues, 20, "batch size {batch}");
        assert_eq!(report.admitted, 20, "batch size {batch}");

        for queue in &queues {
            assert_eq!(admission.stats(queue).await.unwrap().waiting, 0);
            assert!(admission.is_admitted(queue, 2).await.unwrap());
        }
    }
}

#[tokio::test]
async fn test_failing_queue_does_not_stop_others() {
    let store = Arc::new(FlakyStore::new());
    let app = TestApp::with_store(scheduler_config(5, 100), store.clone());
    app.register_all("broken", &[1]).await;
    app.register_all("healthy", &[1, 2]).await;

    store.fail_on("broken");
    let report = app.runtime.scheduler.tick().await;
    assert_eq!(report.queues, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.admitted, 2);

    store.heal();
    assert_eq!(app.runtime.admission.rank("broken", 1).await.unwrap(), 1);
}

#[tokio::test]
async fn test_disabled_scheduler_admits_nothing() {
    let mut config = scheduler_config(5, 100);
    config.scheduler.enabled = false;
    let app = TestApp::with_config(config);
    app.register_all("alpha", &[1]).await;

    let report = app.runtime.scheduler.tick().await;
    assert_eq!(report.queues, 0);
    assert_eq!(app.runtime.admission.rank("alpha", 1).await.unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_run_follows_delay_and_interval() {
    let mut config = scheduler_config(1, 100);
    config.scheduler.initial_delay_ms = 5000;
    config.scheduler.interval_ms = 3000;
    let app = TestApp::with_config(config);
    app.register_all("default", &[1, 2, 3]).await;

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let scheduler = app.runtime.scheduler.clone();
    let handle = tokio::spawn(async move { scheduler.run(cancel_rx).await });

    let admission = &app.runtime.admission;

    tokio::time::sleep(Duration::from_millis(4900)).await;
    assert_eq!(admission.stats("default").await.unwrap().admitted, 0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(admission.is_admitted("default", 1).await.unwrap());
    assert_eq!(admission.rank("default", 2).await.unwrap(), 1);

    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert!(admission.is_admitted("default", 2).await.unwrap());
    assert_eq!(admission.rank("default", 3).await.unwrap(), 1);

    cancel_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("Scheduler did not stop")
        .unwrap();
    assert_eq!(admission.rank("default", 3).await.unwrap(), 1);
}

#[tokio::test]
async fn test_run_stops_when_sender_dropped() {
    let app = TestApp::new();
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let scheduler = app.runtime.scheduler.clone();
    let handle = tokio::spawn(async move { scheduler.run(cancel_rx).await });

    drop(cancel_tx);
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("Scheduler did not stop")
        .unwrap();
}
