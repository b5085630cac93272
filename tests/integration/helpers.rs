//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;

use waitline_core::config::AppConfig;
use waitline_core::error::AppError;
use waitline_core::events::QueueEvent;
use waitline_core::result::AppResult;
use waitline_core::traits::notifier::{QueueEventStream, QueueNotifier};
use waitline_core::traits::store::QueueStore;
use waitline_core::types::store::{KeyTtl, ScanPage, ScoredMember};
use waitline_realtime::NotifierManager;
use waitline_realtime::bridge::MemoryPubSub;
use waitline_store::StoreManager;
use waitline_store::memory::MemoryQueueStore;
use waitline_worker::WaitlineRuntime;

/// Test application context
pub struct TestApp {
    /// Fully wired services
    pub runtime: WaitlineRuntime,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a test application with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application over a fresh in-memory store
    pub fn with_config(config: AppConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryQueueStore::new()))
    }

    /// Create a test application over the given store
    pub fn with_store(config: AppConfig, store: Arc<dyn QueueStore>) -> Self {
        let notifier: Arc<dyn QueueNotifier> =
            Arc::new(MemoryPubSub::new(config.notification.buffer_size));
        Self::with_parts(config, store, notifier)
    }

    /// Create a test application over the given store and notifier
    pub fn with_parts(
        config: AppConfig,
        store: Arc<dyn QueueStore>,
        notifier: Arc<dyn QueueNotifier>,
    ) -> Self {
        let runtime = WaitlineRuntime::assemble(
            &config,
            StoreManager::from_store(store),
            NotifierManager::from_notifier(notifier),
        )
        .expect("Failed to assemble runtime");
        Self { runtime, config }
    }

    /// Register users in order as regular (non-VIP) entries
    pub async fn register_all(&self, queue: &str, users: &[i64]) -> Vec<i64> {
        let mut ranks = Vec::with_capacity(users.len());
        for user in users {
            ranks.push(
                self.runtime
                    .admission
                    .register(queue, *user, false)
                    .await
                    .expect("Registration failed"),
            );
        }
        ranks
    }
}

/// Store wrapper that fails every call touching a key containing one of
/// the configured fragments.
#[derive(Debug, Default)]
pub struct FlakyStore {
    /// Working store
    inner: MemoryQueueStore,
    /// Key fragments that trigger failures
    failing: Mutex<Vec<String>>,
}

impl FlakyStore {
    /// Create a store with no failures configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call on keys containing `fragment`
    pub fn fail_on(&self, fragment: &str) {
        self.failing.lock().unwrap().push(fragment.to_string());
    }

    /// Stop failing
    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    fn check(&self, key: &str) -> AppResult<()> {
        let failing = self.failing.lock().unwrap();
        if failing.iter().any(|fragment| key.contains(fragment.as_str())) {
            return Err(AppError::store(format!("injected failure for '{key}'")));
        }
        Ok(())
    }
}

#[async_trait]
impl QueueStore for FlakyStore {
    async fn zadd_nx(&self, key: &str, member: &str, score: f64) -> AppResult<bool> {
        self.check(key)?;
        self.inner.zadd_nx(key, member, score).await
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> AppResult<bool> {
        self.check(key)?;
        self.inner.zadd(key, member, score).await
    }

    async fn zrank(&self, key: &str, member: &str) -> AppResult<Option<u64>> {
        self.check(key)?;
        self.inner.zrank(key, member).await
    }

    async fn zscore(&self, key: &str, member: &str) -> AppResult<Option<f64>> {
        self.check(key)?;
        self.inner.zscore(key, member).await
    }

    async fn zcard(&self, key: &str) -> AppResult<u64> {
        self.check(key)?;
        self.inner.zcard(key).await
    }

    async fn zrange(&self, key: &str, start: u64, stop: u64) -> AppResult<Vec<String>> {
        self.check(key)?;
        self.inner.zrange(key, start, stop).await
    }

    async fn zpop_min(&self, key: &str, count: u64) -> AppResult<Vec<ScoredMember>> {
        self.check(key)?;
        self.inner.zpop_min(key, count).await
    }

    async fn zpop_min_into(
        &self,
        src: &str,
        dst: &str,
        count: u64,
        score: f64,
    ) -> AppResult<Vec<String>> {
        self.check(src)?;
        self.check(dst)?;
        self.inner.zpop_min_into(src, dst, count, score).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        self.check(key)?;
        self.inner.expire(key, ttl).await
    }

    async fn ttl(&self, key: &str) -> AppResult<KeyTtl> {
        self.check(key)?;
        self.inner.ttl(key).await
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> AppResult<ScanPage> {
        self.inner.scan(cursor, pattern, count).await
    }

    async fn lpush_capped(&self, key: &str, value: &str, max_len: usize) -> AppResult<()> {
        self.check(key)?;
        self.inner.lpush_capped(key, value, max_len).await
    }

    async fn lrange(&self, key: &str, start: u64, stop: u64) -> AppResult<Vec<String>> {
        self.check(key)?;
        self.inner.lrange(key, start, stop).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

/// Notifier whose publishes always fail
#[derive(Debug, Default)]
pub struct FailingNotifier {
    /// Publish attempts seen
    pub attempts: Mutex<Vec<QueueEvent>>,
}

#[async_trait]
impl QueueNotifier for FailingNotifier {
    async fn publish(&self, event: &QueueEvent) -> AppResult<usize> {
        self.attempts.lock().unwrap().push(event.clone());
        Err(AppError::notification("injected publish failure"))
    }

    async fn subscribe(&self, _queue: &str) -> AppResult<QueueEventStream> {
        Ok(Box::pin(stream::empty()))
    }
}
