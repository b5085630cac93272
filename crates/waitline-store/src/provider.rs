//! Store manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use waitline_core::config::StoreConfig;
use waitline_core::error::AppError;
use waitline_core::result::AppResult;
use waitline_core::traits::store::QueueStore;
use waitline_core::types::store::{KeyTtl, ScanPage, ScoredMember};

/// Store manager that wraps the configured queue store.
///
/// The provider is selected at construction time based on configuration.
/// When Redis is selected, the connected client is kept so the
/// notification layer can share it.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store.
    inner: Arc<dyn QueueStore>,
    /// Shared Redis client, if the Redis provider is active.
    #[cfg(feature = "redis-backend")]
    redis: Option<crate::redis::RedisClient>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis queue store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                let store = crate::redis::RedisQueueStore::new(client.clone());
                Ok(Self {
                    inner: Arc::new(store),
                    redis: Some(client),
                })
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory queue store");
                Ok(Self::from_store(Arc::new(
                    crate::memory::MemoryQueueStore::new(),
                )))
            }
            other => Err(AppError::configuration(format!(
                "Unknown store provider: '{other}'. Supported: memory, redis"
            ))),
        }
    }

    /// Create a store manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn QueueStore>) -> Self {
        Self {
            inner: store,
            #[cfg(feature = "redis-backend")]
            redis: None,
        }
    }

    /// Get a shared handle to the inner store.
    pub fn store(&self) -> Arc<dyn QueueStore> {
        Arc::clone(&self.inner)
    }

    /// The Redis client backing this store, if any.
    #[cfg(feature = "redis-backend")]
    pub fn redis_client(&self) -> Option<&crate::redis::RedisClient> {
        self.redis.as_ref()
    }
}

#[async_trait]
impl QueueStore for StoreManager {
    async fn zadd_nx(&self, key: &str, member: &str, score: f64) -> AppResult<bool> {
        self.inner.zadd_nx(key, member, score).await
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> AppResult<bool> {
        self.inner.zadd(key, member, score).await
    }

    async fn zrank(&self, key: &str, member: &str) -> AppResult<Option<u64>> {
        self.inner.zrank(key, member).await
    }

    async fn zscore(&self, key: &str, member: &str) -> AppResult<Option<f64>> {
        self.inner.zscore(key, member).await
    }

    async fn zcard(&self, key: &str) -> AppResult<u64> {
        self.inner.zcard(key).await
    }

    async fn zrange(&self, key: &str, start: u64, stop: u64) -> AppResult<Vec<String>> {
        self.inner.zrange(key, start, stop).await
    }

    async fn zpop_min(&self, key: &str, count: u64) -> AppResult<Vec<ScoredMember>> {
        self.inner.zpop_min(key, count).await
    }

    async fn zpop_min_into(
        &self,
        src: &str,
        dst: &str,
        count: u64,
        score: f64,
    ) -> AppResult<Vec<String>> {
        self.inner.zpop_min_into(src, dst, count, score).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        self.inner.expire(key, ttl).await
    }

    async fn ttl(&self, key: &str) -> AppResult<KeyTtl> {
        self.inner.ttl(key).await
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> AppResult<ScanPage> {
        self.inner.scan(cursor, pattern, count).await
    }

    async fn lpush_capped(&self, key: &str, value: &str, max_len: usize) -> AppResult<()> {
        self.inner.lpush_capped(key, value, max_len).await
    }

    async fn lrange(&self, key: &str, start: u64, stop: u64) -> AppResult<Vec<String>> {
        self.inner.lrange(key, start, stop).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
