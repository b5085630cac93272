//! Notifier manager that dispatches to the configured transport.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use waitline_core::config::NotificationConfig;
use waitline_core::error::AppError;
use waitline_core::events::QueueEvent;
use waitline_core::result::AppResult;
use waitline_core::traits::notifier::{QueueEventStream, QueueNotifier};

use crate::bridge::MemoryPubSub;

/// Notifier manager that wraps the configured pub/sub transport.
#[derive(Debug, Clone)]
pub struct NotifierManager {
    /// The inner notifier.
    inner: Arc<dyn QueueNotifier>,
}

impl NotifierManager {
    /// Create a new notifier manager from configuration.
    ///
    /// The Redis transport reuses the store's client and therefore requires
    /// the Redis store provider.
    #[cfg(feature = "redis-pubsub")]
    pub fn new(
        config: &NotificationConfig,
        redis: Option<&waitline_store::redis::RedisClient>,
    ) -> AppResult<Self> {
        let inner: Arc<dyn QueueNotifier> = match config.provider.as_str() {
            "redis" => {
                let client = redis.ok_or_else(|| {
                    AppError::configuration(
                        "Redis notifications require the Redis store provider",
                    )
                })?;
                info!("Initializing Redis pub/sub notifier");
                Arc::new(crate::bridge::RedisPubSub::new(client.clone()))
            }
            "memory" => Self::memory(config),
            other => return Err(unknown_provider(other)),
        };

        Ok(Self { inner })
    }

    /// Create a new notifier manager from configuration.
    #[cfg(not(feature = "redis-pubsub"))]
    pub fn new(config: &NotificationConfig) -> AppResult<Self> {
        let inner = match config.provider.as_str() {
            "memory" => Self::memory(config),
            other => return Err(unknown_provider(other)),
        };

        Ok(Self { inner })
    }

    fn memory(config: &NotificationConfig) -> Arc<dyn QueueNotifier> {
        info!(buffer_size = config.buffer_size, "Initializing in-memory notifier");
        Arc::new(MemoryPubSub::new(config.buffer_size))
    }

    /// Create a notifier manager from an existing notifier (for testing).
    pub fn from_notifier(notifier: Arc<dyn QueueNotifier>) -> Self {
        Self { inner: notifier }
    }

    /// Get a shared handle to the inner notifier.
    pub fn notifier(&self) -> Arc<dyn QueueNotifier> {
        Arc::clone(&self.inner)
    }
}

fn unknown_provider(name: &str) -> AppError {
    AppError::configuration(format!(
        "Unknown notification provider: '{name}'. Supported: memory, redis"
    ))
}

#[async_trait]
impl QueueNotifier for NotifierManager {
    async fn publish(&self, event: &QueueEvent) -> AppResult<usize> {
        self.inner.publish(event).await
    }

    async fn subscribe(&self, queue: &str) -> AppResult<QueueEventStream> {
        self.inner.subscribe(queue).await
    }
}
