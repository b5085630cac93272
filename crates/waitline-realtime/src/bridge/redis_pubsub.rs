//! Redis pub/sub bridge for multi-node deployments.

#[cfg(feature = "redis-pubsub")]
pub mod implementation {
    use async_trait::async_trait;
    use futures::StreamExt;
    use tracing::{debug, warn};

    use waitline_core::error::{AppError, ErrorKind};
    use waitline_core::events::QueueEvent;
    use waitline_core::result::AppResult;
    use waitline_core::traits::notifier::{QueueEventStream, QueueNotifier};
    use waitline_store::keys;
    use waitline_store::redis::RedisClient;

    use crate::message::{decode_event, encode_event};

    /// Redis pub/sub bridge for cross-node event relay.
    #[derive(Debug, Clone)]
    pub struct RedisPubSub {
        /// Shared Redis client.
        client: RedisClient,
    }

    impl RedisPubSub {
        /// Creates a new Redis pub/sub bridge.
        pub fn new(client: RedisClient) -> Self {
            Self { client }
        }

        fn map_err(context: &str, e: redis::RedisError) -> AppError {
            AppError::with_source(ErrorKind::Notification, format!("{context}: {e}"), e)
        }
    }

    #[async_trait]
    impl QueueNotifier for RedisPubSub {
        async fn publish(&self, event: &QueueEvent) -> AppResult<usize> {
            let channel = self
                .client
                .prefixed_key(&keys::notification_channel(&event.queue));
            let payload = encode_event(event)?;

            let mut conn = self.client.conn_mut();
            let receivers: i64 = redis::cmd("PUBLISH")
                .arg(&channel)
                .arg(&payload)
                .query_async(&mut conn)
                .await
                .map_err(|e| Self::map_err("Redis PUBLISH failed", e))?;

            Ok(receivers.max(0) as usize)
        }

        async fn subscribe(&self, queue: &str) -> AppResult<QueueEventStream> {
            let channel = self
                .client
                .prefixed_key(&keys::notification_channel(queue));

            let mut pubsub = self
                .client
                .client()
                .get_async_pubsub()
                .await
                .map_err(|e| Self::map_err("Redis pub/sub connection failed", e))?;
            pubsub
                .subscribe(&channel)
                .await
                .map_err(|e| Self::map_err("Redis SUBSCRIBE failed", e))?;
            debug!(channel = %channel, "Subscribed to queue events");

            let events = pubsub.into_on_message().filter_map(|msg| async move {
                let payload: String = match msg.get_payload() {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!(error = %e, "Unreadable pub/sub payload");
                        return None;
                    }
                };
                match decode_event(&payload) {
                    Ok(event) => Some(event),
                    Err(e) => {
                        warn!(error = %e, "Skipping undecodable queue event");
                        None
                    }
                }
            });

            Ok(events.boxed())
        }
    }
}

#[cfg(feature = "redis-pubsub")]
pub use implementation::RedisPubSub;
