//! Pub/sub transports behind [`QueueNotifier`](waitline_core::traits::notifier::QueueNotifier).

pub mod memory_pubsub;
pub mod redis_pubsub;

pub use memory_pubsub::MemoryPubSub;
#[cfg(feature = "redis-pubsub")]
pub use redis_pubsub::RedisPubSub;
