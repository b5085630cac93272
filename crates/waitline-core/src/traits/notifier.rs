//! Queue event fan-out trait.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::events::QueueEvent;
use crate::result::AppResult;

/// Stream of events delivered to a single subscriber.
pub type QueueEventStream = BoxStream<'static, QueueEvent>;

/// Publish/subscribe fan-out of queue events, one channel per queue.
///
/// Delivery is at-most-once best-effort broadcast: subscribers only see
/// events published after they subscribed.
#[async_trait]
pub trait QueueNotifier: Send + Sync + std::fmt::Debug + 'static {
    /// Publish an event on its queue's channel. Returns the number of
    /// subscribers reached; `0` is valid.
    async fn publish(&self, event: &QueueEvent) -> AppResult<usize>;

    /// Subscribe to all future events of a queue.
    async fn subscribe(&self, queue: &str) -> AppResult<QueueEventStream>;
}
