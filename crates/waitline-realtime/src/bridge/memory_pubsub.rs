//! In-memory pub/sub for single-node deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use tokio::sync::RwLock;
use tokio::sync::broadcast;
use tracing::warn;

use waitline_core::events::QueueEvent;
use waitline_core::result::AppResult;
use waitline_core::traits::notifier::{QueueEventStream, QueueNotifier};
use waitline_store::keys;

/// In-memory pub/sub implementation.
#[derive(Debug)]
pub struct MemoryPubSub {
    /// Channel name → broadcast sender
    channels: RwLock<HashMap<String, broadcast::Sender<QueueEvent>>>,
    /// Buffer size for channels
    buffer_size: usize,
}

impl MemoryPubSub {
    /// Create a new in-memory pub/sub
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Number of channels with a live sender.
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Drop a channel once its last subscriber is gone.
    async fn prune(&self, channel: &str) {
        let mut channels = self.channels.write().await;
        if channels
            .get(channel)
            .is_some_and(|tx| tx.receiver_count() == 0)
        {
            channels.remove(channel);
        }
    }
}

#[async_trait]
impl QueueNotifier for MemoryPubSub {
    async fn publish(&self, event: &QueueEvent) -> AppResult<usize> {
        let channel = keys::notification_channel(&event.queue);
        let delivered = {
            let channels = self.channels.read().await;
            match channels.get(&channel) {
                Some(tx) => tx.send(event.clone()).ok(),
                None => return Ok(0),
            }
        };

        match delivered {
            Some(receivers) => Ok(receivers),
            None => {
                self.prune(&channel).await;
                Ok(0)
            }
        }
    }

    async fn subscribe(&self, queue: &str) -> AppResult<QueueEventStream> {
        let channel = keys::notification_channel(queue);
        let rx = {
            let mut channels = self.channels.write().await;
            channels
                .entry(channel.clone())
                .or_insert_with(|| broadcast::channel(self.buffer_size).0)
                .subscribe()
        };

        let events = stream::unfold(rx, move |mut rx| {
            let channel = channel.clone();
            async move {
                loop {
                    match rx.recv().await {
                        Ok(event) => return Some((event, rx)),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(channel = %channel, skipped, "Subscriber lagged, events dropped");
                        }
                        Err(broadcast::error::RecvError::Closed) => return None,
                    }
                }
            }
        });

        Ok(events.boxed())
    }
}
