//! Best-effort per-user and per-queue admission audit trail.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use waitline_core::config::HistoryConfig;
use waitline_core::error::AppError;
use waitline_core::traits::store::QueueStore;
use waitline_core::types::history::{HistoryAction, HistoryEntry};
use waitline_store::keys;

/// Records admission lifecycle entries into bounded, newest-first lists.
#[derive(Debug, Clone)]
pub struct HistoryService {
    /// Backing store.
    store: Arc<dyn QueueStore>,
    /// Retention and default page sizes.
    config: HistoryConfig,
}

impl HistoryService {
    /// Creates a new history service.
    pub fn new(store: Arc<dyn QueueStore>, config: HistoryConfig) -> Self {
        Self { store, config }
    }

    /// Appends one entry stamped with the current time to both the user log
    /// and the queue log. Store failures are logged and swallowed.
    pub async fn append(&self, queue: &str, user_id: i64, action: HistoryAction) {
        let entry = HistoryEntry::new(queue, user_id, action, Utc::now().timestamp());
        if let Err(e) = self.record(&entry).await {
            warn!(queue, user_id, action = %action, error = %e, "Failed to record history entry");
        }
    }

    async fn record(&self, entry: &HistoryEntry) -> Result<(), AppError> {
        let encoded = serde_json::to_string(entry)?;

        self.store
            .lpush_capped(
                &keys::user_history(&entry.queue, entry.user_id),
                &encoded,
                self.config.max_entries_per_user,
            )
            .await?;
        self.store
            .lpush_capped(
                &keys::queue_history(&entry.queue),
                &encoded,
                self.config.max_entries_per_queue,
            )
            .await?;

        debug!(queue = %entry.queue, user_id = entry.user_id, action = %entry.action, "History recorded");
        Ok(())
    }

    /// Returns up to `limit` of the user's most recent entries, newest first.
    /// `None` uses the configured default.
    pub async fn recent(
        &self,
        queue: &str,
        user_id: i64,
        limit: Option<usize>,
    ) -> Result<Vec<HistoryEntry>, AppError> {
        let limit = limit.unwrap_or(self.config.default_user_limit);
        self.read(&keys::user_history(queue, user_id), limit).await
    }

    /// Returns up to `limit` of the queue's most recent entries across all
    /// users, newest first. `None` uses the configured default.
    pub async fn recent_for_queue(
        &self,
        queue: &str,
        limit: Option<usize>,
    ) -> Result<Vec<HistoryEntry>, AppError> {
        let limit = limit.unwrap_or(self.config.default_queue_limit);
        self.read(&keys::queue_history(queue), limit).await
    }

    /// The user's most recent entry, if any.
    pub async fn latest(&self, queue: &str, user_id: i64) -> Result<Option<HistoryEntry>, AppError> {
        Ok(self
            .read(&keys::user_history(queue, user_id), 1)
            .await?
            .into_iter()
            .next())
    }

    async fn read(&self, key: &str, limit: usize) -> Result<Vec<HistoryEntry>, AppError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let raw = self.store.lrange(key, 0, limit as u64 - 1).await?;
        Ok(raw
            .iter()
            .filter_map(|value| match serde_json::from_str::<HistoryEntry>(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(key, error = %e, "Skipping undecodable history entry");
                    None
                }
            })
            .collect())
    }
}
