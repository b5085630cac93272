//! Registration, batch admission, and rank queries.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use waitline_core::config::QueueConfig;
use waitline_core::events::QueueEvent;
use waitline_core::traits::notifier::QueueNotifier;
use waitline_core::traits::store::QueueStore;
use waitline_core::types::history::HistoryAction;
use waitline_core::types::queue::{EntryStatus, NOT_WAITING, QueueStats};
use waitline_store::keys;

use super::member::{member_for, user_for};
use super::score::{admission_score, registration_score};
use crate::error::QueueError;
use crate::history::HistoryService;

/// Admission engine over a single shared ordered-set store.
///
/// No in-process locks are taken. Each queue's wait set is the only source
/// of admission order, and cross-call safety rests on the atomicity of the
/// individual store primitives.
#[derive(Debug, Clone)]
pub struct AdmissionService {
    /// Ordered-set store.
    store: Arc<dyn QueueStore>,
    /// History log.
    history: HistoryService,
    /// Event fan-out.
    notifier: Arc<dyn QueueNotifier>,
    /// Capacity, TTL, and admission mode.
    config: QueueConfig,
    /// Leading waiters told about their new rank after a batch.
    rank_change_window: u64,
}

impl AdmissionService {
    /// Creates a new admission service.
    pub fn new(
        store: Arc<dyn QueueStore>,
        history: HistoryService,
        notifier: Arc<dyn QueueNotifier>,
        config: QueueConfig,
        rank_change_window: u64,
    ) -> Self {
        Self {
            store,
            history,
            notifier,
            config,
            rank_change_window,
        }
    }

    /// The history log this engine writes to.
    pub fn history(&self) -> &HistoryService {
        &self.history
    }

    /// Adds a user to the wait set and returns their 1-based rank.
    ///
    /// Returns `-1` only if the user was admitted by a concurrent batch
    /// between the insert and the rank read.
    pub async fn register(&self, queue: &str, user_id: i64, is_vip: bool) -> Result<i64, QueueError> {
        validate_queue(queue)?;
        validate_user(user_id)?;

        let wait_key = keys::wait_set(queue);
        if let Some(limit) = self.config.capacity_limit() {
            let waiting = self.store.zcard(&wait_key).await?;
            if waiting >= limit {
                debug!(queue, user_id, waiting, limit, "Queue at capacity");
                return Err(QueueError::CapacityExceeded {
                    queue: queue.to_string(),
                    limit,
                });
            }
        }

        let score = registration_score(Utc::now(), is_vip);
        let added = self
            .store
            .zadd_nx(&wait_key, &member_for(user_id), score)
            .await?;
        if !added {
            return Err(QueueError::AlreadyRegistered {
                queue: queue.to_string(),
                user_id,
            });
        }

        if let Some(ttl) = self.config.wait_ttl() {
            self.store.expire(&wait_key, ttl).await?;
        }

        let rank = self.rank(queue, user_id).await?;
        debug!(queue, user_id, is_vip, rank, "User registered");

        self.history.append(queue, user_id, HistoryAction::Register).await;
        self.notify(QueueEvent::registered(queue, user_id, rank)).await;

        Ok(rank)
    }

    /// Admits up to `count` of the lowest-ranked waiters and returns how many
    /// were admitted.
    pub async fn allow(&self, queue: &str, count: i64) -> Result<u64, QueueError> {
        validate_queue(queue)?;
        if count < 0 {
            return Err(QueueError::InvalidCount(count));
        }
        if count == 0 {
            return Ok(0);
        }

        let admitted = if self.config.atomic_allow {
            self.admit_atomically(queue, count as u64).await?
        } else {
            self.admit_two_phase(queue, count as u64).await?
        };

        for member in &admitted {
            let Some(user_id) = user_for(member) else {
                warn!(queue, member = %member, "Admitted member is not a user id");
                continue;
            };
            self.history.append(queue, user_id, HistoryAction::Allow).await;
            self.notify(QueueEvent::allowed(queue, user_id)).await;
        }

        debug!(queue, requested = count, admitted = admitted.len(), "Batch admitted");
        if !admitted.is_empty() {
            self.notify_rank_changes(queue).await;
        }

        Ok(admitted.len() as u64)
    }

    async fn admit_atomically(&self, queue: &str, count: u64) -> Result<Vec<String>, QueueError> {
        let moved = self
            .store
            .zpop_min_into(
                &keys::wait_set(queue),
                &keys::proceed_set(queue),
                count,
                admission_score(Utc::now()),
            )
            .await?;
        Ok(moved)
    }

    /// Pop then credit. A failure while crediting loses the members not yet
    /// written to the proceed set.
    async fn admit_two_phase(&self, queue: &str, count: u64) -> Result<Vec<String>, QueueError> {
        let popped = self.store.zpop_min(&keys::wait_set(queue), count).await?;
        let proceed_key = keys::proceed_set(queue);
        let score = admission_score(Utc::now());

        for (index, entry) in popped.iter().enumerate() {
            if let Err(e) = self.store.zadd(&proceed_key, &entry.member, score).await {
                let lost: Vec<&str> = popped[index..].iter().map(|m| m.member.as_str()).collect();
                error!(queue, lost = ?lost, error = %e, "Popped users were not admitted");
                return Err(e.into());
            }
        }

        Ok(popped.into_iter().map(|entry| entry.member).collect())
    }

    /// Sends RANK_CHANGED to the leading waiters. Best-effort.
    async fn notify_rank_changes(&self, queue: &str) {
        if self.rank_change_window == 0 {
            return;
        }

        let leading = match self
            .store
            .zrange(&keys::wait_set(queue), 0, self.rank_change_window - 1)
            .await
        {
            Ok(members) => members,
            Err(e) => {
                warn!(queue, error = %e, "Failed to read waiters for rank updates");
                return;
            }
        };

        for (index, member) in leading.iter().enumerate() {
            if let Some(user_id) = user_for(member) {
                self.notify(QueueEvent::rank_changed(queue, user_id, index as i64 + 1))
                    .await;
            }
        }
    }

    /// The user's 1-based rank in the wait set, or `-1` when not waiting.
    pub async fn rank(&self, queue: &str, user_id: i64) -> Result<i64, QueueError> {
        validate_queue(queue)?;
        validate_user(user_id)?;

        let rank = self
            .store
            .zrank(&keys::wait_set(queue), &member_for(user_id))
            .await?;
        Ok(rank.map_or(NOT_WAITING, |r| r as i64 + 1))
    }

    /// Whether the user is in the proceed set.
    pub async fn is_admitted(&self, queue: &str, user_id: i64) -> Result<bool, QueueError> {
        validate_queue(queue)?;
        validate_user(user_id)?;

        let score = self
            .store
            .zscore(&keys::proceed_set(queue), &member_for(user_id))
            .await?;
        Ok(score.is_some())
    }

    /// Waiting and admitted counts. Unknown queues report zeros.
    pub async fn stats(&self, queue: &str) -> Result<QueueStats, QueueError> {
        validate_queue(queue)?;

        let waiting = self.store.zcard(&keys::wait_set(queue)).await?;
        let admitted = self.store.zcard(&keys::proceed_set(queue)).await?;
        Ok(QueueStats { waiting, admitted })
    }

    /// Seconds left before the wait set expires, or `-1` when it has no TTL
    /// or does not exist.
    pub async fn queue_ttl(&self, queue: &str) -> Result<i64, QueueError> {
        validate_queue(queue)?;

        let ttl = self.store.ttl(&keys::wait_set(queue)).await?;
        Ok(ttl.as_seconds())
    }

    /// Waiting-room entry: admitted users pass, everyone else holds a place.
    pub async fn enter(&self, queue: &str, user_id: i64) -> Result<EntryStatus, QueueError> {
        if self.is_admitted(queue, user_id).await? {
            return Ok(EntryStatus::Admitted);
        }

        match self.register(queue, user_id, false).await {
            Ok(rank) => Ok(EntryStatus::Waiting { rank }),
            Err(QueueError::AlreadyRegistered { .. }) => Ok(EntryStatus::Waiting {
                rank: self.rank(queue, user_id).await?,
            }),
            Err(e) => Err(e),
        }
    }

    /// Publishes an event. Failures are logged and swallowed.
    async fn notify(&self, event: QueueEvent) {
        match self.notifier.publish(&event).await {
            Ok(receivers) => {
                debug!(
                    queue = %event.queue,
                    user_id = event.user_id,
                    event_type = %event.event_type,
                    receivers,
                    "Event published"
                );
            }
            Err(e) => {
                warn!(
                    queue = %event.queue,
                    user_id = event.user_id,
                    event_type = %event.event_type,
                    error = %e,
                    "Failed to publish queue event"
                );
            }
        }
    }
}

fn validate_queue(queue: &str) -> Result<(), QueueError> {
    if queue.trim().is_empty() {
        return Err(QueueError::InvalidQueueName);
    }
    Ok(())
}

fn validate_user(user_id: i64) -> Result<(), QueueError> {
    if user_id <= 0 {
        return Err(QueueError::InvalidUserId(user_id));
    }
    Ok(())
}
