//! Queue lifecycle events.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueEventType {
    /// A user joined a wait set. `data` carries the rank.
    Registered,
    /// A waiting user's rank moved. `data` carries the new rank.
    RankChanged,
    /// A user was admitted. `data` is `"true"`.
    Allowed,
}

impl fmt::Display for QueueEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered => write!(f, "REGISTERED"),
            Self::RankChanged => write!(f, "RANK_CHANGED"),
            Self::Allowed => write!(f, "ALLOWED"),
        }
    }
}

/// A lifecycle event published on a queue's channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEvent {
    /// Queue the event belongs to.
    pub queue: String,
    /// User the event is about.
    pub user_id: i64,
    /// Event kind.
    pub event_type: QueueEventType,
    /// Event payload.
    pub data: String,
}

impl QueueEvent {
    /// Create a new event.
    pub fn new(
        queue: impl Into<String>,
        user_id: i64,
        event_type: QueueEventType,
        data: impl Into<String>,
    ) -> Self {
        Self {
            queue: queue.into(),
            user_id,
            event_type,
            data: data.into(),
        }
    }

    /// A user registered at `rank`.
    pub fn registered(queue: &str, user_id: i64, rank: i64) -> Self {
        Self::new(queue, user_id, QueueEventType::Registered, rank.to_string())
    }

    /// A waiting user moved to `rank`.
    pub fn rank_changed(queue: &str, user_id: i64, rank: i64) -> Self {
        Self::new(queue, user_id, QueueEventType::RankChanged, rank.to_string())
    }

    /// A user was admitted.
    pub fn allowed(queue: &str, user_id: i64) -> Self {
        Self::new(queue, user_id, QueueEventType::Allowed, "true")
    }
}
