//! Queue-level value types returned by the admission engine.

use serde::{Deserialize, Serialize};

/// Rank reported for a user that is not in the wait set.
pub const NOT_WAITING: i64 = -1;

/// Current cardinalities of a queue's two sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Users currently in the wait set.
    pub waiting: u64,
    /// Users ever credited to the proceed set.
    pub admitted: u64,
}

/// Outcome of a waiting-room entry attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    /// The user may proceed to the protected resource.
    Admitted,
    /// The user is waiting at the given 1-based rank.
    Waiting {
        /// 1-based position in the wait set.
        rank: i64,
    },
}

impl EntryStatus {
    /// Returns `true` if the user may proceed.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted)
    }
}
