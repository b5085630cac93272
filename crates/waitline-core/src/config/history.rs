//! Admission history retention configuration.

use serde::{Deserialize, Serialize};

/// History log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Entries kept in each per-user log.
    #[serde(default = "default_max_per_user")]
    pub max_entries_per_user: usize,
    /// Entries kept in each per-queue aggregate log.
    #[serde(default = "default_max_per_queue")]
    pub max_entries_per_queue: usize,
    /// Default page size for per-user history reads.
    #[serde(default = "default_user_limit")]
    pub default_user_limit: usize,
    /// Default page size for per-queue history reads.
    #[serde(default = "default_queue_limit")]
    pub default_queue_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries_per_user: default_max_per_user(),
            max_entries_per_queue: default_max_per_queue(),
            default_user_limit: default_user_limit(),
            default_queue_limit: default_queue_limit(),
        }
    }
}

fn default_max_per_user() -> usize {
    100
}

fn default_max_per_queue() -> usize {
    1000
}

fn default_user_limit() -> usize {
    10
}

fn default_queue_limit() -> usize {
    50
}
