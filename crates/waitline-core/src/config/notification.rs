//! Queue event fan-out configuration.

use serde::{Deserialize, Serialize};

/// Notification bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Pub/sub provider: `"memory"` (single node) or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Ring buffer size of each in-memory broadcast channel.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// How many leading waiters receive `RANK_CHANGED` after an admission
    /// batch. `0` disables rank-change events.
    #[serde(default = "default_rank_change_window")]
    pub rank_change_window: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            buffer_size: default_buffer_size(),
            rank_change_window: default_rank_change_window(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_buffer_size() -> usize {
    256
}

fn default_rank_change_window() -> u64 {
    100
}
