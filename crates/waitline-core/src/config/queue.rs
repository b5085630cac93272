//! Wait-set capacity and expiry configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Admission engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum number of waiting users per queue. `0` means unlimited.
    #[serde(default)]
    pub max_capacity: u64,
    /// Expiry applied to the whole wait set on every registration.
    /// `0` disables expiry.
    #[serde(default)]
    pub ttl_seconds: u64,
    /// Pop and credit admitted users in one atomic store call instead of
    /// two separate calls.
    #[serde(default)]
    pub atomic_allow: bool,
}

impl QueueConfig {
    /// Capacity limit, if one is configured.
    pub fn capacity_limit(&self) -> Option<u64> {
        (self.max_capacity > 0).then_some(self.max_capacity)
    }

    /// Wait-set TTL, if one is configured.
    pub fn wait_ttl(&self) -> Option<Duration> {
        (self.ttl_seconds > 0).then(|| Duration::from_secs(self.ttl_seconds))
    }
}
