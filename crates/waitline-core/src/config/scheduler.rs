//! Periodic admission scheduler configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Whether scheduled admission is enabled. A disabled scheduler still
    /// ticks but every tick is a no-op.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Delay before the first tick, in milliseconds.
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    /// Delay between the end of one tick and the start of the next, in milliseconds.
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
    /// Number of users admitted per queue on each tick.
    #[serde(default = "default_max_allow_count")]
    pub max_allow_count: u64,
    /// `COUNT` hint for each page of the active-queue scan.
    #[serde(default = "default_scan_batch_size")]
    pub scan_batch_size: usize,
}

impl SchedulerConfig {
    /// Delay before the first tick.
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Delay between ticks.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay_ms: default_initial_delay(),
            interval_ms: default_interval(),
            max_allow_count: default_max_allow_count(),
            scan_batch_size: default_scan_batch_size(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_initial_delay() -> u64 {
    5000
}

fn default_interval() -> u64 {
    3000
}

fn default_max_allow_count() -> u64 {
    3
}

fn default_scan_batch_size() -> usize {
    100
}
