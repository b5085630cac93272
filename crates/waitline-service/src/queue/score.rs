//! Wait-set priority scores.
//!
//! Scores are seconds since the Unix epoch with millisecond precision. VIP
//! scores are shifted back by [`VIP_PRIORITY_OFFSET`] so every VIP sorts
//! ahead of every regular registration made within that horizon, while VIPs
//! stay FIFO among themselves.

use chrono::{DateTime, Utc};

/// Seconds subtracted from a VIP's registration instant (about 31 years).
pub const VIP_PRIORITY_OFFSET: f64 = 1_000_000_000.0;

/// Score for a registration made at `at`.
pub fn registration_score(at: DateTime<Utc>, is_vip: bool) -> f64 {
    let base = epoch_seconds(at);
    if is_vip { base - VIP_PRIORITY_OFFSET } else { base }
}

/// Score recorded in the proceed set for an admission made at `at`.
pub fn admission_score(at: DateTime<Utc>) -> f64 {
    epoch_seconds(at)
}

fn epoch_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}
