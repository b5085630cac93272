//! Value types exchanged with the ordered-set store.

use std::time::Duration;

/// A sorted-set member together with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMember {
    /// Member value.
    pub member: String,
    /// Score the member was ordered by.
    pub score: f64,
}

/// One page of a cursor-based key scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Cursor for the next page. `0` means the scan is complete.
    pub cursor: u64,
    /// Keys matched on this page. May be empty even when `cursor != 0`.
    pub keys: Vec<String>,
}

impl ScanPage {
    /// Returns `true` if no further pages remain.
    pub fn is_last(&self) -> bool {
        self.cursor == 0
    }
}

/// Remaining lifetime of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// The key does not exist.
    Missing,
    /// The key exists with no expiry.
    Persistent,
    /// The key expires after the given duration.
    Expires(Duration),
}

impl KeyTtl {
    /// Whole seconds remaining, or `-1` when the key is missing or persistent.
    pub fn as_seconds(&self) -> i64 {
        match self {
            Self::Expires(d) => d.as_secs() as i64,
            Self::Missing | Self::Persistent => -1,
        }
    }
}
