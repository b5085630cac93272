//! Ordered-set store trait for pluggable backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::store::{KeyTtl, ScanPage, ScoredMember};

/// Keyed sorted-set and list primitives the admission engine relies on.
///
/// Every method is atomic on its own. Sorted sets order members by score
/// ascending, then by member bytes ascending. Implementations are
/// responsible for key prefixing and expiry enforcement.
#[async_trait]
pub trait QueueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Add `member` only if it is absent. Returns `true` if it was added.
    async fn zadd_nx(&self, key: &str, member: &str, score: f64) -> AppResult<bool>;

    /// Add or update `member`. Returns `true` if it was newly added.
    async fn zadd(&self, key: &str, member: &str, score: f64) -> AppResult<bool>;

    /// 0-based position of `member`, or `None` if absent.
    async fn zrank(&self, key: &str, member: &str) -> AppResult<Option<u64>>;

    /// Score of `member`, or `None` if absent.
    async fn zscore(&self, key: &str, member: &str) -> AppResult<Option<f64>>;

    /// Number of members. `0` for a missing key.
    async fn zcard(&self, key: &str) -> AppResult<u64>;

    /// Members at positions `start..=stop` in ascending order.
    async fn zrange(&self, key: &str, start: u64, stop: u64) -> AppResult<Vec<String>>;

    /// Remove and return up to `count` lowest-scored members.
    async fn zpop_min(&self, key: &str, count: u64) -> AppResult<Vec<ScoredMember>>;

    /// Remove up to `count` lowest-scored members of `src` and add each to
    /// `dst` with `score`, as a single atomic step. Returns the moved members.
    async fn zpop_min_into(
        &self,
        src: &str,
        dst: &str,
        count: u64,
        score: f64,
    ) -> AppResult<Vec<String>>;

    /// Set the time-to-live of a whole key. Returns `false` if the key is missing.
    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool>;

    /// Remaining lifetime of a key.
    async fn ttl(&self, key: &str) -> AppResult<KeyTtl>;

    /// One page of a cursor-based scan over keys matching a glob `pattern`.
    /// Start with cursor `0`; the scan is complete when the returned cursor is `0`.
    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> AppResult<ScanPage>;

    /// Push `value` to the head of a list and trim it to `max_len` entries.
    async fn lpush_capped(&self, key: &str, value: &str, max_len: usize) -> AppResult<()>;

    /// List entries at positions `start..=stop`, head first.
    async fn lrange(&self, key: &str, start: u64, stop: u64) -> AppResult<Vec<String>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
