//! In-memory queue store backed by a concurrent map.
//!
//! Mirrors the Redis semantics the admission engine relies on: sorted sets
//! ordered by `(score, member)`, key-level expiry, deletion of emptied keys,
//! and cursor-based scans. Expiry uses the tokio clock so paused-time tests
//! can advance past a TTL.
//!
//! Scans walk an ordered key index and resume strictly after the last key a
//! page examined, so a key present for the whole scan is returned even when
//! other keys are deleted between pages.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use waitline_core::error::AppError;
use waitline_core::result::AppResult;
use waitline_core::traits::store::QueueStore;
use waitline_core::types::store::{KeyTtl, ScanPage, ScoredMember};

/// Totally ordered sorted-set score.
#[derive(Debug, Clone, Copy)]
struct Score(f64);

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Sorted set with member lookup and ordered iteration.
#[derive(Debug, Default)]
struct SortedSet {
    scores: HashMap<String, f64>,
    ordered: BTreeSet<(Score, String)>,
}

impl SortedSet {
    fn contains(&self, member: &str) -> bool {
        self.scores.contains_key(member)
    }

    fn insert(&mut self, member: &str, score: f64) -> bool {
        let previous = self.scores.insert(member.to_string(), score);
        if let Some(old) = previous {
            self.ordered.remove(&(Score(old), member.to_string()));
        }
        self.ordered.insert((Score(score), member.to_string()));
        previous.is_none()
    }

    fn rank(&self, member: &str) -> Option<u64> {
        let score = *self.scores.get(member)?;
        let rank = self
            .ordered
            .range(..(Score(score), member.to_string()))
            .count();
        Some(rank as u64)
    }

    fn pop_min(&mut self, count: u64) -> Vec<ScoredMember> {
        let mut popped = Vec::new();
        while (popped.len() as u64) < count {
            let Some((score, member)) = self.ordered.pop_first() else {
                break;
            };
            self.scores.remove(&member);
            popped.push(ScoredMember {
                member,
                score: score.0,
            });
        }
        popped
    }

    fn range(&self, start: u64, stop: u64) -> Vec<String> {
        if stop < start {
            return Vec::new();
        }
        self.ordered
            .iter()
            .skip(start as usize)
            .take((stop - start + 1) as usize)
            .map(|(_, member)| member.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.scores.len()
    }
}

/// Value held under a key.
#[derive(Debug)]
enum Value {
    Sorted(SortedSet),
    List(VecDeque<String>),
}

/// A key's value plus its expiry deadline.
#[derive(Debug)]
struct Slot {
    value: Value,
    expires_at: Option<Instant>,
}

impl Slot {
    fn sorted() -> Self {
        Self {
            value: Value::Sorted(SortedSet::default()),
            expires_at: None,
        }
    }

    fn list() -> Self {
        Self {
            value: Value::List(VecDeque::new()),
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }

    fn is_empty(&self) -> bool {
        match &self.value {
            Value::Sorted(set) => set.len() == 0,
            Value::List(list) => list.is_empty(),
        }
    }

    fn sorted_ref(&self, key: &str) -> AppResult<&SortedSet> {
        match &self.value {
            Value::Sorted(set) => Ok(set),
            Value::List(_) => Err(wrong_type(key)),
        }
    }

    fn sorted_mut(&mut self, key: &str) -> AppResult<&mut SortedSet> {
        match &mut self.value {
            Value::Sorted(set) => Ok(set),
            Value::List(_) => Err(wrong_type(key)),
        }
    }

    fn list_ref(&self, key: &str) -> AppResult<&VecDeque<String>> {
        match &self.value {
            Value::List(list) => Ok(list),
            Value::Sorted(_) => Err(wrong_type(key)),
        }
    }

    fn list_mut(&mut self, key: &str) -> AppResult<&mut VecDeque<String>> {
        match &mut self.value {
            Value::List(list) => Ok(list),
            Value::Sorted(_) => Err(wrong_type(key)),
        }
    }
}

fn wrong_type(key: &str) -> AppError {
    AppError::store(format!(
        "WRONGTYPE operation against key '{key}' holding the wrong kind of value"
    ))
}

/// In-memory queue store.
#[derive(Debug, Clone, Default)]
pub struct MemoryQueueStore {
    /// Key → value.
    entries: Arc<DashMap<String, Slot>>,
    /// Every key that may be live, in scan order. May briefly hold keys
    /// already removed from `entries`, never the reverse.
    key_index: Arc<RwLock<BTreeSet<String>>>,
    /// Open scan cursors → last key examined.
    cursors: Arc<DashMap<u64, String>>,
    /// Last cursor id handed out.
    last_cursor: Arc<AtomicU64>,
}

impl MemoryQueueStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a key whose deadline has passed.
    fn purge_if_expired(&self, key: &str) {
        let now = Instant::now();
        if self.entries.remove_if(key, |_, slot| slot.is_expired(now)).is_some() {
            self.unindex(key);
        }
    }

    /// Drop a key left empty by a removal.
    fn purge_if_empty(&self, key: &str) {
        if self.entries.remove_if(key, |_, slot| slot.is_empty()).is_some() {
            self.unindex(key);
        }
    }

    fn index_read(&self) -> RwLockReadGuard<'_, BTreeSet<String>> {
        self.key_index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn index_write(&self) -> RwLockWriteGuard<'_, BTreeSet<String>> {
        self.key_index.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a newly created key. Must be called with no `entries` guard held.
    fn index(&self, key: &str) {
        self.index_write().insert(key.to_string());
    }

    /// Forget a removed key unless it was recreated in the meantime.
    fn unindex(&self, key: &str) {
        let mut index = self.index_write();
        if !self.entries.contains_key(key) {
            index.remove(key);
        }
    }

    fn pop_lowest(&self, key: &str, count: u64) -> AppResult<Vec<ScoredMember>> {
        self.purge_if_expired(key);
        let popped = match self.entries.get_mut(key) {
            Some(mut slot) => slot.sorted_mut(key)?.pop_min(count),
            None => Vec::new(),
        };
        self.purge_if_empty(key);
        Ok(popped)
    }

    fn add_member(&self, key: &str, member: &str, score: f64, only_if_absent: bool) -> AppResult<bool> {
        self.purge_if_expired(key);
        let mut created = false;
        let added = {
            let mut slot = self.entries.entry(key.to_string()).or_insert_with(|| {
                created = true;
                Slot::sorted()
            });
            let set = slot.sorted_mut(key)?;
            if only_if_absent && set.contains(member) {
                false
            } else {
                set.insert(member, score)
            }
        };
        if created {
            self.index(key);
        }
        Ok(added)
    }
}

#[async_trait]
impl QueueStore for MemoryQueueStore {
    async fn zadd_nx(&self, key: &str, member: &str, score: f64) -> AppResult<bool> {
        self.add_member(key, member, score, true)
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> AppResult<bool> {
        self.add_member(key, member, score, false)
    }

    async fn zrank(&self, key: &str, member: &str) -> AppResult<Option<u64>> {
        self.purge_if_expired(key);
        match self.entries.get(key) {
            Some(slot) => Ok(slot.sorted_ref(key)?.rank(member)),
            None => Ok(None),
        }
    }

    async fn zscore(&self, key: &str, member: &str) -> AppResult<Option<f64>> {
        self.purge_if_expired(key);
        match self.entries.get(key) {
            Some(slot) => Ok(slot.sorted_ref(key)?.scores.get(member).copied()),
            None => Ok(None),
        }
    }

    async fn zcard(&self, key: &str) -> AppResult<u64> {
        self.purge_if_expired(key);
        match self.entries.get(key) {
            Some(slot) => Ok(slot.sorted_ref(key)?.len() as u64),
            None => Ok(0),
        }
    }

    async fn zrange(&self, key: &str, start: u64, stop: u64) -> AppResult<Vec<String>> {
        self.purge_if_expired(key);
        match self.entries.get(key) {
            Some(slot) => Ok(slot.sorted_ref(key)?.range(start, stop)),
            None => Ok(Vec::new()),
        }
    }

    async fn zpop_min(&self, key: &str, count: u64) -> AppResult<Vec<ScoredMember>> {
        let popped = self.pop_lowest(key, count)?;
        debug!(key, requested = count, popped = popped.len(), "Popped lowest members");
        Ok(popped)
    }

    async fn zpop_min_into(
        &self,
        src: &str,
        dst: &str,
        count: u64,
        score: f64,
    ) -> AppResult<Vec<String>> {
        // Both steps run in-process with no await point between them.
        let popped = self.pop_lowest(src, count)?;
        let mut moved = Vec::with_capacity(popped.len());
        for entry in popped {
            self.add_member(dst, &entry.member, score, false)?;
            moved.push(entry.member);
        }
        Ok(moved)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        self.purge_if_expired(key);
        match self.entries.get_mut(key) {
            Some(mut slot) => {
                slot.expires_at = Some(Instant::now() + ttl);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> AppResult<KeyTtl> {
        self.purge_if_expired(key);
        let now = Instant::now();
        Ok(match self.entries.get(key) {
            None => KeyTtl::Missing,
            Some(slot) => match slot.expires_at {
                None => KeyTtl::Persistent,
                Some(deadline) => KeyTtl::Expires(deadline.saturating_duration_since(now)),
            },
        })
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> AppResult<ScanPage> {
        let resume_after = if cursor == 0 {
            None
        } else {
            match self.cursors.remove(&cursor) {
                Some((_, last)) => Some(last),
                None => {
                    debug!(cursor, "Unknown scan cursor, ending scan");
                    return Ok(ScanPage::default());
                }
            }
        };

        let (examined, more) = {
            let index = self.index_read();
            let lower = match &resume_after {
                Some(last) => Bound::Excluded(last.as_str()),
                None => Bound::Unbounded,
            };
            let mut keys = index.range::<str, _>((lower, Bound::Unbounded));
            let examined: Vec<String> = keys.by_ref().take(count.max(1)).cloned().collect();
            (examined, keys.next().is_some())
        };

        let now = Instant::now();
        let matched = examined
            .iter()
            .filter(|key| glob_match(pattern, key.as_str()))
            .filter(|key| {
                self.entries
                    .get(key.as_str())
                    .is_some_and(|slot| !slot.is_expired(now))
            })
            .cloned()
            .collect();

        let next = match examined.last() {
            Some(last) if more => {
                let id = self.last_cursor.fetch_add(1, AtomicOrdering::Relaxed) + 1;
                self.cursors.insert(id, last.clone());
                id
            }
            _ => 0,
        };

        Ok(ScanPage {
            cursor: next,
            keys: matched,
        })
    }

    async fn lpush_capped(&self, key: &str, value: &str, max_len: usize) -> AppResult<()> {
        self.purge_if_expired(key);
        let mut created = false;
        {
            let mut slot = self.entries.entry(key.to_string()).or_insert_with(|| {
                created = true;
                Slot::list()
            });
            let list = slot.list_mut(key)?;
            list.push_front(value.to_string());
            if max_len > 0 {
                list.truncate(max_len);
            }
        }
        if created {
            self.index(key);
        }
        Ok(())
    }

    async fn lrange(&self, key: &str, start: u64, stop: u64) -> AppResult<Vec<String>> {
        self.purge_if_expired(key);
        match self.entries.get(key) {
            Some(slot) => {
                if stop < start {
                    return Ok(Vec::new());
                }
                Ok(slot
                    .list_ref(key)?
                    .iter()
                    .skip(start as usize)
                    .take((stop - start + 1) as usize)
                    .cloned()
                    .collect())
            }
            None => Ok(Vec::new()),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Redis-style glob matching supporting `*` and `?`.
fn glob_match(pattern: &str, text: &str) -> bool {
    let (p, t) = (pattern.as_bytes(), text.as_bytes());
    let (mut pi, mut ti) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == b'?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == b'*' {
            backtrack = Some((pi, ti));
            pi += 1;
        } else if let Some((star, matched)) = backtrack {
            pi = star + 1;
            ti = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    while pi < p.len() && p[pi] == b'*' {
        pi += 1;
    }
    pi == p.len()
}
