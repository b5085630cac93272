//! Redis queue store implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::Script;
use tracing::debug;

use waitline_core::error::{AppError, ErrorKind};
use waitline_core::result::AppResult;
use waitline_core::traits::store::QueueStore;
use waitline_core::types::store::{KeyTtl, ScanPage, ScoredMember};

use super::client::RedisClient;

/// Pops the lowest members of `KEYS[1]` and adds them to `KEYS[2]` in one
/// server-side step. `ARGV[1]` is the count, `ARGV[2]` the new score.
const POP_MIN_INTO_SCRIPT: &str = r#"
local popped = redis.call('ZPOPMIN', KEYS[1], ARGV[1])
local moved = {}
for i = 1, #popped, 2 do
    redis.call('ZADD', KEYS[2], ARGV[2], popped[i])
    moved[#moved + 1] = popped[i]
end
return moved
"#;

/// Redis-backed queue store.
#[derive(Debug, Clone)]
pub struct RedisQueueStore {
    /// Redis client.
    client: RedisClient,
    /// Atomic pop-and-credit script.
    pop_min_into: Script,
}

impl RedisQueueStore {
    /// Create a new Redis queue store.
    pub fn new(client: RedisClient) -> Self {
        Self {
            client,
            pop_min_into: Script::new(POP_MIN_INTO_SCRIPT),
        }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Store, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl QueueStore for RedisQueueStore {
    async fn zadd_nx(&self, key: &str, member: &str, score: f64) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let added: i64 = redis::cmd("ZADD")
            .arg(&full_key)
            .arg("NX")
            .arg(score)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(added == 1)
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let added: i64 = redis::cmd("ZADD")
            .arg(&full_key)
            .arg(score)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(added == 1)
    }

    async fn zrank(&self, key: &str, member: &str) -> AppResult<Option<u64>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let rank: Option<u64> = redis::cmd("ZRANK")
            .arg(&full_key)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(rank)
    }

    async fn zscore(&self, key: &str, member: &str) -> AppResult<Option<f64>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let score: Option<f64> = redis::cmd("ZSCORE")
            .arg(&full_key)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(score)
    }

    async fn zcard(&self, key: &str) -> AppResult<u64> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let size: u64 = redis::cmd("ZCARD")
            .arg(&full_key)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(size)
    }

    async fn zrange(&self, key: &str, start: u64, stop: u64) -> AppResult<Vec<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let members: Vec<String> = redis::cmd("ZRANGE")
            .arg(&full_key)
            .arg(start)
            .arg(stop)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(members)
    }

    async fn zpop_min(&self, key: &str, count: u64) -> AppResult<Vec<ScoredMember>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let popped: Vec<(String, f64)> = redis::cmd("ZPOPMIN")
            .arg(&full_key)
            .arg(count)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        debug!(key, requested = count, popped = popped.len(), "Popped lowest members");
        Ok(popped
            .into_iter()
            .map(|(member, score)| ScoredMember { member, score })
            .collect())
    }

    async fn zpop_min_into(
        &self,
        src: &str,
        dst: &str,
        count: u64,
        score: f64,
    ) -> AppResult<Vec<String>> {
        let src_key = self.client.prefixed_key(src);
        let dst_key = self.client.prefixed_key(dst);
        let mut conn = self.client.conn_mut();
        let moved: Vec<String> = self
            .pop_min_into
            .key(&src_key)
            .key(&dst_key)
            .arg(count)
            .arg(score)
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        debug!(src, dst, requested = count, moved = moved.len(), "Moved lowest members");
        Ok(moved)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let updated: i64 = redis::cmd("EXPIRE")
            .arg(&full_key)
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(updated == 1)
    }

    async fn ttl(&self, key: &str) -> AppResult<KeyTtl> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let seconds: i64 = redis::cmd("TTL")
            .arg(&full_key)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        Ok(match seconds {
            -2 => KeyTtl::Missing,
            s if s < 0 => KeyTtl::Persistent,
            s => KeyTtl::Expires(Duration::from_secs(s as u64)),
        })
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> AppResult<ScanPage> {
        let full_pattern = self.client.prefixed_key(pattern);
        let mut conn = self.client.conn_mut();
        let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(&full_pattern)
            .arg("COUNT")
            .arg(count)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        Ok(ScanPage {
            cursor: next,
            keys: keys
                .into_iter()
                .map(|k| self.client.unprefixed_key(k))
                .collect(),
        })
    }

    async fn lpush_capped(&self, key: &str, value: &str, max_len: usize) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();

        let mut pipe = redis::pipe();
        pipe.atomic().cmd("LPUSH").arg(&full_key).arg(value).ignore();
        if max_len > 0 {
            pipe.cmd("LTRIM")
                .arg(&full_key)
                .arg(0)
                .arg(max_len as i64 - 1)
                .ignore();
        }

        let _: () = pipe.query_async(&mut conn).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn lrange(&self, key: &str, start: u64, stop: u64) -> AppResult<Vec<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let values: Vec<String> = redis::cmd("LRANGE")
            .arg(&full_key)
            .arg(start)
            .arg(stop)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(values)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
