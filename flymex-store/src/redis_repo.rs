use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use flymex_core::repository::{RateLimiter, RepositoryError, RepositoryResult};

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    /// Opens the client lazily; no connection is made until first use.
    pub fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    /// Counts a hit in the current window. The expiry is set only when the
    /// key has none, so the window starts at the first hit and retries made
    /// while limited do not push it back.
    pub async fn incr_window(&self, key: &str, window_seconds: i64) -> Result<i64, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let (count, ttl): (i64, i64) = redis::pipe()
            .atomic()
            .incr(key, 1)
            .ttl(key)
            .query_async(&mut conn)
            .await?;

        // -1: key exists without an expiry (first hit, or a lost EXPIRE).
        if ttl < 0 {
            let _: () = conn.expire(key, window_seconds).await?;
        }

        Ok(count)
    }
}

#[async_trait]
impl RateLimiter for RedisClient {
    async fn check_rate_limit(&self, key: &str, limit: i64, window_seconds: i64) -> RepositoryResult<bool> {
        let count = self
            .incr_window(&format!("ratelimit:{}", key), window_seconds)
            .await
            .map_err(RepositoryError::storage)?;

        debug!("Rate limit {}: {}/{}", key, count, limit);
        Ok(count <= limit)
    }
}
