//! Redis-backed user count cache.

use async_trait::async_trait;
use earn_application::UserCountCache;
use earn_core::{AppError, AppResult};
use redis::AsyncCommands;

/// Redis implementation of the user count cache port.
#[derive(Clone)]
pub struct RedisUserCountCache {
    client: redis::Client,
    key: String,
}

impl RedisUserCountCache {
    /// Creates a cache adapter with a configured Redis client and key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key: format!("{}:total_users", key_prefix.into()),
        }
    }

    fn decode_total_users(value: &str) -> AppResult<i64> {
        value.trim().parse::<i64>().map_err(|error| {
            AppError::Internal(format!("invalid user count cache value '{value}': {error}"))
        })
    }
}

#[async_trait]
impl UserCountCache for RedisUserCountCache {
    async fn get_total_users(&self) -> AppResult<Option<i64>> {
        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))?;

        let encoded: Option<String> = connection.get(self.key.as_str()).await.map_err(|error| {
            AppError::Internal(format!("failed to read user count cache entry: {error}"))
        })?;

        encoded.as_deref().map(Self::decode_total_users).transpose()
    }

    async fn set_total_users(&self, total_users: i64, ttl_seconds: u32) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }

        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))?;

        connection
            .set_ex(
                self.key.as_str(),
                total_users.to_string(),
                u64::from(ttl_seconds),
            )
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to write user count cache entry: {error}"))
            })
    }
}
