//! User ports and application service.
//!
//! Owns user lookups, the cached platform user count, and the conditional
//! write of community levels.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use earn_core::AppResult;
use earn_domain::{SuperteamLevel, UserId};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User record returned by repository queries.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Stored email address.
    pub email: String,
    /// Community level, if one was assigned.
    pub superteam_level: Option<String>,
    /// Account creation time.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Counts all users.
    async fn count_users(&self) -> AppResult<i64>;

    /// Sets the community level on the user matching both `user_id` and
    /// `normalized_email`. Returns the number of rows changed.
    ///
    /// Zero is a valid answer: the row may have changed since it was read.
    async fn apply_superteam_level(
        &self,
        user_id: UserId,
        normalized_email: &str,
        level: &SuperteamLevel,
    ) -> AppResult<u64>;
}

/// Optional cache port for the total user count.
#[async_trait]
pub trait UserCountCache: Send + Sync {
    /// Returns the cached total, if still fresh.
    async fn get_total_users(&self) -> AppResult<Option<i64>>;

    /// Stores the total for `ttl_seconds`.
    async fn set_total_users(&self, total_users: i64, ttl_seconds: u32) -> AppResult<()>;
}

/// How long the user count stays cached.
pub const USER_COUNT_CACHE_TTL_SECONDS: u32 = 60 * 60;

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for user lookups and the homepage user count.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    user_count_cache: Arc<dyn UserCountCache>,
    user_count_ttl_seconds: u32,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        user_count_cache: Arc<dyn UserCountCache>,
    ) -> Self {
        Self {
            user_repository,
            user_count_cache,
            user_count_ttl_seconds: USER_COUNT_CACHE_TTL_SECONDS,
        }
    }

    /// Overrides the user count cache ttl.
    #[must_use]
    pub fn with_user_count_ttl_seconds(mut self, ttl_seconds: u32) -> Self {
        self.user_count_ttl_seconds = ttl_seconds;
        self
    }

    /// Returns a user record by ID, if it exists.
    pub async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.user_repository.find_by_id(user_id).await
    }

    /// Returns the number of registered users.
    ///
    /// Cache failures fall back to the repository.
    pub async fn total_users(&self) -> AppResult<i64> {
        match self.user_count_cache.get_total_users().await {
            Ok(Some(total_users)) => return Ok(total_users),
            Ok(None) => {}
            Err(error) => warn!(error = %error, "failed to read cached user count"),
        }

        let total_users = self.user_repository.count_users().await?;

        if let Err(error) = self
            .user_count_cache
            .set_total_users(total_users, self.user_count_ttl_seconds)
            .await
        {
            warn!(error = %error, "failed to cache user count");
        }

        Ok(total_users)
    }
}
