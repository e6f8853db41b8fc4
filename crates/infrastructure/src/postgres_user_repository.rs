//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use earn_application::{UserRecord, UserRepository};
use earn_core::{AppError, AppResult};
use earn_domain::{SuperteamLevel, UserId};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    email: String,
    superteam_level: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            email: row.email,
            superteam_level: row.superteam_level,
            created_at: row.created_at,
        }
    }
}

mod level;
mod lookup;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.find_by_id_impl(user_id).await
    }

    async fn count_users(&self) -> AppResult<i64> {
        self.count_users_impl().await
    }

    async fn apply_superteam_level(
        &self,
        user_id: UserId,
        normalized_email: &str,
        level: &SuperteamLevel,
    ) -> AppResult<u64> {
        self.apply_superteam_level_impl(user_id, normalized_email, level)
            .await
    }
}
