use redis::AsyncCommands;

use super::*;

impl HealthDependencyStatus {
    pub(super) fn ok() -> Self {
        Self {
            status: "ok",
            detail: None,
        }
    }

    pub(super) fn disabled() -> Self {
        Self {
            status: "disabled",
            detail: None,
        }
    }

    pub(super) fn failed(detail: String) -> Self {
        Self {
            status: "error",
            detail: Some(detail),
        }
    }

    /// Disabled dependencies never block readiness.
    pub(super) fn is_failed(&self) -> bool {
        self.status == "error"
    }
}

pub(super) async fn check_postgres(pool: &sqlx::PgPool) -> HealthDependencyStatus {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await {
        Ok(_) => HealthDependencyStatus::ok(),
        Err(error) => HealthDependencyStatus::failed(format!("postgres check failed: {error}")),
    }
}

/// Pings Redis when a user-count cache client is configured.
pub(super) async fn check_redis(redis_client: Option<&redis::Client>) -> HealthDependencyStatus {
    let Some(redis_client) = redis_client else {
        return HealthDependencyStatus::disabled();
    };

    let mut connection = match redis_client.get_multiplexed_async_connection().await {
        Ok(connection) => connection,
        Err(error) => {
            return HealthDependencyStatus::failed(format!("redis connection failed: {error}"));
        }
    };

    match connection.ping::<String>().await {
        Ok(reply) if reply.eq_ignore_ascii_case("pong") => HealthDependencyStatus::ok(),
        Ok(reply) => HealthDependencyStatus::failed(format!("unexpected redis ping reply: {reply}")),
        Err(error) => HealthDependencyStatus::failed(format!("redis ping failed: {error}")),
    }
}
