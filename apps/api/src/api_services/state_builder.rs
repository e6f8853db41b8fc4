use std::sync::Arc;
use std::time::Duration;

use earn_application::{MembershipRefreshService, UserCountCache, UserService};
use earn_core::AppError;
use earn_infrastructure::{
    AirtablePeopleDirectory, InMemoryUserCountCache, PostgresUserRepository,
    RedisUserCountCache,
};
use sqlx::PgPool;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::state::AppState;

use super::redis::build_redis_client;

const PEOPLE_DIRECTORY_TIMEOUT: Duration = Duration::from_secs(15);

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> Result<AppState, AppError> {
    let redis_client = config
        .redis_url
        .as_deref()
        .map(build_redis_client)
        .transpose()?;

    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let user_count_cache = build_user_count_cache(redis_client.clone());
    let user_service = UserService::new(user_repository.clone(), user_count_cache);

    let http_client = reqwest::Client::builder()
        .timeout(PEOPLE_DIRECTORY_TIMEOUT)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;
    let people_directory = Arc::new(AirtablePeopleDirectory::new(
        http_client,
        config.airtable_api_base_url.as_str(),
    )?);

    let membership_refresh_service = MembershipRefreshService::new(
        people_directory,
        user_repository,
        config.people_directory.clone(),
    );
    if !membership_refresh_service.is_enabled() {
        info!("people directory is not configured; membership refresh is disabled");
    }

    Ok(AppState {
        user_service,
        membership_refresh_service,
        internal_api_secret: config.internal_api_secret.clone(),
        postgres_pool: pool,
        redis_client,
    })
}

fn build_user_count_cache(redis_client: Option<redis::Client>) -> Arc<dyn UserCountCache> {
    match redis_client {
        Some(redis_client) => Arc::new(RedisUserCountCache::new(redis_client, "earn:user_count")),
        None => Arc::new(InMemoryUserCountCache::new()),
    }
}
