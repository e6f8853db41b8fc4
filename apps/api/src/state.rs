use earn_application::{MembershipRefreshService, UserService};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub membership_refresh_service: MembershipRefreshService,
    pub internal_api_secret: String,
    pub postgres_pool: PgPool,
    pub redis_client: Option<redis::Client>,
}
