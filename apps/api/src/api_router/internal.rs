use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::post;

use crate::state::AppState;
use crate::{handlers, middleware};

pub(super) fn build_internal_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/internal/users/{user_id}/membership/refresh",
            post(handlers::membership::refresh_membership_handler),
        )
        .route_layer(from_fn_with_state(
            app_state,
            middleware::require_internal_auth,
        ))
}
