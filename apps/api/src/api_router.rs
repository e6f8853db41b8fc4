use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use earn_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod internal;

use internal::build_internal_routes;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/homepage/user-count",
            get(handlers::homepage::user_count_handler),
        )
        .route(
            "/api/listings/rewards/summary",
            post(handlers::listings::reward_summary_handler),
        )
        .merge(build_internal_routes(app_state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
