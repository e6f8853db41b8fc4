use super::checks::{check_postgres, check_redis};
use super::*;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (postgres, redis) = tokio::join!(
        check_postgres(&state.postgres_pool),
        check_redis(state.redis_client.as_ref()),
    );

    let (http_status, response) = summarize(postgres, redis);
    (http_status, Json(response))
}

fn summarize(
    postgres: HealthDependencyStatus,
    redis: HealthDependencyStatus,
) -> (StatusCode, HealthResponse) {
    let ready = !postgres.is_failed() && !redis.is_failed();
    let (http_status, status) = if ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        http_status,
        HealthResponse {
            status,
            ready,
            postgres,
            redis,
        },
    )
}
