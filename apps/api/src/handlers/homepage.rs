use axum::Json;
use axum::extract::State;

use crate::dto::UserCountResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn user_count_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<UserCountResponse>> {
    let total_users = state.user_service.total_users().await?;

    Ok(Json(UserCountResponse { total_users }))
}
