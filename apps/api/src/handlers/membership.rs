use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use earn_application::MembershipRefreshInput;
use earn_core::AppError;
use earn_domain::UserId;
use tracing::debug;

use crate::dto::MembershipRefreshAcceptedResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Schedules a membership refresh for the user and answers immediately.
///
/// The refresh runs on its own task; its outcome is only logged.
pub async fn refresh_membership_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<(StatusCode, Json<MembershipRefreshAcceptedResponse>)> {
    let user_id = parse_user_id(user_id.as_str())?;
    let user = state
        .user_service
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;

    let membership_refresh_service = state.membership_refresh_service.clone();
    tokio::spawn(async move {
        let outcome = membership_refresh_service
            .refresh_user_membership_level(MembershipRefreshInput {
                user_id: user.id,
                email: user.email,
                current_superteam_level: user.superteam_level,
            })
            .await;
        debug!(user_id = %user_id, outcome = ?outcome, "membership refresh finished");
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(MembershipRefreshAcceptedResponse { status: "accepted" }),
    ))
}

fn parse_user_id(value: &str) -> Result<UserId, AppError> {
    uuid::Uuid::parse_str(value)
        .map(UserId::from_uuid)
        .map_err(|error| AppError::Validation(format!("invalid user id '{value}': {error}")))
}
