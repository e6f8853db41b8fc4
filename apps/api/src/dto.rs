use earn_domain::Rewards;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Per-dependency health check result.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-dependency-status.ts"
)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    #[ts(optional)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
    pub redis: HealthDependencyStatus,
}

/// Homepage user count.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-count-response.ts"
)]
pub struct UserCountResponse {
    pub total_users: i64,
}

/// Acknowledgement for a scheduled membership refresh.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/membership-refresh-accepted-response.ts"
)]
pub struct MembershipRefreshAcceptedResponse {
    pub status: &'static str,
}

/// Incoming listing rewards to summarize.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reward-summary-request.ts"
)]
pub struct RewardSummaryRequest {
    #[ts(type = "Record<string, number | string | null>")]
    pub rewards: Rewards,
    #[serde(default)]
    pub skip_bonus: bool,
}

/// One reward line of a listing.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reward-position-response.ts"
)]
pub struct RewardPositionResponse {
    pub position: u32,
    pub label: String,
    pub rank_label: Option<&'static str>,
    pub amount: Option<f64>,
}

/// Reward lines in rank order plus the prize total.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reward-summary-response.ts"
)]
pub struct RewardSummaryResponse {
    pub positions: Vec<RewardPositionResponse>,
    pub total_prize: f64,
}
