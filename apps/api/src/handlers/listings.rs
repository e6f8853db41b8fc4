use axum::Json;
use earn_domain::{Rewards, clean_reward_prizes, clean_rewards, nth_label, rank_label, sort_rank};

use crate::dto::{RewardPositionResponse, RewardSummaryRequest, RewardSummaryResponse};

pub async fn reward_summary_handler(
    Json(payload): Json<RewardSummaryRequest>,
) -> Json<RewardSummaryResponse> {
    Json(summarize_rewards(&payload.rewards, payload.skip_bonus))
}

fn summarize_rewards(rewards: &Rewards, skip_bonus: bool) -> RewardSummaryResponse {
    let positions = sort_rank(&clean_rewards(Some(rewards), skip_bonus))
        .into_iter()
        .map(|position| RewardPositionResponse {
            position,
            label: nth_label(position, false),
            rank_label: rank_label(position),
            amount: rewards.amount(position),
        })
        .collect();

    RewardSummaryResponse {
        positions,
        total_prize: clean_reward_prizes(Some(rewards), skip_bonus).iter().sum(),
    }
}

#[cfg(test)]
mod tests {
    use earn_domain::Rewards;

    use super::summarize_rewards;

    fn rewards(payload: serde_json::Value) -> Rewards {
        match serde_json::from_value(payload) {
            Ok(rewards) => rewards,
            Err(error) => panic!("failed to decode rewards: {error}"),
        }
    }

    #[test]
    fn lines_follow_rank_order_with_labels() {
        let summary = summarize_rewards(
            &rewards(serde_json::json!({ "2": 250, "1": "500", "99": 50, "3": null })),
            false,
        );

        let lines: Vec<(u32, &str, Option<&str>, Option<f64>)> = summary
            .positions
            .iter()
            .map(|line| (line.position, line.label.as_str(), line.rank_label, line.amount))
            .collect();
        assert_eq!(
            lines,
            vec![
                (1, "1st", Some("first"), Some(500.0)),
                (2, "2nd", Some("second"), Some(250.0)),
                (3, "3rd", Some("third"), None),
                (99, "bonus", Some("bonus"), Some(50.0)),
            ]
        );
        assert!((summary.total_prize - 800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn skipping_bonus_drops_line_and_amount() {
        let summary = summarize_rewards(
            &rewards(serde_json::json!({ "1": 1000, "99": 100, "title": 5 })),
            true,
        );

        assert_eq!(summary.positions.len(), 1);
        assert_eq!(summary.positions[0].label, "1st");
        assert!((summary.total_prize - 1000.0).abs() < f64::EPSILON);
    }
}
