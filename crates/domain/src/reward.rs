//! Listing reward positions and their labels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reward position reserved for the bonus prize.
pub const BONUS_REWARD_POSITION: u32 = 99;

const RANK_LABELS: [&str; 51] = [
    "zeroth",
    "first",
    "second",
    "third",
    "fourth",
    "fifth",
    "sixth",
    "seventh",
    "eighth",
    "ninth",
    "tenth",
    "eleventh",
    "twelfth",
    "thirteenth",
    "fourteenth",
    "fifteenth",
    "sixteenth",
    "seventeenth",
    "eighteenth",
    "nineteenth",
    "twentieth",
    "twentyFirst",
    "twentySecond",
    "twentyThird",
    "twentyFourth",
    "twentyFifth",
    "twentySixth",
    "twentySeventh",
    "twentyEighth",
    "twentyNinth",
    "thirtieth",
    "thirtyFirst",
    "thirtySecond",
    "thirtyThird",
    "thirtyFourth",
    "thirtyFifth",
    "thirtySixth",
    "thirtySeventh",
    "thirtyEighth",
    "thirtyNinth",
    "fortieth",
    "fortyFirst",
    "fortySecond",
    "fortyThird",
    "fortyFourth",
    "fortyFifth",
    "fortySixth",
    "fortySeventh",
    "fortyEighth",
    "fortyNinth",
    "fiftieth",
];

/// Reward amounts keyed by position, as stored on a listing.
///
/// Deserializes from a JSON object with stringified positions. Keys that are
/// not positions are dropped; amounts that are null or not numeric are kept
/// as `None` so the position itself still counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, Option<f64>>")]
pub struct Rewards(BTreeMap<u32, Option<f64>>);

impl Rewards {
    /// Builds rewards from explicit position and amount pairs.
    #[must_use]
    pub fn from_amounts(amounts: impl IntoIterator<Item = (u32, f64)>) -> Self {
        Self(
            amounts
                .into_iter()
                .map(|(position, amount)| (position, Some(amount)))
                .collect(),
        )
    }

    /// Returns the amount for a position, if one is set.
    #[must_use]
    pub fn amount(&self, position: u32) -> Option<f64> {
        self.0.get(&position).copied().flatten()
    }
}

impl From<BTreeMap<String, Value>> for Rewards {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        Self(
            raw.into_iter()
                .filter_map(|(key, value)| {
                    let position = key.trim().parse::<u32>().ok()?;
                    Some((position, amount_from_value(&value)))
                })
                .collect(),
        )
    }
}

impl From<Rewards> for BTreeMap<String, Option<f64>> {
    fn from(rewards: Rewards) -> Self {
        rewards
            .0
            .into_iter()
            .map(|(position, amount)| (position.to_string(), amount))
            .collect()
    }
}

fn amount_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|amount| amount.is_finite())
}

/// Returns the camel-case ordinal word for a rank, or `bonus`.
#[must_use]
pub fn rank_label(rank: u32) -> Option<&'static str> {
    if rank == BONUS_REWARD_POSITION {
        return Some("bonus");
    }

    usize::try_from(rank)
        .ok()
        .and_then(|index| RANK_LABELS.get(index))
        .copied()
}

/// Formats a position as a numeric ordinal such as `1st` or `12th`.
#[must_use]
pub fn nth_label(position: u32, no_bonus_label: bool) -> String {
    if position == BONUS_REWARD_POSITION && !no_bonus_label {
        return "bonus".to_owned();
    }

    if (11..=13).contains(&(position % 100)) {
        return format!("{position}th");
    }

    let suffix = match position % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };

    format!("{position}{suffix}")
}

/// Returns the reward positions in ascending order.
#[must_use]
pub fn clean_rewards(rewards: Option<&Rewards>, skip_bonus: bool) -> Vec<u32> {
    rewards
        .map(|rewards| {
            rewards
                .0
                .keys()
                .copied()
                .filter(|position| !skip_bonus || *position != BONUS_REWARD_POSITION)
                .collect()
        })
        .unwrap_or_default()
}

/// Returns the reward amounts in position order.
#[must_use]
pub fn clean_reward_prizes(rewards: Option<&Rewards>, skip_bonus: bool) -> Vec<f64> {
    rewards
        .map(|rewards| {
            rewards
                .0
                .iter()
                .filter(|(position, _)| !skip_bonus || **position != BONUS_REWARD_POSITION)
                .filter_map(|(_, amount)| *amount)
                .collect()
        })
        .unwrap_or_default()
}

/// Returns the ranks sorted ascending.
#[must_use]
pub fn sort_rank(ranks: &[u32]) -> Vec<u32> {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();
    sorted
}
