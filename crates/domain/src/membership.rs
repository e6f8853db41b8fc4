//! Community membership levels and their eligibility rules.

use std::cmp::Reverse;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields read from one people table row.
///
/// Only the region matters for eligibility; other cells are ignored so
/// lookup or formula columns cannot break decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeopleFields {
    /// Regional chapter cell. Only text values are used.
    #[serde(rename = "Region", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Value>,
}

/// One row returned by the people directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeopleRecord {
    /// Row creation timestamp as reported by the directory.
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    /// Row cell values, absent or `null` for rows without cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<PeopleFields>,
}

impl PeopleRecord {
    /// Returns the region when it has non-whitespace content.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.fields
            .as_ref()?
            .region
            .as_ref()?
            .as_str()
            .filter(|region| !region.trim().is_empty())
    }

    /// Returns the creation time in epoch milliseconds, `0` when missing or
    /// unparsable.
    #[must_use]
    pub fn created_at_millis(&self) -> i64 {
        self.created_time
            .as_deref()
            .and_then(parse_timestamp_millis)
            .unwrap_or(0)
    }
}

fn parse_timestamp_millis(value: &str) -> Option<i64> {
    let value = value.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.timestamp_millis());
    }

    if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(timestamp.and_utc().timestamp_millis());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|timestamp| timestamp.and_utc().timestamp_millis())
}

/// Community level stored on the user record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SuperteamLevel {
    /// Member of a regional chapter.
    Regional(String),
    /// Recognised contributor. Takes precedence over regional membership.
    Contributor,
}

impl Display for SuperteamLevel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regional(region) => write!(formatter, "Superteam {region}"),
            Self::Contributor => formatter.write_str("Contributor"),
        }
    }
}

/// Picks the most recently created member row that names a region.
///
/// Rows with equal timestamps keep their directory order, so the first one
/// wins.
#[must_use]
pub fn select_member_record(member_records: &[PeopleRecord]) -> Option<&PeopleRecord> {
    let mut candidates: Vec<&PeopleRecord> = member_records
        .iter()
        .filter(|record| record.region().is_some())
        .collect();
    candidates.sort_by_key(|record| Reverse(record.created_at_millis()));

    candidates.into_iter().next()
}

/// Resolves the level a user should receive from their directory rows.
#[must_use]
pub fn resolve_superteam_level(
    member_records: &[PeopleRecord],
    contributor_records: &[PeopleRecord],
) -> Option<SuperteamLevel> {
    if !contributor_records.is_empty() {
        return Some(SuperteamLevel::Contributor);
    }

    select_member_record(member_records)
        .and_then(PeopleRecord::region)
        .map(|region| SuperteamLevel::Regional(region.to_owned()))
}
