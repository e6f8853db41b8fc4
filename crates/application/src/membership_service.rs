//! Community membership refresh.
//!
//! Fills in a user's community level from the people directory the first
//! time it is known. The refresh is best-effort enrichment: it never returns
//! an error to its caller and never overwrites an existing level.

use std::sync::Arc;

use tracing::{debug, info, warn};

use earn_core::AppResult;
use earn_domain::{
    SuperteamLevel, UserId, contributor_formula, member_formula, normalize_email,
    resolve_superteam_level, select_member_record,
};

use crate::{PeopleDirectory, PeopleDirectorySettings, PeopleTable, UserRepository};

/// Input for one membership refresh.
#[derive(Debug, Clone)]
pub struct MembershipRefreshInput {
    /// User to refresh.
    pub user_id: UserId,
    /// Email as currently stored on the user.
    pub email: String,
    /// Level currently stored on the user, if any.
    pub current_superteam_level: Option<String>,
}

/// Why a refresh stopped before querying the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipRefreshSkip {
    /// People directory settings are incomplete.
    NotConfigured,
    /// The user has no usable email.
    MissingEmail,
    /// The user already has a level.
    LevelAlreadySet,
}

/// What a refresh did. Informational only; failures are already logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipRefreshOutcome {
    /// Nothing was queried.
    Skipped(MembershipRefreshSkip),
    /// Directory rows did not yield a level.
    NoLevelChange,
    /// The level was written.
    Updated {
        /// Level written to the user.
        level: SuperteamLevel,
        /// Rows changed.
        count: u64,
    },
    /// A level was resolved but no user matched the id and email.
    NoMatchingUser {
        /// Level that would have been written.
        level: SuperteamLevel,
    },
    /// The directory query or the write failed.
    Failed {
        /// Error description.
        error: String,
    },
}

/// Application service that refreshes community levels.
#[derive(Clone)]
pub struct MembershipRefreshService {
    people_directory: Arc<dyn PeopleDirectory>,
    user_repository: Arc<dyn UserRepository>,
    settings: PeopleDirectorySettings,
}

impl MembershipRefreshService {
    /// Creates a new membership refresh service.
    #[must_use]
    pub fn new(
        people_directory: Arc<dyn PeopleDirectory>,
        user_repository: Arc<dyn UserRepository>,
        settings: PeopleDirectorySettings,
    ) -> Self {
        Self {
            people_directory,
            user_repository,
            settings,
        }
    }

    /// Returns whether the people directory is fully configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.settings.people_table().is_some()
    }

    /// Looks the user up in the people directory and stores their level.
    pub async fn refresh_user_membership_level(
        &self,
        input: MembershipRefreshInput,
    ) -> MembershipRefreshOutcome {
        let user_id = input.user_id;

        let Some(people_table) = self.settings.people_table() else {
            debug!(
                user_id = %user_id,
                "skipping membership refresh: people directory is not fully configured"
            );
            return MembershipRefreshOutcome::Skipped(MembershipRefreshSkip::NotConfigured);
        };

        let Some(normalized_email) = normalize_email(&input.email) else {
            debug!(user_id = %user_id, "skipping membership refresh: user has no email");
            return MembershipRefreshOutcome::Skipped(MembershipRefreshSkip::MissingEmail);
        };

        if let Some(current_level) = input
            .current_superteam_level
            .as_deref()
            .filter(|level| !level.trim().is_empty())
        {
            debug!(
                user_id = %user_id,
                current_superteam_level = %current_level,
                "skipping membership refresh: user already has a superteam level"
            );
            return MembershipRefreshOutcome::Skipped(MembershipRefreshSkip::LevelAlreadySet);
        }

        match self
            .refresh_from_directory(&people_table, user_id, normalized_email.as_str())
            .await
        {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(user_id = %user_id, error = %error, "membership refresh errored");
                MembershipRefreshOutcome::Failed {
                    error: error.to_string(),
                }
            }
        }
    }

    async fn refresh_from_directory(
        &self,
        people_table: &PeopleTable,
        user_id: UserId,
        normalized_email: &str,
    ) -> AppResult<MembershipRefreshOutcome> {
        let member_formula = member_formula(normalized_email);
        let contributor_formula = contributor_formula(normalized_email);

        let (member_records, contributor_records) = tokio::try_join!(
            self.people_directory
                .find_by_formula(people_table, member_formula.as_str(), None),
            self.people_directory
                .find_by_formula(people_table, contributor_formula.as_str(), Some(1)),
        )?;

        if !member_records.is_empty() && select_member_record(&member_records).is_none() {
            debug!(
                user_id = %user_id,
                email = %normalized_email,
                "membership refresh found no usable member record"
            );
        }

        let Some(level) = resolve_superteam_level(&member_records, &contributor_records) else {
            debug!(user_id = %user_id, "membership refresh found no superteam level change");
            return Ok(MembershipRefreshOutcome::NoLevelChange);
        };

        let count = self
            .user_repository
            .apply_superteam_level(user_id, normalized_email, &level)
            .await?;

        if count > 0 {
            info!(
                user_id = %user_id,
                email = %normalized_email,
                superteam_level = %level,
                count,
                "membership refresh updated superteam level"
            );
            return Ok(MembershipRefreshOutcome::Updated { level, count });
        }

        debug!(
            user_id = %user_id,
            email = %normalized_email,
            "membership refresh found no matching users"
        );
        Ok(MembershipRefreshOutcome::NoMatchingUser { level })
    }
}

#[cfg(test)]
mod tests;
