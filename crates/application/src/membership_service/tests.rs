use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use earn_core::{AppError, AppResult};
use earn_domain::{PeopleFields, PeopleRecord, SuperteamLevel, UserId};
use tokio::sync::Barrier;

use super::{
    MembershipRefreshInput, MembershipRefreshOutcome, MembershipRefreshService,
    MembershipRefreshSkip,
};
use crate::{PeopleDirectory, PeopleDirectorySettings, PeopleTable, UserRecord, UserRepository};

#[derive(Default)]
struct FakePeopleDirectory {
    member_rows: Vec<PeopleRecord>,
    contributor_rows: Vec<PeopleRecord>,
    fail_member_query: bool,
    fail_contributor_query: bool,
    rendezvous: Option<Arc<Barrier>>,
    calls: Mutex<Vec<(String, Option<usize>)>>,
}

impl FakePeopleDirectory {
    fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    fn calls(&self) -> Vec<(String, Option<usize>)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PeopleDirectory for FakePeopleDirectory {
    async fn find_by_formula(
        &self,
        table: &PeopleTable,
        formula: &str,
        max_records: Option<usize>,
    ) -> AppResult<Vec<PeopleRecord>> {
        assert_eq!(table.base_id(), "appPeople");
        self.calls
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock calls: {error}")))?
            .push((formula.to_owned(), max_records));

        if let Some(rendezvous) = &self.rendezvous {
            rendezvous.wait().await;
        }

        if formula.contains("{Person Type}='Contributor'") {
            if self.fail_contributor_query {
                return Err(AppError::Upstream {
                    status: 503,
                    body: "service unavailable".to_owned(),
                });
            }
            return Ok(self.contributor_rows.clone());
        }

        if self.fail_member_query {
            return Err(AppError::Internal(
                "failed to reach people directory".to_owned(),
            ));
        }
        Ok(self.member_rows.clone())
    }
}

struct FakeUserRepository {
    matched_rows: u64,
    fail_writes: bool,
    applied: Mutex<Vec<(UserId, String, SuperteamLevel)>>,
}

impl FakeUserRepository {
    fn matching(matched_rows: u64) -> Self {
        Self {
            matched_rows,
            fail_writes: false,
            applied: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::matching(0)
        }
    }

    fn applied(&self) -> Vec<(UserId, String, SuperteamLevel)> {
        self.applied
            .lock()
            .map(|applied| applied.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_id(&self, _user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(None)
    }

    async fn count_users(&self) -> AppResult<i64> {
        Ok(0)
    }

    async fn apply_superteam_level(
        &self,
        user_id: UserId,
        normalized_email: &str,
        level: &SuperteamLevel,
    ) -> AppResult<u64> {
        self.applied
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock writes: {error}")))?
            .push((user_id, normalized_email.to_owned(), level.clone()));

        if self.fail_writes {
            return Err(AppError::Internal("connection reset by peer".to_owned()));
        }
        Ok(self.matched_rows)
    }
}

fn configured_settings() -> PeopleDirectorySettings {
    PeopleDirectorySettings {
        base_id: Some("appPeople".to_owned()),
        table_name: Some("Community".to_owned()),
        api_token: Some("pat-secret".to_owned()),
    }
}

fn member(created_time: &str, region: Option<&str>) -> PeopleRecord {
    PeopleRecord {
        created_time: Some(created_time.to_owned()),
        fields: Some(PeopleFields {
            region: region.map(serde_json::Value::from),
        }),
    }
}

fn contributor() -> PeopleRecord {
    PeopleRecord {
        created_time: Some("2024-02-01T00:00:00.000Z".to_owned()),
        fields: Some(PeopleFields::default()),
    }
}

fn input(user_id: UserId, email: &str, current_level: Option<&str>) -> MembershipRefreshInput {
    MembershipRefreshInput {
        user_id,
        email: email.to_owned(),
        current_superteam_level: current_level.map(str::to_owned),
    }
}

fn build_service(
    directory: Arc<FakePeopleDirectory>,
    repository: Arc<FakeUserRepository>,
    settings: PeopleDirectorySettings,
) -> MembershipRefreshService {
    MembershipRefreshService::new(directory, repository, settings)
}

#[tokio::test]
async fn missing_configuration_skips_without_calls() {
    let partial_settings = [
        PeopleDirectorySettings::default(),
        PeopleDirectorySettings {
            api_token: None,
            ..configured_settings()
        },
        PeopleDirectorySettings {
            base_id: Some("   ".to_owned()),
            ..configured_settings()
        },
        PeopleDirectorySettings {
            table_name: Some(String::new()),
            ..configured_settings()
        },
    ];

    for settings in partial_settings {
        let directory = Arc::new(FakePeopleDirectory {
            member_rows: vec![member("2024-06-01", Some("Germany"))],
            ..FakePeopleDirectory::default()
        });
        let repository = Arc::new(FakeUserRepository::matching(1));
        let service = build_service(directory.clone(), repository.clone(), settings);

        assert!(!service.is_enabled());
        let outcome = service
            .refresh_user_membership_level(input(UserId::new(), "builder@example.com", None))
            .await;

        assert_eq!(
            outcome,
            MembershipRefreshOutcome::Skipped(MembershipRefreshSkip::NotConfigured)
        );
        assert_eq!(directory.call_count(), 0);
        assert!(repository.applied().is_empty());
    }
}

#[tokio::test]
async fn blank_email_skips_without_calls() {
    let directory = Arc::new(FakePeopleDirectory::default());
    let repository = Arc::new(FakeUserRepository::matching(1));
    let service = build_service(directory.clone(), repository.clone(), configured_settings());

    let outcome = service
        .refresh_user_membership_level(input(UserId::new(), "  \t ", None))
        .await;

    assert_eq!(
        outcome,
        MembershipRefreshOutcome::Skipped(MembershipRefreshSkip::MissingEmail)
    );
    assert_eq!(directory.call_count(), 0);
    assert!(repository.applied().is_empty());
}

#[tokio::test]
async fn existing_level_is_never_overwritten() {
    let directory = Arc::new(FakePeopleDirectory {
        contributor_rows: vec![contributor()],
        ..FakePeopleDirectory::default()
    });
    let repository = Arc::new(FakeUserRepository::matching(1));
    let service = build_service(directory.clone(), repository.clone(), configured_settings());

    let outcome = service
        .refresh_user_membership_level(input(
            UserId::new(),
            "builder@example.com",
            Some(" Superteam India "),
        ))
        .await;

    assert_eq!(
        outcome,
        MembershipRefreshOutcome::Skipped(MembershipRefreshSkip::LevelAlreadySet)
    );
    assert_eq!(directory.call_count(), 0);
    assert!(repository.applied().is_empty());
}

#[tokio::test]
async fn whitespace_level_counts_as_unset() {
    let directory = Arc::new(FakePeopleDirectory {
        member_rows: vec![member("2024-06-01", Some("Germany"))],
        ..FakePeopleDirectory::default()
    });
    let repository = Arc::new(FakeUserRepository::matching(1));
    let service = build_service(directory.clone(), repository.clone(), configured_settings());

    let outcome = service
        .refresh_user_membership_level(input(UserId::new(), "builder@example.com", Some("  ")))
        .await;

    assert_eq!(
        outcome,
        MembershipRefreshOutcome::Updated {
            level: SuperteamLevel::Regional("Germany".to_owned()),
            count: 1,
        }
    );
}

#[tokio::test]
async fn latest_member_region_is_written_with_normalized_email() {
    let directory = Arc::new(FakePeopleDirectory {
        member_rows: vec![
            member("2023-01-01", Some("India")),
            member("2024-06-01", Some("Germany")),
        ],
        ..FakePeopleDirectory::default()
    });
    let repository = Arc::new(FakeUserRepository::matching(1));
    let service = build_service(directory.clone(), repository.clone(), configured_settings());
    let user_id = UserId::new();

    let outcome = service
        .refresh_user_membership_level(input(user_id, "  Builder@Example.com ", None))
        .await;

    let expected_level = SuperteamLevel::Regional("Germany".to_owned());
    assert_eq!(
        outcome,
        MembershipRefreshOutcome::Updated {
            level: expected_level.clone(),
            count: 1,
        }
    );
    assert_eq!(
        repository.applied(),
        vec![(user_id, "builder@example.com".to_owned(), expected_level)]
    );

    let calls = directory.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.contains(&(
        "AND(LOWER({Email})='builder@example.com', {Person Type}='Member')".to_owned(),
        None
    )));
    assert!(
        calls
            .iter()
            .any(|(formula, max_records)| formula.contains("'Contributor'")
                && *max_records == Some(1))
    );
}

#[tokio::test]
async fn contributor_takes_precedence_over_member() {
    let directory = Arc::new(FakePeopleDirectory {
        member_rows: vec![member("2024-06-01", Some("Germany"))],
        contributor_rows: vec![contributor()],
        ..FakePeopleDirectory::default()
    });
    let repository = Arc::new(FakeUserRepository::matching(1));
    let service = build_service(directory, repository.clone(), configured_settings());

    let outcome = service
        .refresh_user_membership_level(input(UserId::new(), "builder@example.com", None))
        .await;

    assert_eq!(
        outcome,
        MembershipRefreshOutcome::Updated {
            level: SuperteamLevel::Contributor,
            count: 1,
        }
    );
    assert_eq!(repository.applied().len(), 1);
}

#[tokio::test]
async fn members_without_region_write_nothing() {
    let directory = Arc::new(FakePeopleDirectory {
        member_rows: vec![member("2024-06-01", None), member("2024-07-01", Some(" "))],
        ..FakePeopleDirectory::default()
    });
    let repository = Arc::new(FakeUserRepository::matching(1));
    let service = build_service(directory.clone(), repository.clone(), configured_settings());

    let outcome = service
        .refresh_user_membership_level(input(UserId::new(), "builder@example.com", None))
        .await;

    assert_eq!(outcome, MembershipRefreshOutcome::NoLevelChange);
    assert_eq!(directory.call_count(), 2);
    assert!(repository.applied().is_empty());
}

#[tokio::test]
async fn unmatched_identity_is_reported_not_raised() {
    let directory = Arc::new(FakePeopleDirectory {
        contributor_rows: vec![contributor()],
        ..FakePeopleDirectory::default()
    });
    let repository = Arc::new(FakeUserRepository::matching(0));
    let service = build_service(directory, repository.clone(), configured_settings());

    let outcome = service
        .refresh_user_membership_level(input(UserId::new(), "builder@example.com", None))
        .await;

    assert_eq!(
        outcome,
        MembershipRefreshOutcome::NoMatchingUser {
            level: SuperteamLevel::Contributor,
        }
    );
    assert_eq!(repository.applied().len(), 1);
}

#[tokio::test]
async fn failure_on_either_branch_is_swallowed_without_write() {
    let failing_directories = [
        FakePeopleDirectory {
            contributor_rows: vec![contributor()],
            fail_member_query: true,
            ..FakePeopleDirectory::default()
        },
        FakePeopleDirectory {
            member_rows: vec![member("2024-06-01", Some("Germany"))],
            fail_contributor_query: true,
            ..FakePeopleDirectory::default()
        },
    ];

    for directory in failing_directories {
        let repository = Arc::new(FakeUserRepository::matching(1));
        let service = build_service(Arc::new(directory), repository.clone(), configured_settings());

        let outcome = service
            .refresh_user_membership_level(input(UserId::new(), "builder@example.com", None))
            .await;

        assert!(matches!(outcome, MembershipRefreshOutcome::Failed { .. }));
        assert!(repository.applied().is_empty());
    }
}

#[tokio::test]
async fn upstream_failure_description_is_kept() {
    let directory = Arc::new(FakePeopleDirectory {
        fail_contributor_query: true,
        ..FakePeopleDirectory::default()
    });
    let repository = Arc::new(FakeUserRepository::matching(1));
    let service = build_service(directory, repository, configured_settings());

    let outcome = service
        .refresh_user_membership_level(input(UserId::new(), "builder@example.com", None))
        .await;

    assert_eq!(
        outcome,
        MembershipRefreshOutcome::Failed {
            error: "upstream request failed (503): service unavailable".to_owned(),
        }
    );
}

#[tokio::test]
async fn write_failure_is_reported_not_raised() {
    let directory = Arc::new(FakePeopleDirectory {
        member_rows: vec![member("2024-06-01", Some("Germany"))],
        ..FakePeopleDirectory::default()
    });
    let repository = Arc::new(FakeUserRepository::failing());
    let service = build_service(directory, repository.clone(), configured_settings());

    let outcome = service
        .refresh_user_membership_level(input(UserId::new(), "builder@example.com", None))
        .await;

    match outcome {
        MembershipRefreshOutcome::Failed { error } => {
            assert!(error.contains("connection reset by peer"));
        }
        other => panic!("expected failed outcome, got {other:?}"),
    }
    assert_eq!(repository.applied().len(), 1);
}

#[tokio::test]
async fn member_and_contributor_queries_run_concurrently() {
    let directory = Arc::new(FakePeopleDirectory {
        member_rows: vec![member("2024-06-01", Some("Germany"))],
        rendezvous: Some(Arc::new(Barrier::new(2))),
        ..FakePeopleDirectory::default()
    });
    let repository = Arc::new(FakeUserRepository::matching(1));
    let service = build_service(directory.clone(), repository, configured_settings());

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        service.refresh_user_membership_level(input(UserId::new(), "builder@example.com", None)),
    )
    .await;

    assert_eq!(
        outcome.ok(),
        Some(MembershipRefreshOutcome::Updated {
            level: SuperteamLevel::Regional("Germany".to_owned()),
            count: 1,
        })
    );
    assert_eq!(directory.call_count(), 2);
}
