use std::fmt::{Debug, Formatter};

use async_trait::async_trait;
use earn_core::{AppResult, NonEmptyString};
use earn_domain::PeopleRecord;

/// Location and credential of the community people table.
#[derive(Clone)]
pub struct PeopleTable {
    base_id: NonEmptyString,
    table_name: NonEmptyString,
    api_token: NonEmptyString,
}

impl PeopleTable {
    /// Creates a people table target from validated parts.
    #[must_use]
    pub fn new(
        base_id: NonEmptyString,
        table_name: NonEmptyString,
        api_token: NonEmptyString,
    ) -> Self {
        Self {
            base_id,
            table_name,
            api_token,
        }
    }

    /// Returns the base identifier.
    #[must_use]
    pub fn base_id(&self) -> &str {
        self.base_id.as_str()
    }

    /// Returns the table name or identifier.
    #[must_use]
    pub fn table_name(&self) -> &str {
        self.table_name.as_str()
    }

    /// Returns the bearer credential.
    #[must_use]
    pub fn api_token(&self) -> &str {
        self.api_token.as_str()
    }
}

impl Debug for PeopleTable {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("PeopleTable")
            .field("base_id", &self.base_id.as_str())
            .field("table_name", &self.table_name.as_str())
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// People directory settings as loaded from configuration.
///
/// Any missing value disables membership refresh.
#[derive(Clone, Default)]
pub struct PeopleDirectorySettings {
    /// Base identifier of the people table.
    pub base_id: Option<String>,
    /// Table name or identifier.
    pub table_name: Option<String>,
    /// Bearer credential for the directory API.
    pub api_token: Option<String>,
}

impl PeopleDirectorySettings {
    /// Returns the people table when every setting is present and non-blank.
    #[must_use]
    pub fn people_table(&self) -> Option<PeopleTable> {
        Some(PeopleTable::new(
            NonEmptyString::from_optional(self.base_id.clone())?,
            NonEmptyString::from_optional(self.table_name.clone())?,
            NonEmptyString::from_optional(self.api_token.clone())?,
        ))
    }
}

impl Debug for PeopleDirectorySettings {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("PeopleDirectorySettings")
            .field("base_id", &self.base_id)
            .field("table_name", &self.table_name)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Port for filtered queries against the people directory.
#[async_trait]
pub trait PeopleDirectory: Send + Sync {
    /// Returns every row matching `formula`, following pagination until
    /// exhausted or until `max_records` rows were collected.
    ///
    /// With a cap the result holds at most `max_records` rows.
    async fn find_by_formula(
        &self,
        table: &PeopleTable,
        formula: &str,
        max_records: Option<usize>,
    ) -> AppResult<Vec<PeopleRecord>>;
}
