//! Airtable-backed people directory.

use async_trait::async_trait;
use earn_application::{PeopleDirectory, PeopleTable};
use earn_core::{AppError, AppResult};
use earn_domain::PeopleRecord;
use reqwest::header;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Public Airtable REST endpoint.
pub const DEFAULT_AIRTABLE_API_BASE_URL: &str = "https://api.airtable.com/v0";

#[derive(Debug, Deserialize)]
struct PeoplePage {
    #[serde(default)]
    records: Vec<PeopleRecord>,
    offset: Option<String>,
}

/// HTTP implementation of the people directory port.
#[derive(Clone)]
pub struct AirtablePeopleDirectory {
    http_client: reqwest::Client,
    api_base_url: Url,
}

impl AirtablePeopleDirectory {
    /// Creates a directory client rooted at `api_base_url`.
    pub fn new(http_client: reqwest::Client, api_base_url: &str) -> AppResult<Self> {
        let parsed = Url::parse(api_base_url).map_err(|error| {
            AppError::Validation(format!(
                "invalid people directory base url '{api_base_url}': {error}"
            ))
        })?;

        if parsed.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "people directory base url '{api_base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            http_client,
            api_base_url: parsed,
        })
    }

    fn table_url(&self, table: &PeopleTable) -> AppResult<Url> {
        let mut url = self.api_base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal("people directory base url cannot carry a path".to_owned())
            })?
            .pop_if_empty()
            .push(table.base_id())
            .push(table.table_name());

        Ok(url)
    }

    async fn fetch_page(
        &self,
        table_url: &Url,
        table: &PeopleTable,
        formula: &str,
        max_records: Option<usize>,
        offset: Option<&str>,
    ) -> AppResult<PeoplePage> {
        let mut page_url = table_url.clone();
        {
            let mut query = page_url.query_pairs_mut();
            query.append_pair("filterByFormula", formula);
            if let Some(max_records) = max_records {
                query.append_pair("maxRecords", max_records.to_string().as_str());
            }
            if let Some(offset) = offset {
                query.append_pair("offset", offset);
            }
        }

        let response = self
            .http_client
            .get(page_url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", table.api_token()),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to call people directory: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<PeoplePage>().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to decode people directory response: {error}"
            ))
        })
    }
}

#[async_trait]
impl PeopleDirectory for AirtablePeopleDirectory {
    async fn find_by_formula(
        &self,
        table: &PeopleTable,
        formula: &str,
        max_records: Option<usize>,
    ) -> AppResult<Vec<PeopleRecord>> {
        let max_records = max_records.filter(|max_records| *max_records > 0);
        let table_url = self.table_url(table)?;

        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0_u32;

        loop {
            let page = self
                .fetch_page(&table_url, table, formula, max_records, offset.as_deref())
                .await?;
            pages = pages.saturating_add(1);
            records.extend(page.records);
            offset = page.offset.filter(|offset| !offset.is_empty());

            let below_cap = max_records.is_none_or(|max_records| records.len() < max_records);
            if offset.is_none() || !below_cap {
                break;
            }
        }

        if let Some(max_records) = max_records {
            records.truncate(max_records);
        }

        debug!(
            table = %table.table_name(),
            pages,
            records = records.len(),
            "fetched people directory records"
        );

        Ok(records)
    }
}
