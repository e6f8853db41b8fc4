use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use earn_application::PeopleDirectorySettings;
use earn_core::AppError;
use earn_infrastructure::DEFAULT_AIRTABLE_API_BASE_URL;
use tracing_subscriber::EnvFilter;

const MIN_INTERNAL_API_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub internal_api_secret: String,
    pub airtable_api_base_url: String,
    pub people_directory: PeopleDirectorySettings,
    pub redis_url: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let internal_api_secret = required_non_empty_env("INTERNAL_API_SECRET")?;
        if internal_api_secret.len() < MIN_INTERNAL_API_SECRET_LEN {
            return Err(AppError::Validation(format!(
                "INTERNAL_API_SECRET must be at least {MIN_INTERNAL_API_SECRET_LEN} characters"
            )));
        }

        let airtable_api_base_url = optional_non_empty_env("AIRTABLE_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_AIRTABLE_API_BASE_URL.to_owned());

        let people_directory = PeopleDirectorySettings {
            base_id: optional_non_empty_env("AIRTABLE_PEOPLE_BASE_ID"),
            table_name: optional_non_empty_env("AIRTABLE_PEOPLE_COMMUNITY_TABLE"),
            api_token: optional_non_empty_env("AIRTABLE_PEOPLE_API_TOKEN"),
        };

        let redis_url = optional_non_empty_env("REDIS_URL");

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            api_host,
            api_port,
            internal_api_secret,
            airtable_api_base_url,
            people_directory,
            redis_url,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn optional_non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
