//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod airtable_people_directory;
mod in_memory_user_count_cache;
mod postgres_user_repository;
mod redis_user_count_cache;

pub use airtable_people_directory::{AirtablePeopleDirectory, DEFAULT_AIRTABLE_API_BASE_URL};
pub use in_memory_user_count_cache::InMemoryUserCountCache;
pub use postgres_user_repository::PostgresUserRepository;
pub use redis_user_count_cache::RedisUserCountCache;
