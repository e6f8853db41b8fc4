use std::time::{Duration, Instant};

use async_trait::async_trait;
use earn_application::UserCountCache;
use earn_core::AppResult;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy)]
struct UserCountCacheEntry {
    total_users: i64,
    expires_at: Instant,
}

/// In-memory cache adapter for the user count.
#[derive(Default)]
pub struct InMemoryUserCountCache {
    entry: RwLock<Option<UserCountCacheEntry>>,
}

impl InMemoryUserCountCache {
    /// Creates an empty in-memory user count cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserCountCache for InMemoryUserCountCache {
    async fn get_total_users(&self) -> AppResult<Option<i64>> {
        {
            let entry = self.entry.read().await;
            match *entry {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.total_users));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut entry = self.entry.write().await;
        if entry.is_some_and(|entry| entry.expires_at <= Instant::now()) {
            *entry = None;
        }

        Ok(None)
    }

    async fn set_total_users(&self, total_users: i64, ttl_seconds: u32) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }

        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(u64::from(ttl_seconds)))
            .unwrap_or(now);

        *self.entry.write().await = Some(UserCountCacheEntry {
            total_users,
            expires_at,
        });

        Ok(())
    }
}
