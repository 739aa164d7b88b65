use crate::backups::status::BackupStatus;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// How long a poll result is reused before the storage backend is asked again.
pub const CACHE_TTL: Duration = Duration::from_secs(30);

struct CacheEntry {
    backups: Arc<Vec<BackupStatus>>,
    expires_at: Instant,
}

/// Memoizes the most recent discovery pass for a fixed interval, bounding the
/// load a burst of HTTP polls can put on the storage backend.
///
/// The lock is held across the expiry check, the refresh and the publish, so
/// concurrent callers inside one expiry window trigger at most one pass and
/// never observe a half-updated entry. Entries are replaced, never mutated.
pub struct BackupCache {
    ttl: Duration,
    entry: Mutex<Option<CacheEntry>>,
}

impl BackupCache {
    pub fn new(ttl: Duration) -> Self {
        BackupCache {
            ttl,
            entry: Mutex::new(None),
        }
    }

    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Arc<Vec<BackupStatus>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Vec<BackupStatus>>,
    {
        let mut entry = self.entry.lock().await;

        if let Some(cached) = entry.as_ref() {
            if cached.expires_at > Instant::now() {
                return cached.backups.clone();
            }
        }

        let backups = Arc::new(refresh().await);
        // expiry counts from refresh completion, not from when it started
        *entry = Some(CacheEntry {
            backups: backups.clone(),
            expires_at: Instant::now() + self.ttl,
        });

        backups
    }
}
