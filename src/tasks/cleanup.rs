//! Expiry sweep
//!
//! Background task that periodically drops expired cache entries and idle
//! rate limiter state.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;
use crate::middleware::ClientRateLimiter;

/// Runs one sweep, returning how many cache entries were removed.
///
/// The write lock is held for a single pass over the store.
pub async fn sweep(cache: &SharedCache, limiter: Option<&ClientRateLimiter>) -> usize {
    let removed = cache.write().await.cleanup_expired();

    if let Some(limiter) = limiter {
        limiter.shrink();
    }

    if removed > 0 {
        info!(removed, "Expiry sweep removed entries");
    } else {
        debug!("Expiry sweep found nothing to remove");
    }
    removed
}

/// Spawns the sweep loop. Abort the returned handle to stop it.
///
/// # Example
/// ```ignore
/// let handle = spawn_cleanup_task(cache.clone(), Some(limiter), Duration::from_secs(120));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task(
    cache: SharedCache,
    limiter: Option<Arc<ClientRateLimiter>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            "Starting expiry sweep task"
        );

        loop {
            tokio::time::sleep(interval).await;
            sweep(&cache, limiter.as_deref()).await;
        }
    })
}
