//! Cache-aside movie service
//!
//! Every read computes its `CacheKey`, serves a live cached payload when
//! there is one and otherwise asks the provider, storing a successful body
//! under the key's TTL. Failures are returned untouched and never stored.
//!
//! A miss is filled by its own task: concurrent misses on one key queue
//! behind a per-key lock and re-check the cache once they hold it, so a
//! burst of identical requests costs a single upstream call. A caller that
//! goes away does not abandon the upstream call or the cache write.

use std::collections::HashMap;
use std::future::Future;
use std::panic;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::{normalize_query, CacheKey, SharedCache};
use crate::tmdb::{DiscoverFilters, MovieProvider, UpstreamError, UpstreamResult};

/// Discover ordering used for the "top reviewed" list.
pub const TOP_REVIEWED_ORDER: &str = "vote_count.desc";

type Slot = Arc<Mutex<()>>;
type InFlight = Arc<StdMutex<HashMap<String, Slot>>>;

pub struct MovieService {
    provider: Arc<dyn MovieProvider>,
    cache: SharedCache,
    in_flight: InFlight,
}

/// A key's fill slot. Handed back to the map on drop, unwinding included.
struct SlotLease {
    in_flight: InFlight,
    key: String,
    slot: Slot,
}

impl SlotLease {
    fn acquire(in_flight: &InFlight, key: &str) -> Self {
        let slot = in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        Self {
            in_flight: in_flight.clone(),
            key: key.to_string(),
            slot,
        }
    }
}

impl Drop for SlotLease {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        // Map plus ours: nobody else is queued on this key.
        if Arc::strong_count(&self.slot) <= 2 {
            in_flight.remove(&self.key);
        }
    }
}

impl MovieService {
    pub fn new(provider: Arc<dyn MovieProvider>, cache: SharedCache) -> Self {
        Self {
            provider,
            cache,
            in_flight: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    // == Cache-aside core ==
    async fn cached<F, Fut>(&self, key: CacheKey, fetch: F) -> UpstreamResult<Value>
    where
        F: FnOnce(Arc<dyn MovieProvider>) -> Fut + Send + 'static,
        Fut: Future<Output = UpstreamResult<Value>> + Send + 'static,
    {
        let key_str = key.to_string();

        let hit = self.cache.write().await.get(&key_str);
        if let Some(value) = hit {
            debug!(key = %key_str, "Cache hit");
            return Ok(value);
        }

        let lease = SlotLease::acquire(&self.in_flight, &key_str);
        let fill = tokio::spawn(fill(
            self.provider.clone(),
            self.cache.clone(),
            lease,
            key,
            fetch,
        ));

        match fill.await {
            Ok(result) => result,
            // Surface provider panics in the caller's task
            Err(e) if e.is_panic() => panic::resume_unwind(e.into_panic()),
            // Only happens while the runtime shuts down
            Err(e) => Err(UpstreamError::Transport(format!("cache fill aborted: {}", e))),
        }
    }

    // == Operations ==
    pub async fn trending(&self, page: u32) -> UpstreamResult<Value> {
        self.cached(CacheKey::Trending { page }, move |p| async move {
            p.trending(page).await
        })
        .await
    }

    pub async fn popular(&self, page: u32) -> UpstreamResult<Value> {
        self.cached(CacheKey::Popular { page }, move |p| async move {
            p.popular(page).await
        })
        .await
    }

    pub async fn top_rated(&self, page: u32) -> UpstreamResult<Value> {
        self.cached(CacheKey::TopRated { page }, move |p| async move {
            p.top_rated(page).await
        })
        .await
    }

    pub async fn upcoming(&self, page: u32) -> UpstreamResult<Value> {
        self.cached(CacheKey::Upcoming { page }, move |p| async move {
            p.upcoming(page).await
        })
        .await
    }

    pub async fn movie_detail(&self, id: u64) -> UpstreamResult<Value> {
        self.cached(CacheKey::MovieDetail(id), move |p| async move {
            p.movie_detail(id).await
        })
        .await
    }

    /// Searches by title. The normalized query is both the key and what the
    /// provider receives.
    pub async fn search(&self, query: &str, page: u32) -> UpstreamResult<Value> {
        let query = normalize_query(query);
        let key = CacheKey::Search {
            query: query.clone(),
            page,
        };
        self.cached(key, move |p| async move { p.search(&query, page).await })
            .await
    }

    pub async fn discover(&self, filters: &DiscoverFilters, page: u32) -> UpstreamResult<Value> {
        let key = CacheKey::Discover {
            filters: filters.clone(),
            page,
        };
        let filters = filters.clone();
        self.cached(key, move |p| async move { p.discover(&filters, page).await })
            .await
    }

    /// Filtered browsing; without any filter this is the popular list.
    pub async fn browse(&self, filters: &DiscoverFilters, page: u32) -> UpstreamResult<Value> {
        if filters.is_empty() {
            self.popular(page).await
        } else {
            self.discover(filters, page).await
        }
    }

    /// Movies with the most votes.
    pub async fn top_reviewed(&self, page: u32) -> UpstreamResult<Value> {
        let filters = DiscoverFilters::new().sort_by(TOP_REVIEWED_ORDER);
        self.discover(&filters, page).await
    }

    pub async fn providers(&self, id: u64) -> UpstreamResult<Value> {
        self.cached(CacheKey::Providers(id), move |p| async move {
            p.providers(id).await
        })
        .await
    }

    pub async fn genres(&self) -> UpstreamResult<Value> {
        self.cached(CacheKey::Genres, |p| async move { p.genres().await })
            .await
    }

    /// Language list; cached without expiry once fetched.
    pub async fn languages(&self) -> UpstreamResult<Value> {
        self.cached(CacheKey::Languages, |p| async move { p.languages().await })
            .await
    }
}

/// Fills one key: waits for the key's slot, re-checks the cache, then asks
/// the provider and stores a successful body.
async fn fill<F, Fut>(
    provider: Arc<dyn MovieProvider>,
    cache: SharedCache,
    lease: SlotLease,
    key: CacheKey,
    fetch: F,
) -> UpstreamResult<Value>
where
    F: FnOnce(Arc<dyn MovieProvider>) -> Fut,
    Fut: Future<Output = UpstreamResult<Value>>,
{
    let _guard = lease.slot.lock().await;

    // Another fill may have stored the key while we waited.
    let filled = cache.read().await.peek(&lease.key);
    if let Some(value) = filled {
        debug!(key = %lease.key, "Cache filled while waiting");
        return Ok(value);
    }

    info!(
        key = %lease.key,
        operation = key.operation(),
        provider = provider.name(),
        "Cache miss, fetching from upstream"
    );
    let fetched = fetch(provider).await;

    if let Ok(value) = &fetched {
        let mut cache = cache.write().await;
        match key.ttl() {
            Some(ttl) => cache.set(lease.key.clone(), value.clone(), Some(ttl)),
            None => cache.set_persistent(lease.key.clone(), value.clone()),
        }
    }
    fetched
}
