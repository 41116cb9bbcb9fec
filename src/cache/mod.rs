//! Cache Module
//!
//! In-memory TTL cache shielding the upstream API, plus the key and TTL
//! policy for every logical query.

mod clock;
mod entry;
mod keys;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use keys::{normalize_query, CacheKey};
pub use stats::CacheStats;
pub use store::CacheStore;

/// TTL in seconds for entries stored without an explicit lifetime.
pub const DEFAULT_TTL: u64 = 600;

/// Cache store shared between the service layer, the response cache
/// middleware and the expiry sweep.
pub type SharedCache = Arc<RwLock<CacheStore>>;

/// Wraps a store for sharing.
pub fn shared(store: CacheStore) -> SharedCache {
    Arc::new(RwLock::new(store))
}
