//! Cache Store Module
//!
//! Key/value store of JSON payloads with per-entry TTL. Expired entries are
//! dropped lazily on read and in bulk by the background sweep.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};

// == Cache Store ==
/// In-memory cache storage with TTL support.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Default TTL in seconds for entries without explicit TTL
    default_ttl: u64,
    /// Time source for expiry checks
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore reading the wall clock.
    ///
    /// # Arguments
    /// * `default_ttl` - Default TTL in seconds for entries without explicit TTL
    pub fn new(default_ttl: u64) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates a new CacheStore driven by the given clock.
    pub fn with_clock(default_ttl: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
            clock,
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Some(value)
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_expired(1);
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores a value, replacing any existing entry and resetting its TTL.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The payload to store
    /// * `ttl` - Optional TTL in seconds (uses default_ttl if None)
    pub fn set(&mut self, key: impl Into<String>, value: Value, ttl: Option<u64>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, self.clock.now_ms(), Some(ttl));
        self.entries.insert(key.into(), entry);
    }

    /// Stores a value that never expires. Only `delete` or `flush` remove it.
    pub fn set_persistent(&mut self, key: impl Into<String>, value: Value) {
        let entry = CacheEntry::new(value, self.clock.now_ms(), None);
        self.entries.insert(key.into(), entry);
    }

    // == Delete ==
    /// Removes an entry. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Flush ==
    /// Clears every entry, returning how many were dropped.
    pub fn flush(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Like `get`, but leaves statistics and expired entries alone.
    pub fn peek(&self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone())
    }

    /// Returns true if `key` holds a live entry. Does not touch statistics.
    pub fn contains(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Remaining lifetime of `key` in seconds, `None` if absent or persistent.
    pub fn ttl_remaining(&self, key: &str) -> Option<u64> {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .and_then(|entry| entry.ttl_remaining(now))
    }

    /// Returns the keys currently stored, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_keys(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));

        let removed = before - self.entries.len();
        self.stats.record_expired(removed);
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use serde_json::json;
    use std::time::Duration;

    fn store_with_clock() -> (CacheStore, ManualClock) {
        let clock = ManualClock::new(1_700_000_000_000);
        (CacheStore::with_clock(600, Arc::new(clock.clone())), clock)
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(600);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with_clock();

        store.set("popular:page=1", json!({"results": []}), None);

        assert_eq!(store.get("popular:page=1"), Some(json!({"results": []})));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent_is_absent() {
        let (mut store, _) = store_with_clock();
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let (mut store, clock) = store_with_clock();

        store.set("key", json!(1), Some(10));
        clock.advance(Duration::from_secs(8));
        store.set("key", json!(2), Some(10));
        clock.advance(Duration::from_secs(8));

        assert_eq!(store.get("key"), Some(json!(2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_default_ttl_applies() {
        let (mut store, clock) = store_with_clock();

        store.set("key", json!("v"), None);
        clock.advance(Duration::from_secs(600));
        assert!(store.get("key").is_some());

        clock.advance(Duration::from_secs(1));
        assert!(store.get("key").is_none());
    }

    #[test]
    fn test_store_ttl_expiration_removes_entry() {
        let (mut store, clock) = store_with_clock();

        store.set("key", json!("v"), Some(1));
        assert!(store.get("key").is_some());

        clock.advance(Duration::from_millis(1_001));

        assert!(store.get("key").is_none());
        assert!(store.is_empty(), "expired entry is dropped on read");
        assert_eq!(store.stats().expired, 1);
    }

    #[test]
    fn test_store_persistent_entry_never_expires() {
        let (mut store, clock) = store_with_clock();

        store.set_persistent("config:languages", json!(["en"]));
        clock.advance(Duration::from_secs(60 * 60 * 24 * 365));

        assert_eq!(store.get("config:languages"), Some(json!(["en"])));
        assert_eq!(store.cleanup_expired(), 0);
    }

    #[test]
    fn test_store_delete() {
        let (mut store, _) = store_with_clock();

        store.set("key1", json!("value1"), None);

        assert!(store.delete("key1"));
        assert!(!store.delete("key1"));
        assert!(store.get("key1").is_none());
    }

    #[test]
    fn test_store_flush() {
        let (mut store, _) = store_with_clock();

        store.set("a", json!(1), None);
        store.set("b", json!(2), None);

        assert_eq!(store.flush(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_stats() {
        let (mut store, _) = store_with_clock();

        store.set("key1", json!("value1"), None);
        store.get("key1"); // hit
        store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.keys, 1);
    }

    #[test]
    fn test_store_contains_does_not_count() {
        let (mut store, _) = store_with_clock();

        store.set("key", json!(true), None);
        assert!(store.contains("key"));
        assert!(!store.contains("other"));

        let stats = store.stats();
        assert_eq!(stats.hits + stats.misses, 0);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let (mut store, clock) = store_with_clock();

        store.set("short", json!(1), Some(1));
        store.set("long", json!(2), Some(10));

        clock.advance(Duration::from_secs(2));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.keys(), vec!["long".to_string()]);
    }

    #[test]
    fn test_store_ttl_remaining() {
        let (mut store, clock) = store_with_clock();

        store.set("key", json!(1), Some(30));
        clock.advance(Duration::from_secs(10));

        assert_eq!(store.ttl_remaining("key"), Some(20));
        assert_eq!(store.ttl_remaining("missing"), None);
    }

    #[test]
    fn test_store_peek_leaves_stats_and_expired_entries() {
        let (mut store, clock) = store_with_clock();
        store.set("key", json!(1), Some(5));

        assert_eq!(store.peek("key"), Some(json!(1)));
        clock.advance(Duration::from_secs(6));
        assert_eq!(store.peek("key"), None);

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(store.len(), 1);
    }
}
