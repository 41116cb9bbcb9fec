//! Cache Entry Module
//!
//! A single cached JSON payload together with its expiry instant.

use serde_json::Value;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached payload
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped at `now_ms`.
    ///
    /// # Arguments
    /// * `value` - The payload to store
    /// * `now_ms` - Current time from the store's clock
    /// * `ttl_seconds` - Lifetime in seconds, `None` for an entry that never expires
    pub fn new(value: Value, now_ms: u64, ttl_seconds: Option<u64>) -> Self {
        let expires_at = ttl_seconds.map(|ttl| now_ms.saturating_add(ttl.saturating_mul(1000)));

        Self {
            value,
            created_at: now_ms,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry stays readable up to and including its expiry instant and is
    /// expired strictly after it.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms > expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in seconds, or None if no expiration is set.
    ///
    /// Returns `Some(0)` once the entry has expired.
    pub fn ttl_remaining(&self, now_ms: u64) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(now_ms) / 1000)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new(json!({"page": 1}), 1_000, None);

        assert_eq!(entry.value, json!({"page": 1}));
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired(u64::MAX));
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new(json!("value"), 1_000, Some(60));

        assert_eq!(entry.created_at, 1_000);
        assert_eq!(entry.expires_at, Some(61_000));
        assert!(!entry.is_expired(1_000));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new(json!("value"), 0, Some(10));

        // Readable at the exact expiry instant, gone one millisecond later
        assert!(!entry.is_expired(10_000));
        assert!(entry.is_expired(10_001));
    }

    #[test]
    fn test_ttl_remaining_seconds() {
        let entry = CacheEntry::new(json!("value"), 0, Some(10));

        assert_eq!(entry.ttl_remaining(0), Some(10));
        assert_eq!(entry.ttl_remaining(4_500), Some(5));
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = CacheEntry::new(json!("value"), 0, Some(1));

        assert_eq!(entry.ttl_remaining(5_000), Some(0));
    }

    #[test]
    fn test_ttl_remaining_no_expiration() {
        let entry = CacheEntry::new(json!("value"), 0, None);

        assert!(entry.ttl_remaining(0).is_none());
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new(json!("value"), 1, Some(u64::MAX));

        assert_eq!(entry.expires_at, Some(u64::MAX));
    }
}
