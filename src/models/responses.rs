//! Response DTOs
//!
//! Every JSON body leaves the server in one of two envelopes:
//! `{ "success": true, "data": ... }` or `{ "success": false, "message": ... }`.

use serde::Serialize;

use crate::cache::CacheStats;

/// Success envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Success envelope with an item count, used for listings.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn ok(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Error envelope for all error conditions.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// Internal error detail, development mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Response body for `GET /api/health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            success: true,
            message: "Server is running".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Hit/miss counters of the response cache tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponseTierStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

impl ResponseTierStats {
    pub fn new(hits: u64, misses: u64) -> Self {
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };
        Self {
            hits,
            misses,
            hit_rate,
        }
    }
}

/// Cache statistics for the admin endpoint. The top-level counters are the
/// service layer's; `response_cache` covers whole-response lookups.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub keys: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    pub response_cache: ResponseTierStats,
}

impl StatsResponse {
    pub fn new(store: CacheStats, response_cache: ResponseTierStats) -> Self {
        Self {
            hit_rate: store.hit_rate(),
            hits: store.hits,
            misses: store.misses,
            expired: store.expired,
            keys: store.keys,
            response_cache,
        }
    }
}

/// Result of a cache flush.
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    pub flushed: usize,
}
