//! HTTP middleware

pub mod auth;
pub mod error_detail;
pub mod rate_limit;
pub mod request_id;
pub mod response_cache;

pub use auth::{AdminClaims, JwtAuth};
pub use rate_limit::ClientRateLimiter;
pub use response_cache::ResponseCache;
