//! Configuration Module
//!
//! Loads server configuration from environment variables. A `.env` file, if
//! present, is read by `main` before this runs.

use std::env;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::tmdb::TmdbConfig;

const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub port: u16,
    /// `development` exposes internal error detail
    pub app_env: String,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    /// Per-attempt upstream timeout in seconds
    pub upstream_timeout: u64,
    pub upstream_max_retries: u32,
    pub upstream_proxy: Option<String>,
    /// TTL in seconds for store entries without an explicit lifetime
    pub default_ttl: u64,
    /// TTL in seconds of whole cached responses
    pub response_cache_ttl: u64,
    /// Expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window: u64,
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Creates a new Config from environment variables.
    ///
    /// # Environment Variables
    /// - `TMDB_API_KEY` - required
    /// - `PORT` - HTTP server port (default: 5000)
    /// - `APP_ENV` - `development` or `production` (default: development)
    /// - `TMDB_BASE_URL` - upstream base URL
    /// - `UPSTREAM_TIMEOUT_SECS` (default: 30), `UPSTREAM_MAX_RETRIES` (default: 2)
    /// - `UPSTREAM_PROXY` - outbound proxy, falls back to `HTTPS_PROXY` / `HTTP_PROXY`
    /// - `DEFAULT_TTL` (default: 600), `RESPONSE_CACHE_TTL` (default: 600)
    /// - `CLEANUP_INTERVAL` - sweep frequency in seconds (default: 120)
    /// - `CORS_ORIGIN` - comma separated (default: http://localhost:3000)
    /// - `JWT_SECRET`, `JWT_ISSUER`
    /// - `RATE_LIMIT_MAX_REQUESTS` (default: 300), `RATE_LIMIT_WINDOW_SECS` (default: 900)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let tmdb_api_key = non_empty("TMDB_API_KEY").context("TMDB_API_KEY must be set")?;

        let upstream_proxy = non_empty("UPSTREAM_PROXY")
            .or_else(|| non_empty("HTTPS_PROXY"))
            .or_else(|| non_empty("HTTP_PROXY"));

        let cors_origins = non_empty("CORS_ORIGIN")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        let config = Self {
            port: parsed("PORT", defaults.port),
            app_env: non_empty("APP_ENV").unwrap_or(defaults.app_env),
            tmdb_api_key,
            tmdb_base_url: non_empty("TMDB_BASE_URL").unwrap_or(defaults.tmdb_base_url),
            upstream_timeout: parsed("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout),
            upstream_max_retries: parsed("UPSTREAM_MAX_RETRIES", defaults.upstream_max_retries),
            upstream_proxy,
            default_ttl: parsed("DEFAULT_TTL", defaults.default_ttl),
            response_cache_ttl: parsed("RESPONSE_CACHE_TTL", defaults.response_cache_ttl),
            cleanup_interval: parsed("CLEANUP_INTERVAL", defaults.cleanup_interval),
            cors_origins,
            jwt_secret: non_empty("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            jwt_issuer: non_empty("JWT_ISSUER").unwrap_or(defaults.jwt_issuer),
            rate_limit_max_requests: parsed(
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            ),
            rate_limit_window: parsed("RATE_LIMIT_WINDOW_SECS", defaults.rate_limit_window),
        };

        config.validate()?;

        if config.jwt_secret == DEFAULT_JWT_SECRET {
            if config.is_development() {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            } else {
                tracing::error!("SECURITY: default JWT secret outside development");
            }
        }

        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.cleanup_interval == 0 {
            bail!("CLEANUP_INTERVAL must be greater than zero");
        }
        if self.upstream_timeout == 0 {
            bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
        }
        if self.rate_limit_max_requests == 0 || self.rate_limit_window == 0 {
            bail!("RATE_LIMIT_MAX_REQUESTS and RATE_LIMIT_WINDOW_SECS must be greater than zero");
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }

    pub fn tmdb_config(&self) -> TmdbConfig {
        TmdbConfig {
            api_key: self.tmdb_api_key.clone(),
            base_url: self.tmdb_base_url.clone(),
            timeout: Duration::from_secs(self.upstream_timeout),
            max_retries: self.upstream_max_retries,
            proxy: self.upstream_proxy.clone(),
            ..TmdbConfig::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            app_env: "development".to_string(),
            tmdb_api_key: String::new(),
            tmdb_base_url: TmdbConfig::default().base_url,
            upstream_timeout: 30,
            upstream_max_retries: 2,
            upstream_proxy: None,
            default_ttl: 600,
            response_cache_ttl: 600,
            cleanup_interval: 120,
            cors_origins: vec!["http://localhost:3000".to_string()],
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_issuer: "moviehub".to_string(),
            rate_limit_max_requests: 300,
            rate_limit_window: 900,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.default_ttl, 600);
        assert_eq!(config.cleanup_interval, 120);
        assert_eq!(config.rate_limit_max_requests, 300);
        assert_eq!(config.rate_limit_window, 900);
        assert!(config.is_development());
    }

    #[test]
    fn test_tmdb_config_carries_upstream_settings() {
        let config = Config {
            tmdb_api_key: "key".to_string(),
            upstream_timeout: 5,
            upstream_max_retries: 0,
            upstream_proxy: Some("http://proxy:8080".to_string()),
            ..Config::default()
        };

        let tmdb = config.tmdb_config();
        assert_eq!(tmdb.api_key, "key");
        assert_eq!(tmdb.timeout, Duration::from_secs(5));
        assert_eq!(tmdb.max_retries, 0);
        assert_eq!(tmdb.proxy.as_deref(), Some("http://proxy:8080"));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = Config {
            cleanup_interval: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_production_hides_detail() {
        let config = Config {
            app_env: "production".to_string(),
            ..Config::default()
        };
        assert!(!config.is_development());
    }
}
