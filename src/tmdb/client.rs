//! TMDB v3 HTTP client
//!
//! Injects the API key into every call, bounds each attempt with a timeout
//! and retries transient failures a bounded number of times with
//! exponential backoff. The last error is always surfaced.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client as HttpClient};
use serde_json::Value;

use super::{DiscoverFilters, MovieProvider, UpstreamError, UpstreamResult, DETAIL_APPEND};

const USER_AGENT: &str = "MovieHub/1.0";

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    /// Extra attempts after the first one, transient failures only
    pub max_retries: u32,
    pub retry_base_delay: Duration,
    /// Outbound proxy for every upstream call
    pub proxy: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(200),
            proxy: None,
        }
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> UpstreamResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers);

        // Proxy environment variables are resolved by the config layer
        builder = match config.proxy.as_deref() {
            Some(proxy_url) => builder.proxy(reqwest::Proxy::all(proxy_url)?),
            None => builder.no_proxy(),
        };

        Ok(Self {
            http_client: builder.build()?,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
        })
    }

    /// GETs `path` with `params`, retrying transient failures.
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> UpstreamResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt: u32 = 0;

        loop {
            match self.send_once(&url, params).await {
                Ok(body) => {
                    tracing::debug!(path = %path, attempt = attempt + 1, "Upstream call succeeded");
                    return Ok(body);
                }
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = self.retry_base_delay * 2u32.saturating_pow(attempt);
                    attempt += 1;
                    tracing::warn!(
                        path = %path,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient upstream failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(path = %path, attempts = attempt + 1, error = %e, "Upstream call failed");
                    return Err(e);
                }
            }
        }
    }

    async fn send_once(&self, url: &str, params: &[(&str, String)]) -> UpstreamResult<Value> {
        let response = self
            .http_client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message: status_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("Upstream error").to_string()),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Pulls TMDB's `status_message` out of an error body.
fn status_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("status_message")?
        .as_str()
        .map(str::to_string)
}

fn page_param(page: u32) -> [(&'static str, String); 1] {
    [("page", page.to_string())]
}

#[async_trait]
impl MovieProvider for TmdbClient {
    async fn trending(&self, page: u32) -> UpstreamResult<Value> {
        self.get_json("/trending/movie/week", &page_param(page)).await
    }

    async fn popular(&self, page: u32) -> UpstreamResult<Value> {
        self.get_json("/movie/popular", &page_param(page)).await
    }

    async fn top_rated(&self, page: u32) -> UpstreamResult<Value> {
        self.get_json("/movie/top_rated", &page_param(page)).await
    }

    async fn upcoming(&self, page: u32) -> UpstreamResult<Value> {
        self.get_json("/movie/upcoming", &page_param(page)).await
    }

    async fn movie_detail(&self, id: u64) -> UpstreamResult<Value> {
        self.get_json(
            &format!("/movie/{}", id),
            &[("append_to_response", DETAIL_APPEND.to_string())],
        )
        .await
    }

    async fn search(&self, query: &str, page: u32) -> UpstreamResult<Value> {
        self.get_json(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn discover(&self, filters: &DiscoverFilters, page: u32) -> UpstreamResult<Value> {
        let mut params: Vec<(&str, String)> =
            filters.pairs().map(|(k, v)| (k, v.to_string())).collect();
        params.push(("page", page.to_string()));
        self.get_json("/discover/movie", &params).await
    }

    async fn providers(&self, id: u64) -> UpstreamResult<Value> {
        self.get_json(&format!("/movie/{}/watch/providers", id), &[])
            .await
    }

    async fn genres(&self) -> UpstreamResult<Value> {
        self.get_json("/genre/movie/list", &[]).await
    }

    async fn languages(&self) -> UpstreamResult<Value> {
        self.get_json("/configuration/languages", &[]).await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
