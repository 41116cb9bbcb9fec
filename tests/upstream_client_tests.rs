//! Integration Tests for the TMDB client
//!
//! Runs the client against a local fake of the upstream API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use moviehub::tmdb::{DiscoverFilters, MovieProvider, TmdbClient, TmdbConfig, UpstreamError};
use serde_json::json;

const API_KEY: &str = "test-key";

#[derive(Clone, Default)]
struct Fake {
    top_rated_calls: Arc<AtomicUsize>,
    detail_calls: Arc<AtomicUsize>,
}

type Params = Query<HashMap<String, String>>;

fn unauthorized(params: &HashMap<String, String>) -> Option<Response> {
    if params.get("api_key").map(String::as_str) == Some(API_KEY) {
        return None;
    }
    Some(
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "status_code": 7,
                "status_message": "Invalid API key: You must be granted a valid key."
            })),
        )
            .into_response(),
    )
}

async fn popular(Query(params): Params) -> Response {
    if let Some(denied) = unauthorized(&params) {
        return denied;
    }
    Json(json!({ "page": params.get("page"), "results": [] })).into_response()
}

/// Fails twice with 503 before answering.
async fn top_rated(State(fake): State<Fake>, Query(params): Params) -> Response {
    if let Some(denied) = unauthorized(&params) {
        return denied;
    }
    let call = fake.top_rated_calls.fetch_add(1, Ordering::SeqCst);
    if call < 2 {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status_message": "Service offline" })),
        )
            .into_response();
    }
    Json(json!({ "page": 1, "results": [{ "id": 278 }] })).into_response()
}

async fn movie_detail(
    State(fake): State<Fake>,
    Path(id): Path<u64>,
    Query(params): Params,
) -> Response {
    fake.detail_calls.fetch_add(1, Ordering::SeqCst);
    if id != 550 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "status_code": 34,
                "status_message": "The resource you requested could not be found."
            })),
        )
            .into_response();
    }
    Json(json!({ "id": id, "append": params.get("append_to_response") })).into_response()
}

async fn search(Query(params): Params) -> Response {
    Json(json!({ "query": params.get("query"), "page": params.get("page") })).into_response()
}

async fn discover(Query(params): Params) -> Response {
    Json(json!({ "params": params })).into_response()
}

async fn slow_genres() -> Response {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({ "genres": [] })).into_response()
}

async fn not_json() -> Response {
    (StatusCode::OK, "<html>maintenance</html>").into_response()
}

async fn spawn_fake() -> (SocketAddr, Fake) {
    let fake = Fake::default();
    let app = Router::new()
        .route("/3/movie/popular", get(popular))
        .route("/3/movie/top_rated", get(top_rated))
        .route("/3/movie/:id", get(movie_detail))
        .route("/3/search/movie", get(search))
        .route("/3/discover/movie", get(discover))
        .route("/3/genre/movie/list", get(slow_genres))
        .route("/3/configuration/languages", get(not_json))
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, fake)
}

fn client(addr: SocketAddr, api_key: &str) -> TmdbClient {
    TmdbClient::new(TmdbConfig {
        api_key: api_key.to_string(),
        base_url: format!("http://{}/3/", addr),
        timeout: Duration::from_millis(500),
        max_retries: 2,
        retry_base_delay: Duration::from_millis(10),
        proxy: None,
    })
    .unwrap()
}

#[tokio::test]
async fn test_api_key_is_injected() {
    let (addr, _) = spawn_fake().await;

    let body = client(addr, API_KEY).popular(3).await.unwrap();
    assert_eq!(body["page"], "3");
}

#[tokio::test]
async fn test_invalid_key_passes_status_through() {
    let (addr, _) = spawn_fake().await;

    let err = client(addr, "wrong").popular(1).await.unwrap_err();
    match &err {
        UpstreamError::Status { status, message } => {
            assert_eq!(*status, 401);
            assert!(message.starts_with("Invalid API key"));
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let (addr, fake) = spawn_fake().await;

    let body = client(addr, API_KEY).top_rated(1).await.unwrap();

    assert_eq!(body["results"][0]["id"], 278);
    assert_eq!(fake.top_rated_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let (addr, fake) = spawn_fake().await;
    let client = TmdbClient::new(TmdbConfig {
        api_key: API_KEY.to_string(),
        base_url: format!("http://{}/3", addr),
        max_retries: 1,
        retry_base_delay: Duration::from_millis(10),
        ..TmdbConfig::default()
    })
    .unwrap();

    let err = client.top_rated(1).await.unwrap_err();

    assert_eq!(
        err,
        UpstreamError::Status {
            status: 503,
            message: "Service offline".to_string()
        }
    );
    assert_eq!(fake.top_rated_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let (addr, fake) = spawn_fake().await;
    let client = client(addr, API_KEY);

    let err = client.movie_detail(1).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        err.client_message(),
        "The resource you requested could not be found."
    );
    assert_eq!(fake.detail_calls.load(Ordering::SeqCst), 1);

    let body = client.movie_detail(550).await.unwrap();
    assert_eq!(body["append"], "credits,videos,similar,recommendations");
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let (addr, _) = spawn_fake().await;
    let client = TmdbClient::new(TmdbConfig {
        api_key: API_KEY.to_string(),
        base_url: format!("http://{}/3", addr),
        timeout: Duration::from_millis(100),
        max_retries: 0,
        ..TmdbConfig::default()
    })
    .unwrap();

    let err = client.genres().await.unwrap_err();

    assert_eq!(err, UpstreamError::Timeout);
    assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn test_non_json_body_is_a_decode_error() {
    let (addr, _) = spawn_fake().await;

    let err = client(addr, API_KEY).languages().await.unwrap_err();

    assert!(matches!(err, UpstreamError::Decode(_)));
    assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_query_parameters_are_forwarded() {
    let (addr, _) = spawn_fake().await;
    let client = client(addr, API_KEY);

    let body = client.search("the matrix", 2).await.unwrap();
    assert_eq!(body["query"], "the matrix");
    assert_eq!(body["page"], "2");

    let filters = DiscoverFilters::new()
        .language("te")
        .sort_by("vote_count.desc");
    let body = client.discover(&filters, 4).await.unwrap();
    assert_eq!(body["params"]["with_original_language"], "te");
    assert_eq!(body["params"]["sort_by"], "vote_count.desc");
    assert_eq!(body["params"]["page"], "4");
    assert_eq!(body["params"]["api_key"], API_KEY);
}

#[tokio::test]
async fn test_unreachable_upstream_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = TmdbClient::new(TmdbConfig {
        api_key: API_KEY.to_string(),
        base_url: format!("http://{}/3", addr),
        max_retries: 0,
        ..TmdbConfig::default()
    })
    .unwrap();

    let err = client.popular(1).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Transport(_)));
}
