//! MovieHub - a caching backend for movie discovery
//!
//! Proxies the TMDB API behind an in-memory TTL cache, serves
//! recommendation heuristics on top of the cached lists and takes DMCA
//! complaints.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod tasks;
pub mod tmdb;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
