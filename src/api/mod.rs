//! API Module
//!
//! HTTP handlers and routing for the MovieHub REST API.
//!
//! # Endpoints
//! - `GET /api/health`
//! - `GET /api/movies/{trending,popular,top-rated,upcoming,search,browse,:id}`
//! - `GET /api/providers/:id`, `GET /api/genres`, `GET /api/config/languages`
//! - `GET /api/recommendations/{shuffle,mood}`
//! - `POST /api/dmca/submit`, `GET /api/dmca/complaints` (admin)
//! - `GET /api/admin/cache/stats`, `DELETE /api/admin/cache` (admin)

pub mod admin;
pub mod dmca;
pub mod handlers;
pub mod recommendations;
pub mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
