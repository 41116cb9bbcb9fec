//! Error types for the API server
//!
//! Every failure a handler can produce, mapped to a status code and the
//! `{ success: false, message }` envelope.

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::tmdb::UpstreamError;

/// Message returned for any 500 regardless of its cause.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

// == App Error Enum ==
#[derive(Error, Debug)]
pub enum AppError {
    /// Metadata provider failure; status and message pass through
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Missing or malformed request parameter
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Missing, malformed or expired credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Valid credentials without the required role
    #[error("{0}")]
    Forbidden(String),

    #[error("Too many requests, please try again later.")]
    RateLimited { retry_after: Duration },

    /// Anything unexpected; the detail is logged, never sent by default
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Detail of a 500, attached to the response for the development-mode
/// `error_detail` middleware.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Upstream(e) => e.status_code(),
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match self {
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Unhandled error");
                let mut response =
                    (status, Json(ErrorResponse::new(INTERNAL_ERROR_MESSAGE))).into_response();
                response.extensions_mut().insert(InternalErrorDetail(detail));
                response
            }
            AppError::Upstream(e) => {
                tracing::warn!(status = status.as_u16(), error = %e, "Upstream error");
                (status, Json(ErrorResponse::new(e.client_message()))).into_response()
            }
            AppError::RateLimited { retry_after } => {
                let mut response = (status, Json(ErrorResponse::new(message))).into_response();
                // Round up so clients never retry early
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                response
            }
            _ => (status, Json(ErrorResponse::new(message))).into_response(),
        }
    }
}

// == Result Type Alias ==
pub type AppResult<T> = std::result::Result<T, AppError>;
