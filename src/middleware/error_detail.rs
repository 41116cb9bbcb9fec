//! Development-mode error detail
//!
//! Rewrites 500 responses that carry an `InternalErrorDetail` so the body
//! includes a `detail` field. Only installed when `APP_ENV=development`.

use axum::{
    body::Body,
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::{InternalErrorDetail, INTERNAL_ERROR_MESSAGE};
use crate::models::ErrorResponse;

pub async fn error_detail(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let Some(InternalErrorDetail(detail)) = response.extensions().get::<InternalErrorDetail>().cloned()
    else {
        return response;
    };

    let body = ErrorResponse::new(INTERNAL_ERROR_MESSAGE).with_detail(detail);
    let Ok(bytes) = serde_json::to_vec(&body) else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}
