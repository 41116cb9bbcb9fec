//! DMCA endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::AdminClaims;
use crate::models::{ApiResponse, DmcaComplaint, DmcaReceipt, DmcaSubmission, ListResponse};

const SUBMITTED_MESSAGE: &str =
    "DMCA complaint submitted successfully. We will review it within 24-48 hours.";

/// POST /api/dmca/submit
pub async fn submit_handler(
    State(state): State<AppState>,
    body: Result<Json<DmcaSubmission>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<DmcaReceipt>>)> {
    let Json(submission) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let complaint = state.dmca.submit(&submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(DmcaReceipt::from(&complaint)).with_message(SUBMITTED_MESSAGE)),
    ))
}

/// GET /api/dmca/complaints (admin)
pub async fn complaints_handler(
    AdminClaims(claims): AdminClaims,
    State(state): State<AppState>,
) -> Json<ListResponse<DmcaComplaint>> {
    tracing::info!(admin = %claims.sub, "Listing DMCA complaints");
    Json(ListResponse::ok(state.dmca.list().await))
}
