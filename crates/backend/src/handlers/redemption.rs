use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::domain::redemption::RedemptionRequest;
use serde_json::json;

use crate::domain::redemption::service;
use crate::shared::state::AppState;

/// POST /api/redemption
///
/// Success returns the certificate as a PDF download; a rejected
/// submission returns 422 with the reason for the form to show.
pub async fn redeem(State(state): State<AppState>, Json(request): Json<RedemptionRequest>) -> Response {
    match service::redeem(
        state.codes.as_ref(),
        state.log.as_ref(),
        state.renderer.as_ref(),
        &request,
    )
    .await
    {
        Ok(pdf) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"certificate.pdf\"",
                ),
            ],
            pdf,
        )
            .into_response(),
        Err(e) if e.is_user_error() => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("redemption failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response()
        }
    }
}
