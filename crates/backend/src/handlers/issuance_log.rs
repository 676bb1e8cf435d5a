use axum::extract::State;
use axum::Json;
use contracts::domain::redemption::IssuanceRecord;

use crate::shared::state::AppState;

/// GET /api/issuance-log
pub async fn list_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<IssuanceRecord>>, axum::http::StatusCode> {
    match state.log.read_all().await {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            tracing::error!("failed to read issuance log: {e}");
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
