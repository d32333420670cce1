use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::analytics::summary::{compute_summary, StageSample, Summary};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    /// RFC 3339 instant the trailing windows are computed against. Defaults
    /// to now; fix it to make the weekly trend reproducible.
    pub as_of: Option<String>,
}

/// GET /analytics/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<Summary>, AppError> {
    let as_of: DateTime<Utc> = match params.as_of.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| AppError::Validation(format!("as_of must be RFC 3339: {e}")))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let samples: Vec<StageSample> =
        sqlx::query_as("SELECT stage_id, date_applied FROM applications WHERE user_id = $1")
            .bind(state.identity.user_id())
            .fetch_all(&state.db)
            .await?;

    Ok(Json(compute_summary(&samples, as_of)))
}
