use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::applications::repo::{self, ApplicationPatch, NewApplication};
use crate::errors::AppError;
use crate::models::application::ApplicationView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplicationCreate {
    pub job_title: String,
    pub company: String,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub job_url: Option<String>,
    #[serde(default = "default_stage")]
    pub stage_id: i32,
    pub notes: Option<String>,
}

fn default_stage() -> i32 {
    2 // Applied
}

/// Partial update body. `location`, `job_url` and `notes` are accepted but
/// ignored (serde drops unknown keys); they are not persisted anywhere.
#[derive(Debug, Deserialize)]
pub struct ApplicationUpdate {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub salary_range: Option<String>,
    pub stage_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct MoveParams {
    pub app_id: Uuid,
    pub stage_id: i32,
}

/// GET /applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationView>>, AppError> {
    let rows = repo::list_flattened(&state.db, &state.identity).await?;
    Ok(Json(rows.into_iter().map(ApplicationView::from).collect()))
}

/// POST /applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(req): Json<ApplicationCreate>,
) -> Result<(StatusCode, Json<ApplicationView>), AppError> {
    let (id, date_applied) = repo::create_application(
        &state.db,
        &state.identity,
        NewApplication {
            job_title: &req.job_title,
            company: &req.company,
            salary_range: req.salary_range.as_deref(),
            stage_id: req.stage_id,
        },
    )
    .await?;

    // Echo the non-persisted optional fields back to the client.
    let view = ApplicationView {
        id,
        job_title: req.job_title,
        company: req.company,
        location: req.location,
        salary_range: req.salary_range,
        job_url: req.job_url,
        stage_id: req.stage_id,
        date_applied,
        notes: req.notes,
        resume_url: None,
    };
    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ApplicationUpdate>,
) -> Result<Json<Value>, AppError> {
    let patch = ApplicationPatch {
        stage_id: req.stage_id,
        job_title: req.job_title.as_deref(),
        company: req.company.as_deref(),
        salary_range: req.salary_range.as_deref(),
    };
    let found = repo::update_application(&state.db, &state.identity, id, patch).await?;
    if !found {
        return Err(AppError::NotFound("Application not found".to_string()));
    }
    Ok(Json(json!({ "message": "Updated successfully", "id": id })))
}

/// DELETE /applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !repo::delete_application(&state.db, &state.identity, id).await? {
        return Err(AppError::NotFound("Application not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /applications/move?app_id=&stage_id=
pub async fn handle_move_application(
    State(state): State<AppState>,
    Query(params): Query<MoveParams>,
) -> Result<Json<Value>, AppError> {
    if !repo::move_application(&state.db, &state.identity, params.app_id, params.stage_id).await? {
        return Err(AppError::NotFound("Application not found".to_string()));
    }
    Ok(Json(json!({ "message": "Moved successfully", "new_stage": params.stage_id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_stage_to_applied() {
        let req: ApplicationCreate =
            serde_json::from_str(r#"{"job_title": "Engineer", "company": "Acme"}"#).unwrap();
        assert_eq!(req.stage_id, 2);
        assert!(req.location.is_none());
    }

    #[test]
    fn create_keeps_explicit_stage() {
        let req: ApplicationCreate = serde_json::from_str(
            r#"{"job_title": "Engineer", "company": "Acme", "stage_id": 4}"#,
        )
        .unwrap();
        assert_eq!(req.stage_id, 4);
    }
}
