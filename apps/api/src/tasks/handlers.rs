use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::task::TaskView;
use crate::state::AppState;
use crate::tasks::repo::{self, parse_due_date, NewTask};

#[derive(Debug, Deserialize)]
pub struct TaskCreate {
    pub title: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`; anything else is silently dropped.
    pub due_date: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: String,
    pub application_id: Option<Uuid>,
    #[serde(default)]
    pub is_completed: bool,
}

fn default_priority() -> String {
    "Medium".to_string()
}

#[derive(Debug, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub is_completed: Option<bool>,
}

/// GET /tasks/upcoming
pub async fn handle_upcoming_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskView>>, AppError> {
    let rows = repo::upcoming_tasks(&state.db, &state.identity).await?;
    Ok(Json(rows.into_iter().map(TaskView::from).collect()))
}

/// POST /tasks
pub async fn handle_create_task(
    State(state): State<AppState>,
    Json(req): Json<TaskCreate>,
) -> Result<(StatusCode, Json<TaskView>), AppError> {
    let due_date = req.due_date.as_deref().and_then(parse_due_date);
    let row = repo::create_task(
        &state.db,
        &state.identity,
        NewTask {
            title: &req.title,
            description: req.description.as_deref(),
            due_date,
            priority: &req.priority,
            application_id: req.application_id,
            is_completed: req.is_completed,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(TaskView::from(row))))
}

/// PUT /tasks/:id
pub async fn handle_update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TaskUpdate>,
) -> Result<Json<Value>, AppError> {
    // Reparse with silent skip: a malformed due date leaves the stored one.
    let due_date = req.due_date.as_deref().and_then(parse_due_date);
    let found = repo::update_task(
        &state.db,
        &state.identity,
        id,
        req.title.as_deref(),
        req.description.as_deref(),
        due_date,
        req.priority.as_deref(),
        req.is_completed,
    )
    .await?;
    if !found {
        return Err(AppError::NotFound("Task not found".to_string()));
    }
    Ok(Json(json!({ "message": "Task updated", "id": id })))
}

/// DELETE /tasks/:id
pub async fn handle_delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !repo::delete_task(&state.db, &state.identity, id).await? {
        return Err(AppError::NotFound("Task not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_priority_and_completion() {
        let req: TaskCreate = serde_json::from_str(r#"{"title": "Send follow-up"}"#).unwrap();
        assert_eq!(req.priority, "Medium");
        assert!(!req.is_completed);
        assert!(req.due_date.is_none());
    }

    #[test]
    fn invalid_due_date_survives_deserialization() {
        // The bad string reaches the handler, which then drops it silently.
        let req: TaskCreate =
            serde_json::from_str(r#"{"title": "Prep", "due_date": "2024-13-40"}"#).unwrap();
        assert_eq!(req.due_date.as_deref(), Some("2024-13-40"));
        assert!(req.due_date.as_deref().and_then(parse_due_date).is_none());
    }
}
