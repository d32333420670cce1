//! Data access for tasks. Tasks may optionally reference an application; the
//! reference is not validated and survives application deletion.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::identity::Identity;
use crate::models::task::TaskRow;

pub struct NewTask<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub due_date: Option<NaiveDateTime>,
    pub priority: &'a str,
    pub application_id: Option<Uuid>,
    pub is_completed: bool,
}

/// Parses a `YYYY-MM-DD` due date at midnight. Malformed input yields None —
/// callers drop the field silently rather than rejecting the request,
/// matching the tracker's long-standing behavior.
pub fn parse_due_date(raw: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

const TASK_COLUMNS: &str =
    "id, application_id, title, description, due_date, is_completed, priority";

/// Incomplete tasks for the identity, soonest due date first. Postgres sorts
/// NULL due dates last for ascending order.
pub async fn upcoming_tasks(pool: &PgPool, identity: &Identity) -> sqlx::Result<Vec<TaskRow>> {
    sqlx::query_as::<_, TaskRow>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks \
         WHERE user_id = $1 AND is_completed = FALSE \
         ORDER BY due_date ASC",
    ))
    .bind(identity.user_id())
    .fetch_all(pool)
    .await
}

pub async fn create_task(
    pool: &PgPool,
    identity: &Identity,
    new: NewTask<'_>,
) -> sqlx::Result<TaskRow> {
    sqlx::query_as::<_, TaskRow>(&format!(
        "INSERT INTO tasks (id, user_id, application_id, title, description, due_date, \
         is_completed, priority) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {TASK_COLUMNS}",
    ))
    .bind(Uuid::new_v4())
    .bind(identity.user_id())
    .bind(new.application_id)
    .bind(new.title)
    .bind(new.description)
    .bind(new.due_date)
    .bind(new.is_completed)
    .bind(new.priority)
    .fetch_one(pool)
    .await
}

/// Per-field conditional update. Returns false when the task is missing.
pub async fn update_task(
    pool: &PgPool,
    identity: &Identity,
    task_id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    due_date: Option<NaiveDateTime>,
    priority: Option<&str>,
    is_completed: Option<bool>,
) -> sqlx::Result<bool> {
    let existing: Option<TaskRow> = sqlx::query_as(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2",
    ))
    .bind(task_id)
    .bind(identity.user_id())
    .fetch_optional(pool)
    .await?;
    let Some(task) = existing else {
        return Ok(false);
    };

    sqlx::query(
        "UPDATE tasks SET title = $1, description = $2, due_date = $3, priority = $4, \
         is_completed = $5 WHERE id = $6",
    )
    .bind(title.map(String::from).unwrap_or(task.title))
    .bind(description.map(String::from).or(task.description))
    .bind(due_date.or(task.due_date))
    .bind(priority.map(String::from).unwrap_or(task.priority))
    .bind(is_completed.unwrap_or(task.is_completed))
    .bind(task_id)
    .execute(pool)
    .await?;
    Ok(true)
}

/// Hard delete. Returns false when no row matched.
pub async fn delete_task(pool: &PgPool, identity: &Identity, task_id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(identity.user_id())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
