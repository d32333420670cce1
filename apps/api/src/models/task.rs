use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    pub application_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub is_completed: bool,
    pub priority: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub id: Uuid,
    pub application_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub is_completed: bool,
    pub priority: String,
}

impl From<TaskRow> for TaskView {
    fn from(row: TaskRow) -> Self {
        TaskView {
            id: row.id,
            application_id: row.application_id,
            title: row.title,
            description: row.description,
            due_date: row.due_date.map(|d| d.to_string()),
            is_completed: row.is_completed,
            priority: row.priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn due_date_renders_as_plain_timestamp() {
        let row = TaskRow {
            id: Uuid::new_v4(),
            application_id: None,
            title: "Follow up".to_string(),
            description: None,
            due_date: NaiveDate::from_ymd_opt(2024, 5, 1).map(|d| d.and_hms_opt(0, 0, 0).unwrap()),
            is_completed: false,
            priority: "Medium".to_string(),
        };
        let view = TaskView::from(row);
        assert_eq!(view.due_date.as_deref(), Some("2024-05-01 00:00:00"));
    }
}
