use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One application row with its job and company links already resolved
/// (LEFT JOIN, so both sides may be absent).
#[derive(Debug, Clone, FromRow)]
pub struct FlatApplicationRow {
    pub id: Uuid,
    pub stage_id: i32,
    pub date_applied: NaiveDate,
    pub resume_url: Option<String>,
    pub job_title: Option<String>,
    pub salary_range: Option<String>,
    pub company: Option<String>,
}

/// Flattened response shape: job and company fields denormalized onto the
/// application record for client convenience. `location`, `job_url` and
/// `notes` are accepted on create but not persisted, so they are always null
/// when read back.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub id: Uuid,
    pub job_title: String,
    pub company: String,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub job_url: Option<String>,
    pub stage_id: i32,
    pub date_applied: NaiveDate,
    pub notes: Option<String>,
    pub resume_url: Option<String>,
}

impl From<FlatApplicationRow> for ApplicationView {
    fn from(row: FlatApplicationRow) -> Self {
        ApplicationView {
            id: row.id,
            job_title: row.job_title.unwrap_or_else(|| "Unknown".to_string()),
            company: row.company.unwrap_or_else(|| "Unknown".to_string()),
            location: None,
            salary_range: row.salary_range,
            job_url: None,
            stage_id: row.stage_id,
            date_applied: row.date_applied,
            notes: None,
            resume_url: row.resume_url,
        }
    }
}
