//! CSV export of the application pipeline — same join as the list endpoint,
//! rendered as a downloadable attachment.

use anyhow::{anyhow, Context, Result};
use axum::{extract::State, http::header, response::IntoResponse};

use crate::applications::repo;
use crate::errors::AppError;
use crate::models::application::FlatApplicationRow;
use crate::state::AppState;

/// Renders the flattened rows as CSV. Missing job/company links become empty
/// fields, not "Unknown" — the export mirrors what is stored, not the view.
pub fn render_csv(rows: &[FlatApplicationRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "job_title", "company", "stage_id", "date_applied"])?;
    for row in rows {
        writer.write_record([
            row.id.to_string(),
            row.job_title.clone().unwrap_or_default(),
            row.company.clone().unwrap_or_default(),
            row.stage_id.to_string(),
            row.date_applied.to_string(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("flushing csv writer: {e}"))?;
    String::from_utf8(bytes).context("csv output was not valid UTF-8")
}

/// GET /export/csv
pub async fn handle_export_csv(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows = repo::list_flattened(&state.db, &state.identity).await?;
    let body = render_csv(&rows).map_err(AppError::Internal)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=applications.csv",
            ),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn header_only_when_pipeline_is_empty() {
        let csv = render_csv(&[]).unwrap();
        assert_eq!(csv, "id,job_title,company,stage_id,date_applied\n");
    }

    #[test]
    fn missing_links_render_as_empty_fields() {
        let id = Uuid::nil();
        let rows = vec![FlatApplicationRow {
            id,
            stage_id: 3,
            date_applied: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            resume_url: None,
            job_title: None,
            salary_range: None,
            company: None,
        }];
        let csv = render_csv(&rows).unwrap();
        let mut lines = csv.lines();
        lines.next(); // header
        assert_eq!(lines.next().unwrap(), format!("{id},,,3,2024-05-01"));
    }
}
