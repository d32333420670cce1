//! Data access for the application pipeline. Every query filters by the
//! owning identity so tenant isolation lives here, not in the handlers.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::identity::Identity;
use crate::models::application::FlatApplicationRow;

/// Fields written by the Company -> Job -> Application insert chain.
pub struct NewApplication<'a> {
    pub job_title: &'a str,
    pub company: &'a str,
    pub salary_range: Option<&'a str>,
    pub stage_id: i32,
}

/// Partial update; absent fields are left untouched.
#[derive(Default)]
pub struct ApplicationPatch<'a> {
    pub stage_id: Option<i32>,
    pub job_title: Option<&'a str>,
    pub company: Option<&'a str>,
    pub salary_range: Option<&'a str>,
}

/// All applications for the identity with job and company eagerly resolved.
pub async fn list_flattened(
    pool: &PgPool,
    identity: &Identity,
) -> sqlx::Result<Vec<FlatApplicationRow>> {
    sqlx::query_as::<_, FlatApplicationRow>(
        r#"
        SELECT a.id, a.stage_id, a.date_applied, a.resume_url,
               j.title AS job_title, j.salary_range, c.name AS company
        FROM applications a
        LEFT JOIN jobs j ON j.id = a.job_id
        LEFT JOIN companies c ON c.id = j.company_id
        WHERE a.user_id = $1
        ORDER BY a.date_applied, a.id
        "#,
    )
    .bind(identity.user_id())
    .fetch_all(pool)
    .await
}

/// Creates a fresh Company, a Job referencing it, and an Application
/// referencing the Job — one transaction, rolled back as a unit on any
/// failure. A new company row is created per application, never reused by
/// name.
pub async fn create_application(
    pool: &PgPool,
    identity: &Identity,
    new: NewApplication<'_>,
) -> sqlx::Result<(Uuid, NaiveDate)> {
    let mut tx = pool.begin().await?;

    let company_id = Uuid::new_v4();
    sqlx::query("INSERT INTO companies (id, user_id, name) VALUES ($1, $2, $3)")
        .bind(company_id)
        .bind(identity.user_id())
        .bind(new.company)
        .execute(&mut *tx)
        .await?;

    let job_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO jobs (id, user_id, company_id, title, salary_range) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(job_id)
    .bind(identity.user_id())
    .bind(company_id)
    .bind(new.job_title)
    .bind(new.salary_range)
    .execute(&mut *tx)
    .await?;

    let application_id = Uuid::new_v4();
    let date_applied = Utc::now().date_naive();
    sqlx::query(
        "INSERT INTO applications (id, user_id, job_id, stage_id, date_applied) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(application_id)
    .bind(identity.user_id())
    .bind(job_id)
    .bind(new.stage_id)
    .bind(date_applied)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!("Created application {application_id} ({} @ {})", new.job_title, new.company);

    Ok((application_id, date_applied))
}

/// Applies a partial update: stage on the application itself, and
/// title/company-name/salary propagated into the linked job and company rows
/// when supplied and the links exist. Returns false when the application is
/// missing.
pub async fn update_application(
    pool: &PgPool,
    identity: &Identity,
    application_id: Uuid,
    patch: ApplicationPatch<'_>,
) -> sqlx::Result<bool> {
    let mut tx = pool.begin().await?;

    let row: Option<(Option<Uuid>,)> =
        sqlx::query_as("SELECT job_id FROM applications WHERE id = $1 AND user_id = $2")
            .bind(application_id)
            .bind(identity.user_id())
            .fetch_optional(&mut *tx)
            .await?;
    let Some((job_id,)) = row else {
        return Ok(false);
    };

    if let Some(stage_id) = patch.stage_id {
        sqlx::query("UPDATE applications SET stage_id = $1 WHERE id = $2")
            .bind(stage_id)
            .bind(application_id)
            .execute(&mut *tx)
            .await?;
    }

    if let Some(job_id) = job_id {
        if let Some(title) = patch.job_title {
            sqlx::query("UPDATE jobs SET title = $1 WHERE id = $2 AND user_id = $3")
                .bind(title)
                .bind(job_id)
                .bind(identity.user_id())
                .execute(&mut *tx)
                .await?;
        }
        if let Some(salary_range) = patch.salary_range {
            sqlx::query("UPDATE jobs SET salary_range = $1 WHERE id = $2 AND user_id = $3")
                .bind(salary_range)
                .bind(job_id)
                .bind(identity.user_id())
                .execute(&mut *tx)
                .await?;
        }
        if let Some(name) = patch.company {
            let company: Option<(Option<Uuid>,)> =
                sqlx::query_as("SELECT company_id FROM jobs WHERE id = $1")
                    .bind(job_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if let Some((Some(company_id),)) = company {
                sqlx::query("UPDATE companies SET name = $1 WHERE id = $2 AND user_id = $3")
                    .bind(name)
                    .bind(company_id)
                    .bind(identity.user_id())
                    .execute(&mut *tx)
                    .await?;
            }
        }
    }

    tx.commit().await?;
    Ok(true)
}

/// Hard delete. Returns false when no row matched. Tasks referencing the
/// application are left in place.
pub async fn delete_application(
    pool: &PgPool,
    identity: &Identity,
    application_id: Uuid,
) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND user_id = $2")
        .bind(application_id)
        .bind(identity.user_id())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Stage reassignment only; no other field changes.
pub async fn move_application(
    pool: &PgPool,
    identity: &Identity,
    application_id: Uuid,
    stage_id: i32,
) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE applications SET stage_id = $1 WHERE id = $2 AND user_id = $3")
        .bind(stage_id)
        .bind(application_id)
        .bind(identity.user_id())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
