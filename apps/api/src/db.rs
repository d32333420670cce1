use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

// No ON DELETE cascade anywhere: deleting an application may leave its tasks
// (and the owning job) dangling, matching the modeled relations.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS companies (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        name TEXT NOT NULL,
        industry TEXT,
        website TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        company_id UUID REFERENCES companies(id),
        title TEXT NOT NULL,
        description TEXT,
        salary_range TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS applications (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        job_id UUID REFERENCES jobs(id),
        stage_id INT NOT NULL,
        date_applied DATE NOT NULL DEFAULT CURRENT_DATE,
        resume_url TEXT,
        cover_letter_url TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        application_id UUID REFERENCES applications(id),
        title TEXT NOT NULL,
        description TEXT,
        due_date TIMESTAMP,
        is_completed BOOLEAN NOT NULL DEFAULT FALSE,
        priority TEXT NOT NULL DEFAULT 'Medium'
    )
    "#,
];

/// Creates the four tables if they do not exist yet. Idempotent; runs at
/// every startup.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}
