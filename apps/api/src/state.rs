use sqlx::PgPool;

use crate::identity::Identity;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Owner of every row read or written. Placeholder until real auth lands.
    pub identity: Identity,
}
