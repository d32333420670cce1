use anyhow::{Context, Result};
use uuid::Uuid;

use crate::identity::PLACEHOLDER_USER_ID;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Owning user for all rows. TODO: replace with JWT-derived identity once
    /// the frontend's auth provider is wired through.
    pub user_id: Uuid,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: parse_port(std::env::var("PORT").ok())?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            user_id: parse_user_id(std::env::var("ATS_USER_ID").ok())?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_port(raw: Option<String>) -> Result<u16> {
    raw.unwrap_or_else(|| "8080".to_string())
        .parse::<u16>()
        .context("PORT must be a valid port number")
}

fn parse_user_id(raw: Option<String>) -> Result<Uuid> {
    match raw {
        Some(raw) => Uuid::parse_str(&raw).context("ATS_USER_ID must be a valid UUID"),
        None => Ok(PLACEHOLDER_USER_ID),
    }
}
