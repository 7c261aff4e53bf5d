use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// When set, documents are stored in PostgreSQL; otherwise in memory.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// Header carrying the caller's user id, injected by the upstream session layer.
    pub auth_user_header: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            database_url: optional_env("DATABASE_URL"),
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            auth_user_header: std::env::var("AUTH_USER_HEADER")
                .unwrap_or_else(|_| DEFAULT_AUTH_USER_HEADER.to_string())
                .to_ascii_lowercase(),
        })
    }
}

pub const DEFAULT_AUTH_USER_HEADER: &str = "x-user-id";

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
