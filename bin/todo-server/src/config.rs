//! Server configuration, loaded from environment variables at startup.

use std::time::Duration;

/// Runtime configuration for todo-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:5000"`).
    /// A bare `PORT` variable replaces only the port of the default.
    pub bind_address: String,

    /// sqlx SQLite URL (default: `"sqlite://todo.db"`).
    pub database_url: String,

    /// Upper bound on pooled store connections.
    pub db_max_connections: u32,

    /// How long a store call may wait for a pooled connection before it
    /// fails as a store error.
    pub db_acquire_timeout: Duration,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated list of allowed CORS origins; `None` allows any.
    pub cors_allowed_origins: Option<String>,

    /// Serve the OpenAPI document at `/api-docs/openapi.json`.
    pub enable_docs: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let default_bind = match std::env::var("PORT") {
            Ok(port) if !port.trim().is_empty() => format!("0.0.0.0:{}", port.trim()),
            _ => "0.0.0.0:5000".to_owned(),
        };
        Self {
            bind_address: env_or("TODO_BIND", &default_bind),
            database_url: env_or("TODO_DATABASE_URL", "sqlite://todo.db"),
            db_max_connections: parse_env("TODO_DB_MAX_CONNECTIONS", 5),
            db_acquire_timeout: Duration::from_secs(parse_env("TODO_DB_ACQUIRE_TIMEOUT_SECS", 5)),
            log_level: env_or("TODO_LOG", "info"),
            log_json: flag_env("TODO_LOG_JSON", false),
            cors_allowed_origins: std::env::var("TODO_CORS_ORIGINS")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            enable_docs: flag_env("TODO_ENABLE_DOCS", true),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_owned(),
            database_url: "sqlite://todo.db".to_owned(),
            db_max_connections: 5,
            db_acquire_timeout: Duration::from_secs(5),
            log_level: "info".to_owned(),
            log_json: false,
            cors_allowed_origins: None,
            enable_docs: true,
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn flag_env(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}
