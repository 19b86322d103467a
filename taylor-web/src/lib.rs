//! Taylor-Made Web Server
//!
//! Session handling, role-based dashboards and the JSON API of the
//! membership platform.

pub mod auth;
pub mod config_validator;
pub mod dashboard;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;
pub mod stores;
pub mod upstream;

// Re-export main types
pub use server::TaylorServer;
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE, COOKIE},
        HeaderValue, Method,
    },
    Router,
};
use std::path::PathBuf;
use taylor_core::LoggingConfig;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Secret used when none is configured; only acceptable in dev mode
pub const DEFAULT_SESSION_SECRET: &str = "taylor-made-dev-secret-change-me";

/// Seven days
pub const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_credentials(true)
        .allow_headers([ACCEPT, CONTENT_TYPE, COOKIE]);

    Router::new()
        .nest("/api", routes::api_routes())
        .merge(routes::dashboard_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Development mode; session cookies are not marked `Secure`
    pub dev_mode: bool,
    /// HMAC secret for session tokens
    pub session_secret: String,
    /// Session lifetime in seconds
    pub session_max_age_secs: i64,
    /// Base URL of the upstream API that proxy endpoints forward to
    pub upstream_url: String,
    /// Upstream request timeout in seconds
    pub upstream_timeout_secs: u64,
    /// Catalog snapshot written by `taylor import`
    pub catalog_path: Option<PathBuf>,
    /// Registry feed file; the bundled feed is used when unset
    pub registry_feed_path: Option<PathBuf>,
    /// JSON file with the user directory seed
    pub users_file: Option<PathBuf>,
    /// Origins allowed to make credentialed cross-origin requests
    pub allowed_origins: Vec<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            dev_mode: false,
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            session_max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            upstream_url: "http://127.0.0.1:4000".to_string(),
            upstream_timeout_secs: 15,
            catalog_path: None,
            registry_feed_path: None,
            users_file: None,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl WebConfig {
    /// Load configuration from `TAYLOR_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: std::env::var("TAYLOR_HOST").unwrap_or(defaults.host),
            port: env_parse("TAYLOR_PORT").unwrap_or(defaults.port),
            dev_mode: env_parse("TAYLOR_DEV_MODE").unwrap_or(defaults.dev_mode),
            session_secret: std::env::var("TAYLOR_SESSION_SECRET")
                .unwrap_or(defaults.session_secret),
            session_max_age_secs: env_parse("TAYLOR_SESSION_MAX_AGE")
                .unwrap_or(defaults.session_max_age_secs),
            upstream_url: std::env::var("TAYLOR_UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            upstream_timeout_secs: env_parse("TAYLOR_UPSTREAM_TIMEOUT")
                .unwrap_or(defaults.upstream_timeout_secs),
            catalog_path: std::env::var("TAYLOR_CATALOG_PATH").ok().map(PathBuf::from),
            registry_feed_path: std::env::var("TAYLOR_REGISTRY_FEED").ok().map(PathBuf::from),
            users_file: std::env::var("TAYLOR_USERS_FILE").ok().map(PathBuf::from),
            allowed_origins: std::env::var("TAYLOR_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.allowed_origins),
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|value| value.parse().ok())
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] taylor_core::TaylorError),

    #[error("Upstream client error: {0}")]
    Upstream(String),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

/// Initialize logging for the web server
pub fn init_logging(level: &str) {
    let mut config = LoggingConfig::with_level(level);
    config
        .filter_directives
        .push("tower_http=debug".to_string());

    if let Err(e) = taylor_core::init_logging(&config) {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WebConfig::default();
        assert_eq!(config.address(), "127.0.0.1:8080");
        assert_eq!(config.session_max_age_secs, 604_800);
        assert!(!config.dev_mode);
    }

    #[test]
    fn test_config_from_env() {
        // Test default values when env vars are not set
        let config = WebConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.catalog_path.is_none());
    }
}
