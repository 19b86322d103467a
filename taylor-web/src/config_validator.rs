//! Configuration validation for the Taylor-Made web server
//!
//! Runs at startup. Critical errors stop the server; warnings are logged.

use crate::{WebConfig, WebError, WebResult, DEFAULT_SESSION_SECRET};
use serde::{Deserialize, Serialize};
use std::{net::IpAddr, path::Path};
use tracing::{error, info, warn};

/// Shorter HMAC secrets are accepted but flagged
const MIN_SECRET_LEN: usize = 32;

/// Configuration validation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// Configuration validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub severity: ErrorSeverity,
}

/// Configuration validation warning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub recommendation: String,
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Critical,
    High,
}

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate complete web configuration
    pub fn validate_config(config: &WebConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        Self::validate_network_config(config, &mut errors, &mut warnings);
        Self::validate_session_config(config, &mut errors, &mut warnings);
        Self::validate_upstream_config(config, &mut errors, &mut warnings);
        Self::validate_data_files(config, &mut errors, &mut warnings);

        let is_valid = errors
            .iter()
            .all(|e| e.severity != ErrorSeverity::Critical);

        ValidationResult {
            is_valid,
            errors,
            warnings,
        }
    }

    fn validate_network_config(
        config: &WebConfig,
        errors: &mut Vec<ValidationError>,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        if config.host.is_empty() {
            errors.push(ValidationError {
                field: "host".to_string(),
                message: "Host cannot be empty".to_string(),
                severity: ErrorSeverity::Critical,
            });
        } else if config.host.parse::<IpAddr>().is_err() && config.host != "localhost" {
            errors.push(ValidationError {
                field: "host".to_string(),
                message: format!("Invalid host format: {}", config.host),
                severity: ErrorSeverity::High,
            });
        }

        if config.port != 0 && config.port < 1024 && !config.dev_mode {
            warnings.push(ValidationWarning {
                field: "port".to_string(),
                message: format!("Using privileged port {} in production", config.port),
                recommendation: "Consider using a port >= 1024 behind a reverse proxy".to_string(),
            });
        }
    }

    fn validate_session_config(
        config: &WebConfig,
        errors: &mut Vec<ValidationError>,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        if config.session_secret.is_empty() {
            errors.push(ValidationError {
                field: "session_secret".to_string(),
                message: "Session secret cannot be empty".to_string(),
                severity: ErrorSeverity::Critical,
            });
        } else if config.session_secret == DEFAULT_SESSION_SECRET && !config.dev_mode {
            errors.push(ValidationError {
                field: "session_secret".to_string(),
                message: "The built-in session secret is only allowed in dev mode; set TAYLOR_SESSION_SECRET"
                    .to_string(),
                severity: ErrorSeverity::Critical,
            });
        } else if config.session_secret.len() < MIN_SECRET_LEN {
            warnings.push(ValidationWarning {
                field: "session_secret".to_string(),
                message: format!(
                    "Session secret is shorter than {} characters",
                    MIN_SECRET_LEN
                ),
                recommendation: "Use a longer random secret".to_string(),
            });
        }

        if config.session_max_age_secs <= 0 {
            errors.push(ValidationError {
                field: "session_max_age_secs".to_string(),
                message: "Session max age must be positive".to_string(),
                severity: ErrorSeverity::Critical,
            });
        }
    }

    fn validate_upstream_config(
        config: &WebConfig,
        errors: &mut Vec<ValidationError>,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        match url::Url::parse(&config.upstream_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                if url.scheme() == "http" && !config.dev_mode && !is_loopback(&url) {
                    warnings.push(ValidationWarning {
                        field: "upstream_url".to_string(),
                        message: "Upstream API is reached over plain HTTP".to_string(),
                        recommendation: "Forwarded cookies should travel over HTTPS".to_string(),
                    });
                }
            }
            Ok(url) => errors.push(ValidationError {
                field: "upstream_url".to_string(),
                message: format!("Unsupported upstream scheme: {}", url.scheme()),
                severity: ErrorSeverity::Critical,
            }),
            Err(e) => errors.push(ValidationError {
                field: "upstream_url".to_string(),
                message: format!("Invalid upstream URL {}: {}", config.upstream_url, e),
                severity: ErrorSeverity::Critical,
            }),
        }

        if config.upstream_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "upstream_timeout_secs".to_string(),
                message: "Upstream timeout must be greater than 0".to_string(),
                severity: ErrorSeverity::High,
            });
        }
    }

    fn validate_data_files(
        config: &WebConfig,
        errors: &mut Vec<ValidationError>,
        warnings: &mut Vec<ValidationWarning>,
    ) {
        if let Some(path) = &config.users_file {
            if !path.is_file() {
                errors.push(ValidationError {
                    field: "users_file".to_string(),
                    message: format!("Users file does not exist: {}", path.display()),
                    severity: ErrorSeverity::Critical,
                });
            }
        } else if !config.dev_mode {
            warnings.push(ValidationWarning {
                field: "users_file".to_string(),
                message: "No users file configured".to_string(),
                recommendation: "Set TAYLOR_USERS_FILE so members can sign in".to_string(),
            });
        }

        if let Some(path) = &config.registry_feed_path {
            if !path.is_file() {
                errors.push(ValidationError {
                    field: "registry_feed_path".to_string(),
                    message: format!("Registry feed does not exist: {}", path.display()),
                    severity: ErrorSeverity::Critical,
                });
            }
        }

        match &config.catalog_path {
            Some(path) if !Path::new(path).exists() => warnings.push(ValidationWarning {
                field: "catalog_path".to_string(),
                message: format!("Catalog snapshot not found: {}", path.display()),
                recommendation: "Run 'taylor import' to create it".to_string(),
            }),
            None => warnings.push(ValidationWarning {
                field: "catalog_path".to_string(),
                message: "No catalog snapshot configured; the catalog will be empty".to_string(),
                recommendation: "Set TAYLOR_CATALOG_PATH".to_string(),
            }),
            _ => {}
        }
    }

    /// Log validation results
    pub fn log_validation_results(result: &ValidationResult) {
        if result.is_valid {
            info!("Configuration validation passed");
        } else {
            error!("Configuration validation failed");
        }

        for error in &result.errors {
            error!(field = %error.field, severity = ?error.severity, "{}", error.message);
        }

        for warning in &result.warnings {
            warn!(
                field = %warning.field,
                "{} (recommendation: {})",
                warning.message,
                warning.recommendation
            );
        }
    }
}

fn is_loopback(url: &url::Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain == "localhost",
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Validate configuration and return result
pub fn validate_config(config: &WebConfig) -> WebResult<ValidationResult> {
    let result = ConfigValidator::validate_config(config);
    ConfigValidator::log_validation_results(&result);

    if !result.is_valid {
        let fields: Vec<&str> = result
            .errors
            .iter()
            .filter(|e| e.severity == ErrorSeverity::Critical)
            .map(|e| e.field.as_str())
            .collect();
        return Err(WebError::Config(format!(
            "Configuration validation failed: {}",
            fields.join(", ")
        )));
    }

    Ok(result)
}
