//! Configuration management

use crate::error::{ErrorContext, TaylorError, TaylorResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for catalog imports and tooling
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaylorConfig {
    pub import: ImportConfig,
    pub http: HttpConfig,
    pub sources: SourcesConfig,
    pub logging: LoggingConfig,
}

/// What the orchestrator does after a source fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPolicy {
    /// Attempt every source and report per-source outcomes
    #[default]
    ContinueOnError,
    /// Stop at the first failing source; later sources are skipped
    FailFast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Where the merged catalog snapshot is written
    pub snapshot_path: String,
    pub policy: ImportPolicy,
    /// Upper bound for a single source; `None` waits indefinitely
    pub source_timeout_secs: Option<u64>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "data/catalog.json".to_string(),
            policy: ImportPolicy::ContinueOnError,
            source_timeout_secs: Some(300),
        }
    }
}

/// Shared HTTP settings for feed clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "taylor-made-importer/1.0".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub albeebaby: AlbeeBabyConfig,
    pub impact: ImpactConfig,
    pub silvercross: SilverCrossConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbeeBabyConfig {
    pub enabled: bool,
    pub feed_url: String,
}

impl Default for AlbeeBabyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            feed_url: "https://www.albeebaby.com/feeds/products.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactConfig {
    pub enabled: bool,
    pub base_url: String,
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub catalog_id: Option<String>,
    pub page_size: u32,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.impact.com".to_string(),
            account_sid: None,
            auth_token: None,
            catalog_id: None,
            page_size: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SilverCrossConfig {
    pub enabled: bool,
    pub store_url: String,
    pub page_size: u32,
    pub max_pages: u32,
}

impl Default for SilverCrossConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            store_url: "https://www.silvercrossbaby.com".to_string(),
            page_size: 250,
            max_pages: 20,
        }
    }
}

impl TaylorConfig {
    /// Default config location: `~/.taylor-made/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".taylor-made")
            .join("config.toml")
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> TaylorResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TaylorError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: TaylorConfig = toml::from_str(&content).map_err(|e| TaylorError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> TaylorResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| TaylorError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content).map_err(|e| TaylorError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> TaylorResult<()> {
        if self.http.timeout_seconds == 0 {
            return Err(TaylorError::Config {
                message: "http.timeout_seconds must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set http.timeout_seconds to a positive value"),
            });
        }

        if self.import.source_timeout_secs == Some(0) {
            return Err(TaylorError::Config {
                message: "import.source_timeout_secs must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Remove the setting to disable the per-source timeout"),
            });
        }

        let urls = [
            ("sources.albeebaby.feed_url", &self.sources.albeebaby.feed_url),
            ("sources.impact.base_url", &self.sources.impact.base_url),
            ("sources.silvercross.store_url", &self.sources.silvercross.store_url),
        ];
        for (field, value) in urls {
            if let Err(e) = url::Url::parse(value) {
                return Err(TaylorError::Validation {
                    message: format!("Invalid URL '{}': {}", value, e),
                    field: Some(field.to_string()),
                    context: ErrorContext::new("config").with_operation("validate"),
                });
            }
        }

        let impact = &self.sources.impact;
        if impact.enabled
            && (impact.account_sid.is_none()
                || impact.auth_token.is_none()
                || impact.catalog_id.is_none())
        {
            return Err(TaylorError::Config {
                message: "Impact source requires account_sid, auth_token and catalog_id"
                    .to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Fill in [sources.impact] or set enabled = false"),
            });
        }

        Ok(())
    }
}
