//! Error types shared by the catalog importers, the CLI and the web server

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type TaylorResult<T> = Result<T, TaylorError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the Taylor-Made platform
#[derive(Error, Debug)]
pub enum TaylorError {
    #[error("Catalog feed error: {message}")]
    Feed {
        message: String,
        source_name: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Operation timeout: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TaylorError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            TaylorError::Feed { context, .. } => Some(context),
            TaylorError::Storage { context, .. } => Some(context),
            TaylorError::Config { context, .. } => Some(context),
            TaylorError::Network { context, .. } => Some(context),
            TaylorError::Validation { context, .. } => Some(context),
            TaylorError::Timeout { context, .. } => Some(context),
            TaylorError::Io(_) | TaylorError::Serialization(_) => None,
        }
    }

    /// Transport failures that a later import run may not hit
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TaylorError::Network { .. } | TaylorError::Timeout { .. }
        )
    }

    /// Retailer a feed error came from
    pub fn source_name(&self) -> Option<&str> {
        match self {
            TaylorError::Feed { source_name, .. } => source_name.as_deref(),
            _ => None,
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! feed_error {
    ($msg:expr, $source_name:expr) => {
        $crate::TaylorError::Feed {
            message: $msg.to_string(),
            source_name: Some($source_name.to_string()),
            source: None,
            context: $crate::ErrorContext::new("catalog_feed"),
        }
    };
    ($msg:expr, $source_name:expr, $source:expr) => {
        $crate::TaylorError::Feed {
            message: $msg.to_string(),
            source_name: Some($source_name.to_string()),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new("catalog_feed"),
        }
    };
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::TaylorError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file")
                .with_suggestion("Run 'taylor config --init' to create default config"),
        }
    };
}
