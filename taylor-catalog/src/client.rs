//! HTTP plumbing shared by the retailer feed clients

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::de::DeserializeOwned;
use taylor_core::{ErrorContext, HttpConfig, TaylorError, TaylorResult};
use tracing::debug;

/// Basic credentials sent with every request of a client
#[derive(Debug, Clone, PartialEq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// Configuration for feed clients
#[derive(Debug, Clone)]
pub struct FeedClientConfig {
    /// Base URL of the feed or API
    pub base_url: String,
    /// Basic auth credentials, if the feed requires them
    pub credentials: Option<BasicCredentials>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for FeedClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            credentials: None,
            timeout_seconds: 30,
            user_agent: "taylor-made-importer/1.0".to_string(),
        }
    }
}

impl FeedClientConfig {
    /// Configuration for a public feed
    pub fn new(base_url: impl Into<String>, http: &HttpConfig) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: http.timeout_seconds,
            user_agent: http.user_agent.clone(),
            ..Default::default()
        }
    }

    /// Set basic credentials
    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.credentials = Some(BasicCredentials { username, password });
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Join a path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Create an HTTP client with common configuration
pub fn create_http_client(config: &FeedClientConfig) -> TaylorResult<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();

    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(&config.user_agent).map_err(|e| {
            TaylorError::Config {
                message: format!("Invalid user agent: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            }
        })?,
    );

    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    if let Some(credentials) = &config.credentials {
        let encoded = BASE64.encode(format!(
            "{}:{}",
            credentials.username, credentials.password
        ));
        let mut value = reqwest::header::HeaderValue::from_str(&format!("Basic {}", encoded))
            .map_err(|e| TaylorError::Config {
                message: format!("Invalid credentials: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            })?;
        value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, value);
    }

    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .default_headers(headers)
        .build()
        .map_err(|e| TaylorError::Network {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("create_client"),
        })
}

/// GET a URL and decode the JSON body
pub async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    operation: &str,
) -> TaylorResult<T> {
    debug!("GET {}", url);

    let response = client.get(url).send().await.map_err(|e| TaylorError::Network {
        message: format!("Request to {} failed: {}", url, e),
        source: Some(Box::new(e)),
        context: ErrorContext::new("feed_client")
            .with_operation(operation)
            .with_suggestion("Check network connectivity and feed availability"),
    })?;

    if !response.status().is_success() {
        return Err(handle_response_error(response, operation).await);
    }

    response.json::<T>().await.map_err(|e| TaylorError::Feed {
        message: format!("Failed to decode response from {}: {}", url, e),
        source_name: None,
        source: Some(Box::new(e)),
        context: ErrorContext::new("feed_client").with_operation(operation),
    })
}

/// Turn a non-success HTTP response into an error
pub async fn handle_response_error(response: reqwest::Response, operation: &str) -> TaylorError {
    let status = response.status();
    let url = response.url().clone();

    let error_body = response.text().await.unwrap_or_default();

    TaylorError::Network {
        message: format!(
            "HTTP {} error for {}: {}",
            status.as_u16(),
            url,
            if error_body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error")
            } else {
                &error_body
            }
        ),
        source: None,
        context: ErrorContext::new("feed_client")
            .with_operation(operation)
            .with_suggestion(match status.as_u16() {
                401 | 403 => "Check the feed credentials",
                404 => "Feed not found; check the configured URL",
                429 => "Rate limited by the retailer; try again later",
                _ => "Check network connectivity and feed status",
            }),
    }
}
