//! Client for the upstream API behind the proxy endpoints

use axum::http::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{WebError, WebResult};

/// Forwarding failures; each becomes a 500 with the message
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{0}")]
    Transport(String),

    #[error("Upstream returned a non-JSON body: {0}")]
    InvalidBody(String),
}

/// Single HTTP client shared by every proxy handler
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> WebResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("taylor-web/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WebError::Upstream(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// POST a JSON body with the caller's cookies and return the upstream
    /// status with its decoded JSON body
    pub async fn forward(
        &self,
        path: &str,
        cookie: Option<&str>,
        body: &Value,
    ) -> Result<(StatusCode, Value), UpstreamError> {
        let url = self.url(path);
        debug!("Forwarding request to {}", url);

        let mut request = self.client.post(&url).json(body);
        if let Some(cookie) = cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }

        let response = request.send().await.map_err(|e| {
            warn!("Upstream request to {} failed: {}", url, e);
            UpstreamError::Transport(e.to_string())
        })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        let payload = serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::InvalidBody(e.to_string()))?;

        Ok((status, payload))
    }
}
