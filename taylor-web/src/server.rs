//! Taylor-Made web server
//!
//! Composition root: validates configuration, builds [`AppState`] once and
//! serves the router.

use crate::{config_validator, create_app, AppState, WebConfig, WebError, WebResult};
use axum::serve;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main Taylor-Made web server
pub struct TaylorServer {
    config: WebConfig,
    state: AppState,
}

impl TaylorServer {
    /// Create a new server, refusing configurations with critical errors
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        config_validator::validate_config(&config)?;
        let state = AppState::new(config.clone()).await?;

        Ok(Self { config, state })
    }

    /// Start the web server
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("Starting Taylor-Made web server");
        info!("Development mode: {}", self.config.dev_mode);

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("Server listening on http://{}", listener.local_addr()?);

        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server shut down");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Builder for TaylorServer
pub struct TaylorServerBuilder {
    config: WebConfig,
}

impl TaylorServerBuilder {
    /// Start from an existing configuration
    pub fn new(config: WebConfig) -> Self {
        Self { config }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable development mode
    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.config.dev_mode = dev_mode;
        self
    }

    pub fn upstream_url<S: Into<String>>(mut self, upstream_url: S) -> Self {
        self.config.upstream_url = upstream_url.into();
        self
    }

    pub fn catalog_path<P: Into<std::path::PathBuf>>(mut self, path: P) -> Self {
        self.config.catalog_path = Some(path.into());
        self
    }

    pub fn users_file<P: Into<std::path::PathBuf>>(mut self, path: P) -> Self {
        self.config.users_file = Some(path.into());
        self
    }

    /// Build the server
    pub async fn build(self) -> WebResult<TaylorServer> {
        TaylorServer::new(self.config).await
    }
}

impl Default for TaylorServerBuilder {
    fn default() -> Self {
        Self::new(WebConfig::default())
    }
}
