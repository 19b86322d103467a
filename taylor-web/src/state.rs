//! Application state, built once by the composition root

use crate::{
    auth::{MemoryUserDirectory, SessionCookies, SessionSigner, UserDirectory},
    stores::{load_registry_feed, CatalogStore, RegistryStore},
    upstream::UpstreamClient,
    WebConfig, WebError, WebResult,
};
use std::sync::Arc;
use taylor_core::CatalogItem;
use tracing::{info, warn};

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: WebConfig,
    /// Session token signer
    pub sessions: SessionSigner,
    /// Session cookie builder
    pub cookies: SessionCookies,
    /// User directory that session tokens resolve against
    pub users: Arc<dyn UserDirectory>,
    /// Catalog loaded from the import snapshot
    pub catalog: CatalogStore,
    /// Member registries
    pub registry: RegistryStore,
    /// Upstream API client used by the proxy endpoints
    pub upstream: UpstreamClient,
    /// Static registry feed with normalized prices
    pub registry_feed: Arc<Vec<CatalogItem>>,
}

impl AppState {
    /// Create a new application state
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        let users: Arc<dyn UserDirectory> = match &config.users_file {
            Some(path) => Arc::new(
                MemoryUserDirectory::from_file(path)
                    .map_err(|e| WebError::Config(e.to_string()))?,
            ),
            None => {
                warn!("No users file configured; nobody can sign in with a password");
                Arc::new(MemoryUserDirectory::new())
            }
        };

        Self::with_user_directory(config, users)
    }

    /// Create state around an existing user directory
    pub fn with_user_directory(
        config: WebConfig,
        users: Arc<dyn UserDirectory>,
    ) -> WebResult<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => CatalogStore::from_snapshot(path)?,
            None => CatalogStore::default(),
        };
        let registry_feed = load_registry_feed(config.registry_feed_path.as_deref())?;
        let upstream = UpstreamClient::new(config.upstream_url.clone(), config.upstream_timeout_secs)?;

        info!(
            "Application state ready (dev mode: {}, upstream: {})",
            config.dev_mode,
            upstream.base_url()
        );

        Ok(Self {
            sessions: SessionSigner::new(&config.session_secret, config.session_max_age_secs),
            cookies: SessionCookies::new(!config.dev_mode, config.session_max_age_secs),
            users,
            catalog,
            registry: RegistryStore::new(),
            upstream,
            registry_feed: Arc::new(registry_feed),
            config,
        })
    }
}
