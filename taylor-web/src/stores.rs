//! In-memory catalog and registry stores

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use taylor_catalog::CatalogSnapshot;
use taylor_core::{CatalogItem, RawPrice};
use tokio::sync::RwLock;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{WebError, WebResult};

/// Registry feed shipped with the server
pub const BUNDLED_REGISTRY_FEED: &str = include_str!("../data/registry-feed.json");

/// Catalog served by `/api/catalog`
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    items: Arc<RwLock<Vec<CatalogItem>>>,
}

impl CatalogStore {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Load the snapshot written by the importer; an absent file gives an empty catalog
    pub fn from_snapshot<P: AsRef<Path>>(path: P) -> WebResult<Self> {
        let path = path.as_ref();
        match CatalogSnapshot::load(path)? {
            Some(snapshot) => {
                info!(
                    "Loaded {} catalog item(s) from snapshot generated at {}",
                    snapshot.items.len(),
                    snapshot.generated_at
                );
                Ok(Self::new(snapshot.items))
            }
            None => {
                info!("No catalog snapshot at {}, serving empty catalog", path.display());
                Ok(Self::default())
            }
        }
    }

    pub async fn all(&self) -> Vec<CatalogItem> {
        self.items.read().await.clone()
    }

    pub async fn find(&self, id: &str) -> Option<CatalogItem> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned()
    }
}

/// A catalog item saved to a member's registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub id: String,
    pub catalog_id: String,
    pub item: CatalogItem,
    pub added_at: DateTime<Utc>,
}

/// Per-member registries keyed by user id
#[derive(Debug, Clone, Default)]
pub struct RegistryStore {
    entries: Arc<RwLock<HashMap<String, Vec<RegistryEntry>>>>,
}

impl RegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item to a member's registry. Adding the same item twice returns
    /// the existing entry.
    pub async fn add(&self, user_id: &str, item: CatalogItem) -> RegistryEntry {
        let mut entries = self.entries.write().await;
        let registry = entries.entry(user_id.to_string()).or_default();

        if let Some(existing) = registry.iter().find(|entry| entry.catalog_id == item.id) {
            debug!(user_id, catalog_id = %item.id, "Item already in registry");
            return existing.clone();
        }

        let entry = RegistryEntry {
            id: Uuid::new_v4().to_string(),
            catalog_id: item.id.clone(),
            item,
            added_at: Utc::now(),
        };
        registry.push(entry.clone());
        entry
    }

    pub async fn list(&self, user_id: &str) -> Vec<RegistryEntry> {
        self.entries
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }
}

/// Registry feed record; prices may be formatted strings or numbers
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryFeedRecord {
    id: String,
    name: String,
    #[serde(default)]
    brand: String,
    #[serde(default)]
    price: RawPrice,
    #[serde(default)]
    category: String,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    retailer: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    notes: String,
}

/// Parse a registry feed document, normalizing every price
pub fn parse_registry_feed(json: &str) -> WebResult<Vec<CatalogItem>> {
    let records: Vec<RegistryFeedRecord> = serde_json::from_str(json)?;

    Ok(records
        .into_iter()
        .map(|record| CatalogItem {
            id: record.id,
            name: record.name,
            brand: record.brand,
            price: record.price.normalize(),
            category: record.category,
            image_url: record.image_url,
            retailer: record.retailer,
            url: record.url,
            notes: record.notes,
        })
        .collect())
}

/// Load the registry feed from a file, or the bundled feed when no path is set
pub fn load_registry_feed(path: Option<&Path>) -> WebResult<Vec<CatalogItem>> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                WebError::Config(format!(
                    "Failed to read registry feed {}: {}",
                    path.display(),
                    e
                ))
            })?;
            parse_registry_feed(&content)
        }
        None => parse_registry_feed(BUNDLED_REGISTRY_FEED),
    }
}
