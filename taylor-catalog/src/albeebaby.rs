//! AlbeeBaby product feed importer

use async_trait::async_trait;
use serde::Deserialize;
use taylor_core::{catalog_item_id, AlbeeBabyConfig, CatalogItem, HttpConfig, RawPrice, TaylorResult};
use tracing::{debug, info};

use crate::client::{create_http_client, fetch_json, FeedClientConfig};
use crate::importer::CatalogImporter;

pub const ALBEEBABY: &str = "AlbeeBaby";

/// AlbeeBaby JSON feed document
#[derive(Debug, Deserialize)]
pub struct AlbeeBabyFeed {
    #[serde(default)]
    pub products: Vec<AlbeeBabyProduct>,
}

#[derive(Debug, Deserialize)]
pub struct AlbeeBabyProduct {
    pub sku: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub price: RawPrice,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub notes: Option<String>,
}

pub struct AlbeeBabyImporter {
    client: reqwest::Client,
    feed_url: String,
}

impl AlbeeBabyImporter {
    pub fn new(config: &AlbeeBabyConfig, http: &HttpConfig) -> TaylorResult<Self> {
        let client_config = FeedClientConfig::new(config.feed_url.clone(), http);
        let client = create_http_client(&client_config)?;

        Ok(Self {
            client,
            feed_url: config.feed_url.clone(),
        })
    }
}

/// Map feed products to catalog items, dropping entries without a sku or title
pub fn parse_feed(feed: AlbeeBabyFeed) -> Vec<CatalogItem> {
    let total = feed.products.len();
    let items: Vec<CatalogItem> = feed
        .products
        .into_iter()
        .filter_map(|product| {
            let sku = product.sku.filter(|s| !s.trim().is_empty())?;
            let name = product.title.filter(|t| !t.trim().is_empty())?;

            Some(CatalogItem {
                id: catalog_item_id(ALBEEBABY, &sku),
                name: name.trim().to_string(),
                brand: product.brand.trim().to_string(),
                price: product.price.normalize(),
                category: product.category,
                image_url: product.image,
                retailer: ALBEEBABY.to_string(),
                url: product.link,
                notes: product.notes.unwrap_or_default(),
            })
        })
        .collect();

    if items.len() < total {
        debug!(
            "Skipped {} AlbeeBaby product(s) without sku or title",
            total - items.len()
        );
    }

    items
}

#[async_trait]
impl CatalogImporter for AlbeeBabyImporter {
    fn source(&self) -> &str {
        ALBEEBABY
    }

    async fn import(&self) -> TaylorResult<Vec<CatalogItem>> {
        let feed: AlbeeBabyFeed =
            fetch_json(&self.client, &self.feed_url, "albeebaby_feed").await?;
        let items = parse_feed(feed);

        info!("Fetched {} AlbeeBaby catalog item(s)", items.len());
        Ok(items)
    }
}
