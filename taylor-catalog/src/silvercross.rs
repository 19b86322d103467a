//! SilverCross storefront importer (Shopify `products.json`)

use async_trait::async_trait;
use serde::Deserialize;
use taylor_core::{
    catalog_item_id, CatalogItem, HttpConfig, RawPrice, SilverCrossConfig, TaylorResult,
};
use tracing::{debug, info};

use crate::client::{create_http_client, fetch_json, FeedClientConfig};
use crate::importer::CatalogImporter;

pub const SILVERCROSS: &str = "SilverCross";

#[derive(Debug, Deserialize)]
pub struct ProductsPage {
    #[serde(default)]
    pub products: Vec<ShopifyProduct>,
}

#[derive(Debug, Deserialize)]
pub struct ShopifyProduct {
    pub handle: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub images: Vec<ShopifyImage>,
    #[serde(default)]
    pub variants: Vec<ShopifyVariant>,
}

#[derive(Debug, Deserialize)]
pub struct ShopifyImage {
    pub src: String,
}

#[derive(Debug, Deserialize)]
pub struct ShopifyVariant {
    #[serde(default)]
    pub price: RawPrice,
    pub title: Option<String>,
}

pub struct SilverCrossImporter {
    client: reqwest::Client,
    client_config: FeedClientConfig,
    page_size: u32,
    max_pages: u32,
}

impl SilverCrossImporter {
    pub fn new(config: &SilverCrossConfig, http: &HttpConfig) -> TaylorResult<Self> {
        let client_config = FeedClientConfig::new(config.store_url.clone(), http);
        let client = create_http_client(&client_config)?;

        Ok(Self {
            client,
            client_config,
            page_size: config.page_size,
            max_pages: config.max_pages.max(1),
        })
    }
}

/// Map storefront products to catalog items; price comes from the first variant
pub fn parse_products(store_url: &str, products: Vec<ShopifyProduct>) -> Vec<CatalogItem> {
    let store_url = store_url.trim_end_matches('/');

    products
        .into_iter()
        .filter_map(|product| {
            let handle = product.handle.filter(|h| !h.trim().is_empty())?;
            let name = product.title.filter(|t| !t.trim().is_empty())?;
            let first_variant = product.variants.first();

            let notes = first_variant
                .and_then(|variant| variant.title.clone())
                .filter(|title| title != "Default Title")
                .unwrap_or_default();

            Some(CatalogItem {
                id: catalog_item_id(SILVERCROSS, &handle),
                name: name.trim().to_string(),
                brand: if product.vendor.trim().is_empty() {
                    "Silver Cross".to_string()
                } else {
                    product.vendor.trim().to_string()
                },
                price: first_variant
                    .map(|variant| variant.price.normalize())
                    .unwrap_or(0.0),
                category: product.product_type,
                image_url: product
                    .images
                    .first()
                    .map(|image| image.src.clone())
                    .unwrap_or_default(),
                retailer: SILVERCROSS.to_string(),
                url: format!("{}/products/{}", store_url, handle),
                notes,
            })
        })
        .collect()
}

#[async_trait]
impl CatalogImporter for SilverCrossImporter {
    fn source(&self) -> &str {
        SILVERCROSS
    }

    async fn import(&self) -> TaylorResult<Vec<CatalogItem>> {
        let mut items = Vec::new();

        for page in 1..=self.max_pages {
            let url = self.client_config.endpoint(&format!(
                "products.json?limit={}&page={}",
                self.page_size, page
            ));
            let response: ProductsPage =
                fetch_json(&self.client, &url, "silvercross_products").await?;

            if response.products.is_empty() {
                debug!("SilverCross page {} empty, import complete", page);
                break;
            }

            items.extend(parse_products(
                &self.client_config.base_url,
                response.products,
            ));
        }

        info!("Fetched {} SilverCross catalog item(s)", items.len());
        Ok(items)
    }
}
