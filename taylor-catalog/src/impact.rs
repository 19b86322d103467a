//! Impact.com catalog API importer
//!
//! Pages through `Mediapartners/{sid}/Catalogs/{id}/Items` following the
//! `@nextpageuri` links until the API returns an empty one.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use taylor_core::{
    catalog_item_id, config_error, CatalogItem, HttpConfig, ImpactConfig, RawPrice, TaylorResult,
};
use tracing::{debug, info, warn};

use crate::client::{create_http_client, fetch_json, FeedClientConfig};
use crate::importer::CatalogImporter;

pub const IMPACT: &str = "Impact";

/// Hard stop against a misbehaving paginator
const MAX_PAGES: usize = 500;

#[derive(Debug, Deserialize)]
pub struct ImpactItemsPage {
    #[serde(rename = "Items", default)]
    pub items: Vec<ImpactItem>,
    #[serde(rename = "@nextpageuri", default)]
    pub next_page_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImpactItem {
    pub catalog_item_id: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub current_price: RawPrice,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

pub struct ImpactImporter {
    client: reqwest::Client,
    client_config: FeedClientConfig,
    first_page_path: String,
}

impl ImpactImporter {
    pub fn new(config: &ImpactConfig, http: &HttpConfig) -> TaylorResult<Self> {
        let (Some(account_sid), Some(auth_token), Some(catalog_id)) = (
            config.account_sid.clone(),
            config.auth_token.clone(),
            config.catalog_id.clone(),
        ) else {
            return Err(config_error!(
                "Impact importer requires account_sid, auth_token and catalog_id",
                "impact_importer"
            ));
        };

        let first_page_path = format!(
            "Mediapartners/{}/Catalogs/{}/Items?PageSize={}",
            urlencoding::encode(&account_sid),
            urlencoding::encode(&catalog_id),
            config.page_size
        );

        let client_config = FeedClientConfig::new(config.base_url.clone(), http)
            .with_credentials(account_sid, auth_token);
        let client = create_http_client(&client_config)?;

        Ok(Self {
            client,
            client_config,
            first_page_path,
        })
    }
}

/// Map one page of API items to catalog items
pub fn parse_items(items: Vec<ImpactItem>) -> Vec<CatalogItem> {
    items
        .into_iter()
        .filter_map(|item| {
            let key = item
                .catalog_item_id
                .or(item.id)
                .filter(|k| !k.trim().is_empty())?;
            let name = item.name.filter(|n| !n.trim().is_empty())?;

            Some(CatalogItem {
                id: catalog_item_id(IMPACT, &key),
                name: name.trim().to_string(),
                brand: item.manufacturer.trim().to_string(),
                price: item.current_price.normalize(),
                category: item.category,
                image_url: item.image_url,
                retailer: IMPACT.to_string(),
                url: item.url,
                notes: item.description.unwrap_or_default(),
            })
        })
        .collect()
}

#[async_trait]
impl CatalogImporter for ImpactImporter {
    fn source(&self) -> &str {
        IMPACT
    }

    async fn import(&self) -> TaylorResult<Vec<CatalogItem>> {
        let mut items = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(self.first_page_path.clone());

        while let Some(path) = next.take() {
            if !seen.insert(path.clone()) {
                warn!("Impact paginator repeated page {}, stopping", path);
                break;
            }
            if seen.len() > MAX_PAGES {
                warn!("Impact import reached {} pages, stopping", MAX_PAGES);
                break;
            }

            let url = self.client_config.endpoint(&path);
            let page: ImpactItemsPage = fetch_json(&self.client, &url, "impact_items").await?;
            debug!("Impact page {} returned {} item(s)", seen.len(), page.items.len());

            items.extend(parse_items(page.items));
            next = page.next_page_uri.filter(|uri| !uri.trim().is_empty());
        }

        info!("Fetched {} Impact catalog item(s)", items.len());
        Ok(items)
    }
}
