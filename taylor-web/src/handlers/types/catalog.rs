//! Catalog and registry types

use serde::{Deserialize, Serialize};
use taylor_core::CatalogItem;
use utoipa::ToSchema;

use crate::stores::RegistryEntry;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CatalogResponse {
    pub catalog: Vec<CatalogItem>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToRegistryRequest {
    #[schema(example = "silvercross-wave-pushchair")]
    pub catalog_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistryItemResponse {
    pub item: RegistryEntry,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistryResponse {
    pub items: Vec<RegistryEntry>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistryFeedResponse {
    pub items: Vec<CatalogItem>,
}
