//! Catalog handlers

use super::types::{
    AddToRegistryRequest, ApiError, ApiJson, CatalogResponse, RegistryItemResponse,
};
use crate::{auth::RequireMember, AppState};
use axum::{extract::State, http::StatusCode, response::Json};
use tracing::info;

/// List the imported catalog
#[utoipa::path(
    get,
    path = "/api/catalog",
    tag = "Catalog",
    responses((status = 200, description = "Full catalog", body = CatalogResponse))
)]
pub async fn list_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        catalog: state.catalog.all().await,
    })
}

/// Add a catalog item to the signed-in member's registry
#[utoipa::path(
    post,
    path = "/api/catalog",
    tag = "Catalog",
    request_body = AddToRegistryRequest,
    responses(
        (status = 201, description = "Item added to registry", body = RegistryItemResponse),
        (status = 307, description = "No member session; redirect to /login"),
        (status = 400, description = "Body malformed or catalogId missing", body = super::types::ErrorResponse),
        (status = 404, description = "Unknown catalog item", body = super::types::ErrorResponse)
    )
)]
pub async fn add_to_registry(
    State(state): State<AppState>,
    RequireMember(user): RequireMember,
    ApiJson(request): ApiJson<AddToRegistryRequest>,
) -> Result<(StatusCode, Json<RegistryItemResponse>), ApiError> {
    let catalog_id = request
        .catalog_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("catalogId is required".to_string()))?;

    let item = state
        .catalog
        .find(&catalog_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Catalog item {} not found", catalog_id)))?;

    let entry = state.registry.add(&user.id, item).await;
    info!(user_id = %user.id, catalog_id = %catalog_id, "Added item to registry");

    Ok((StatusCode::CREATED, Json(RegistryItemResponse { item: entry })))
}
