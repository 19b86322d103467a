//! Registry handlers

use super::types::{RegistryFeedResponse, RegistryResponse};
use crate::{auth::RequireMember, AppState};
use axum::{extract::State, response::Json};

/// The signed-in member's registry
#[utoipa::path(
    get,
    path = "/api/registry",
    tag = "Registry",
    responses(
        (status = 200, description = "Registry entries", body = RegistryResponse),
        (status = 307, description = "No member session; redirect to /login")
    )
)]
pub async fn list_registry(
    State(state): State<AppState>,
    RequireMember(user): RequireMember,
) -> Json<RegistryResponse> {
    Json(RegistryResponse {
        items: state.registry.list(&user.id).await,
    })
}

/// Static registry feed with numeric prices
#[utoipa::path(
    get,
    path = "/api/registry/feed",
    tag = "Registry",
    responses((status = 200, description = "Registry feed", body = RegistryFeedResponse))
)]
pub async fn registry_feed(State(state): State<AppState>) -> Json<RegistryFeedResponse> {
    Json(RegistryFeedResponse {
        items: state.registry_feed.as_ref().clone(),
    })
}
