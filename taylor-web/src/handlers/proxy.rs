//! Message, poll and RSVP endpoints forwarded to the upstream API
//!
//! The JSON body and the caller's `Cookie` header go upstream unchanged;
//! the upstream status and JSON body come back unchanged. Any forwarding
//! failure becomes `500 {"error": ...}`.

use super::types::{ApiError, ApiJson};
use crate::AppState;
use axum::{
    extract::State,
    http::{header::COOKIE, HeaderMap, StatusCode},
    response::Json,
};
use serde_json::Value;
use tracing::info;

async fn relay(
    state: &AppState,
    path: &str,
    headers: &HeaderMap,
    body: Value,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let cookie = headers.get(COOKIE).and_then(|value| value.to_str().ok());

    let (status, payload) = state
        .upstream
        .forward(path, cookie, &body)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    info!(path, status = status.as_u16(), "Relayed upstream response");
    Ok((status, Json(payload)))
}

/// Post a message
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "Community",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Upstream response relayed"),
        (status = 500, description = "Forwarding failed", body = super::types::ErrorResponse)
    )
)]
pub async fn post_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    relay(&state, "/api/messages", &headers, body).await
}

/// Create a poll
#[utoipa::path(
    post,
    path = "/api/polls",
    tag = "Community",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Upstream response relayed"),
        (status = 500, description = "Forwarding failed", body = super::types::ErrorResponse)
    )
)]
pub async fn create_poll(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    relay(&state, "/api/polls", &headers, body).await
}

/// Vote in a poll
#[utoipa::path(
    post,
    path = "/api/polls/vote",
    tag = "Community",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Upstream response relayed"),
        (status = 500, description = "Forwarding failed", body = super::types::ErrorResponse)
    )
)]
pub async fn vote_poll(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    relay(&state, "/api/polls/vote", &headers, body).await
}

/// RSVP to an event
#[utoipa::path(
    post,
    path = "/api/rsvp",
    tag = "Community",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Upstream response relayed"),
        (status = 500, description = "Forwarding failed", body = super::types::ErrorResponse)
    )
)]
pub async fn rsvp(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    relay(&state, "/api/rsvp", &headers, body).await
}
