//! Journal handler

use super::types::{JournalEntryRequest, JournalJson, JournalRejection, JournalResponse};
use crate::auth::OptionalUser;
use axum::response::Json;
use tracing::info;

/// Submit a journal entry
#[utoipa::path(
    post,
    path = "/api/journal",
    tag = "Journal",
    request_body = JournalEntryRequest,
    responses(
        (status = 200, description = "Entry accepted", body = JournalResponse),
        (status = 400, description = "Body malformed, content missing or blank", body = JournalResponse)
    )
)]
pub async fn submit_journal_entry(
    OptionalUser(user): OptionalUser,
    JournalJson(entry): JournalJson<JournalEntryRequest>,
) -> Result<Json<JournalResponse>, JournalRejection> {
    let content = entry.content.unwrap_or_default();
    if content.trim().is_empty() {
        return Err(JournalRejection("content is required".to_string()));
    }

    // TODO: persist entries once the journal table exists upstream
    info!(
        user_id = user.as_ref().map(|u| u.id.as_str()).unwrap_or("anonymous"),
        module_slug = entry.module_slug.as_deref().unwrap_or("-"),
        length = content.len(),
        "Journal entry accepted"
    );

    Ok(Json(JournalResponse::accepted()))
}
