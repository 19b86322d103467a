use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Journal entry submitted from a learning module
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryRequest {
    #[schema(example = "week-1-intro")]
    pub module_slug: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JournalResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JournalResponse {
    pub fn accepted() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }
}

/// Body extractor for the journal endpoint; rejections keep the `{ ok, error }` shape
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(JournalRejection))]
pub struct JournalJson<T>(pub T);

/// A refused journal entry, answered with `400 { "ok": false, "error": ... }`
#[derive(Debug)]
pub struct JournalRejection(pub String);

impl From<JsonRejection> for JournalRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self(rejection.body_text())
    }
}

impl IntoResponse for JournalRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(JournalResponse {
                ok: false,
                error: Some(self.0),
            }),
        )
            .into_response()
    }
}
