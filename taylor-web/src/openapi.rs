//! OpenAPI document for the Taylor-Made web server

use axum::response::Json;
use utoipa::OpenApi;

use crate::dashboard::{DashboardView, DegradedDashboard};
use crate::handlers::{
    AddToRegistryRequest, CatalogResponse, ErrorResponse, HealthResponse, JournalEntryRequest,
    JournalResponse, LoginRequest, LoginResponse, OkResponse, RegistryFeedResponse,
    RegistryItemResponse, RegistryResponse, SessionRequest,
};
use crate::{auth::CachedProfile, stores::RegistryEntry};
use taylor_core::{AuthenticatedUser, CatalogItem, Role};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taylor-Made API",
        version = "0.1.0",
        description = "Membership platform sessions, dashboards, catalog and community endpoints",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::handlers::health_check,

        crate::auth::handlers::login,
        crate::auth::handlers::me,
        crate::auth::handlers::set_session,
        crate::auth::handlers::clear_session,
        crate::auth::handlers::logout,

        crate::dashboard::dashboard_entry,
        crate::dashboard::admin_dashboard,
        crate::dashboard::mentor_dashboard,
        crate::dashboard::member_dashboard,
        crate::dashboard::fallback_dashboard,

        crate::handlers::list_catalog,
        crate::handlers::add_to_registry,
        crate::handlers::list_registry,
        crate::handlers::registry_feed,

        crate::handlers::post_message,
        crate::handlers::create_poll,
        crate::handlers::vote_poll,
        crate::handlers::rsvp,

        crate::handlers::submit_journal_entry,
    ),
    components(
        schemas(
            Role,
            AuthenticatedUser,
            CatalogItem,
            RegistryEntry,
            CachedProfile,
            DashboardView,
            DegradedDashboard,
            HealthResponse,
            ErrorResponse,
            OkResponse,
            LoginRequest,
            LoginResponse,
            SessionRequest,
            CatalogResponse,
            AddToRegistryRequest,
            RegistryItemResponse,
            RegistryResponse,
            RegistryFeedResponse,
            JournalEntryRequest,
            JournalResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Sign-in and session cookie management"),
        (name = "Dashboard", description = "Role-based dashboard routing"),
        (name = "Catalog", description = "Imported product catalog"),
        (name = "Registry", description = "Member registries and the registry feed"),
        (name = "Community", description = "Messages, polls and RSVPs forwarded upstream"),
        (name = "Journal", description = "Module journal entries")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
