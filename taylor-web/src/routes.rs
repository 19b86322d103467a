//! Route definitions for the Taylor-Made web server

use crate::{auth, dashboard, handlers, openapi, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check and docs
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(openapi::openapi_json))
        // Session
        .route("/auth/login", post(auth::handlers::login))
        .route("/auth/me", get(auth::handlers::me))
        .route(
            "/session",
            post(auth::handlers::set_session).delete(auth::handlers::clear_session),
        )
        .route("/logout", post(auth::handlers::logout))
        // Catalog and registry
        .route(
            "/catalog",
            get(handlers::list_catalog).post(handlers::add_to_registry),
        )
        .route("/registry", get(handlers::list_registry))
        .route("/registry/feed", get(handlers::registry_feed))
        // Upstream proxies
        .route("/messages", post(handlers::post_message))
        .route("/polls", post(handlers::create_poll))
        .route("/polls/vote", post(handlers::vote_poll))
        .route("/rsvp", post(handlers::rsvp))
        // Journal
        .route("/journal", post(handlers::submit_journal_entry))
}

/// Create dashboard routes; the named dashboards take precedence over `{role}`
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::dashboard_entry))
        .route("/dashboard/admin", get(dashboard::admin_dashboard))
        .route("/dashboard/mentor", get(dashboard::mentor_dashboard))
        .route("/dashboard/member", get(dashboard::member_dashboard))
        .route("/dashboard/{role}", get(dashboard::fallback_dashboard))
}
