//! Role-based dashboard routing
//!
//! `/dashboard` sends a signed-in user to the canonical dashboard for their
//! role. `/dashboard/{role}` catches roles without a dedicated dashboard: a
//! resolvable session is redirected to its canonical dashboard, and without
//! one a cached profile cookie can still produce a degraded, display-only
//! view. The degraded view grants nothing.

use crate::{
    auth::{
        self, session_token, CachedProfile, OptionalUser, RequireAdmin, RequireMember,
        RequireMentor, PROFILE_COOKIE,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use taylor_core::{dashboard_path, AuthenticatedUser, Role, LOGIN_PATH};
use tracing::{debug, info};
use utoipa::ToSchema;

pub const DEGRADED_NOTICE: &str =
    "Showing a cached profile because your session could not be verified. Sign in again to continue.";

/// Role-specific dashboard payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardView {
    pub role: Role,
    pub user: AuthenticatedUser,
    pub sections: Vec<String>,
}

impl DashboardView {
    fn new(role: Role, user: AuthenticatedUser) -> Self {
        let sections: &[&str] = match role {
            Role::Admin => &["members", "mentors", "catalog-imports", "polls"],
            Role::Mentor => &["mentees", "messages", "polls", "events"],
            Role::Member => &["registry", "journal", "messages", "events"],
        };

        Self {
            role,
            user,
            sections: sections.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Display-only view built from a cached profile
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DegradedDashboard {
    pub degraded: bool,
    pub notice: String,
    pub requested_role: String,
    pub profile: CachedProfile,
}

/// Redirect to the dashboard for the signed-in user's role
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "Dashboard",
    responses((status = 307, description = "Redirect to the role dashboard or /login"))
)]
pub async fn dashboard_entry(OptionalUser(user): OptionalUser) -> Redirect {
    Redirect::temporary(dashboard_path(user.map(|user| user.role)))
}

#[utoipa::path(
    get,
    path = "/dashboard/admin",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Admin dashboard", body = DashboardView),
        (status = 307, description = "Not an admin; redirect to /login")
    )
)]
pub async fn admin_dashboard(RequireAdmin(user): RequireAdmin) -> Json<DashboardView> {
    Json(DashboardView::new(Role::Admin, user))
}

#[utoipa::path(
    get,
    path = "/dashboard/mentor",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Mentor dashboard", body = DashboardView),
        (status = 307, description = "Not a mentor; redirect to /login")
    )
)]
pub async fn mentor_dashboard(RequireMentor(user): RequireMentor) -> Json<DashboardView> {
    Json(DashboardView::new(Role::Mentor, user))
}

#[utoipa::path(
    get,
    path = "/dashboard/member",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Member dashboard", body = DashboardView),
        (status = 307, description = "No member session; redirect to /login")
    )
)]
pub async fn member_dashboard(RequireMember(user): RequireMember) -> Json<DashboardView> {
    Json(DashboardView::new(Role::Member, user))
}

/// Dashboard for a role without a dedicated route
#[utoipa::path(
    get,
    path = "/dashboard/{role}",
    tag = "Dashboard",
    params(("role" = String, Path, description = "Requested role")),
    responses(
        (status = 200, description = "Degraded view from a cached profile", body = DegradedDashboard),
        (status = 307, description = "Redirect to the canonical dashboard or /login")
    )
)]
pub async fn fallback_dashboard(
    State(state): State<AppState>,
    Path(requested_role): Path<String>,
    jar: CookieJar,
) -> Response {
    let token = session_token(&jar);
    if let Ok(user) = auth::require_user(&state, token.as_deref()).await {
        return Redirect::temporary(dashboard_path(Some(user.role))).into_response();
    }

    let Some(raw_profile) = jar.get(PROFILE_COOKIE).map(|c| c.value().to_string()) else {
        return Redirect::temporary(LOGIN_PATH).into_response();
    };

    match CachedProfile::parse(&raw_profile) {
        Some(profile) => {
            info!(requested_role = %requested_role, "Serving degraded dashboard from cached profile");
            Json(DegradedDashboard {
                degraded: true,
                notice: DEGRADED_NOTICE.to_string(),
                requested_role,
                profile,
            })
            .into_response()
        }
        None => {
            debug!("Discarding unparseable cached profile");
            let jar = jar.add(state.cookies.clear_profile());
            (jar, Redirect::temporary(LOGIN_PATH)).into_response()
        }
    }
}
