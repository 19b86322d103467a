//! Login, session and logout handlers

use super::{
    jwt::AuthError,
    session::CachedProfile,
    CurrentUser,
};
use crate::handlers::types::{
    ApiError, ApiJson, LoginRequest, LoginResponse, OkResponse, SessionRequest,
};
use crate::AppState;
use axum::{
    extract::State,
    http::header::CACHE_CONTROL,
    response::{IntoResponse, Json, Redirect},
};
use axum_extra::extract::CookieJar;
use taylor_core::{dashboard_path, AuthenticatedUser};
use tracing::{info, warn};

/// Authenticate with email and password and start a session
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set", body = LoginResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AuthError> {
    let (Some(email), Some(password)) = (
        request.email.filter(|e| !e.trim().is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AuthError::MissingCredentials);
    };

    info!("Login attempt: {}", email);

    let record = state
        .users
        .find_by_email(&email)
        .await?
        .filter(|record| record.verify_password(&password))
        .ok_or_else(|| {
            warn!("Rejected login for {}", email);
            AuthError::InvalidCredentials
        })?;

    // A user without a routable role has nowhere to land
    let user = record.to_authenticated().map_err(|e| {
        warn!("Login for {} refused: {}", email, e);
        AuthError::InvalidCredentials
    })?;

    let token = state.sessions.issue(&user.id)?;
    let mut jar = jar.add(state.cookies.issue(&token));
    if let Some(profile) = state.cookies.profile(&CachedProfile::from(&user)) {
        jar = jar.add(profile);
    }

    info!(user_id = %user.id, role = %user.role, "User signed in");
    let redirect = dashboard_path(Some(user.role)).to_string();
    Ok((jar, Json(LoginResponse { user, redirect })))
}

/// Current user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Signed-in user", body = AuthenticatedUser),
        (status = 307, description = "No session; redirect to /login")
    )
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<AuthenticatedUser> {
    Json(user)
}

/// Store a session token issued elsewhere
#[utoipa::path(
    post,
    path = "/api/session",
    tag = "Auth",
    request_body = SessionRequest,
    responses(
        (status = 200, description = "Session cookie set", body = OkResponse),
        (status = 400, description = "Token missing")
    )
)]
pub async fn set_session(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(request): ApiJson<SessionRequest>,
) -> Result<(CookieJar, Json<OkResponse>), ApiError> {
    let token = request
        .token
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::BadRequest("token is required".to_string()))?;

    Ok((jar.add(state.cookies.issue(&token)), Json(OkResponse::ok())))
}

/// Expire the session cookie
#[utoipa::path(
    delete,
    path = "/api/session",
    tag = "Auth",
    responses((status = 200, description = "Session cookie cleared", body = OkResponse))
)]
pub async fn clear_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<OkResponse>) {
    (jar.add(state.cookies.clear()), Json(OkResponse::ok()))
}

/// Clear the session and send the browser home
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "Auth",
    responses((status = 303, description = "Session cleared; redirect to /"))
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar
        .add(state.cookies.clear())
        .add(state.cookies.clear_profile());

    (jar, [(CACHE_CONTROL, "no-store")], Redirect::to("/"))
}
