//! Session-based authentication and role guards
//!
//! Every guard resolves the `token` cookie to an [`AuthenticatedUser`] by
//! verifying the session token and looking the user up in the directory.
//! Any failure along the way is treated as "no session" and answered with a
//! redirect to the login page, never with a JSON error.

pub mod handlers;
pub mod jwt;
pub mod session;
pub mod users;

#[cfg(test)]
mod tests;

use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use taylor_core::{AuthenticatedUser, Role, LOGIN_PATH};
use tracing::debug;

pub use jwt::{AuthError, Claims, SessionSigner};
pub use session::{CachedProfile, SessionCookies, PROFILE_COOKIE, SESSION_COOKIE};
pub use users::{MemoryUserDirectory, UserDirectory, UserRecord};

/// Authentication redirect for failed auth
#[derive(Debug)]
pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::temporary(LOGIN_PATH).into_response()
    }
}

/// Session token from the cookie jar, ignoring empty values
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Resolve a session token to the user it belongs to
pub async fn resolve_user(
    state: &AppState,
    token: Option<&str>,
) -> Result<AuthenticatedUser, AuthError> {
    let token = token.ok_or(AuthError::MissingToken)?;
    let claims = state.sessions.verify(token)?;

    let record = state
        .users
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AuthError::UnknownUser(claims.sub.clone()))?;

    record.to_authenticated()
}

/// Require any signed-in user
pub async fn require_user(
    state: &AppState,
    token: Option<&str>,
) -> Result<AuthenticatedUser, AuthRedirect> {
    resolve_user(state, token).await.map_err(|e| {
        debug!("Rejecting request without a usable session: {}", e);
        AuthRedirect
    })
}

/// Require a user whose role is at least `required`
pub async fn require_role(
    state: &AppState,
    token: Option<&str>,
    required: Role,
) -> Result<AuthenticatedUser, AuthRedirect> {
    let user = require_user(state, token).await?;

    if user.role.satisfies(required) {
        Ok(user)
    } else {
        debug!(
            user_id = %user.id,
            role = %user.role,
            required = %required,
            "Role does not satisfy guard"
        );
        Err(AuthRedirect)
    }
}

/// Require a member; mentors and admins pass as well
pub async fn require_member(
    state: &AppState,
    token: Option<&str>,
) -> Result<AuthenticatedUser, AuthRedirect> {
    require_role(state, token, Role::Member).await
}

async fn authorize<S>(
    parts: &Parts,
    state: &S,
    required: Role,
) -> Result<AuthenticatedUser, AuthRedirect>
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    let app_state = AppState::from_ref(state);
    let token = session_token(&CookieJar::from_headers(&parts.headers));
    require_role(&app_state, token.as_deref(), required).await
}

/// Any signed-in user
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = session_token(&CookieJar::from_headers(&parts.headers));
        require_user(&app_state, token.as_deref()).await.map(CurrentUser)
    }
}

/// Member or higher
#[derive(Debug, Clone)]
pub struct RequireMember(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireMember
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authorize(parts, state, Role::Member).await.map(RequireMember)
    }
}

/// Mentor or admin
#[derive(Debug, Clone)]
pub struct RequireMentor(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireMentor
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authorize(parts, state, Role::Mentor).await.map(RequireMentor)
    }
}

#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authorize(parts, state, Role::Admin).await.map(RequireAdmin)
    }
}

/// Optional user extractor - doesn't fail if user is not authenticated
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = session_token(&CookieJar::from_headers(&parts.headers));
        Ok(OptionalUser(
            resolve_user(&app_state, token.as_deref()).await.ok(),
        ))
    }
}
