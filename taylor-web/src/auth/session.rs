//! Session and cached-profile cookies

use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use taylor_core::AuthenticatedUser;
use time::Duration;
use utoipa::ToSchema;

/// Cookie holding the session token
pub const SESSION_COOKIE: &str = "token";

/// Cookie holding a display-only copy of the signed-in user's profile
pub const PROFILE_COOKIE: &str = "profile";

/// Builds the cookies that carry session state to the browser.
///
/// Session cookies are always `HttpOnly`, `SameSite=Lax` and scoped to `/`;
/// `Secure` is set outside dev mode. Clearing a cookie keeps those
/// attributes and only empties the value and zeroes `Max-Age`.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    secure: bool,
    max_age: Duration,
}

impl SessionCookies {
    pub fn new(secure: bool, max_age_secs: i64) -> Self {
        Self {
            secure,
            max_age: Duration::seconds(max_age_secs),
        }
    }

    /// Cookie carrying a freshly issued session token
    pub fn issue(&self, token: &str) -> Cookie<'static> {
        self.session_cookie(token.to_string(), self.max_age)
    }

    /// Cookie that immediately expires the session
    pub fn clear(&self) -> Cookie<'static> {
        self.session_cookie(String::new(), Duration::ZERO)
    }

    /// Cached profile for the degraded dashboard; readable by scripts
    pub fn profile(&self, profile: &CachedProfile) -> Option<Cookie<'static>> {
        let json = serde_json::to_string(profile).ok()?;
        Some(
            Cookie::build((PROFILE_COOKIE, urlencoding::encode(&json).into_owned()))
                .secure(self.secure)
                .same_site(SameSite::Lax)
                .path("/")
                .max_age(self.max_age)
                .build(),
        )
    }

    pub fn clear_profile(&self) -> Cookie<'static> {
        Cookie::build((PROFILE_COOKIE, ""))
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(Duration::ZERO)
            .build()
    }

    fn session_cookie(&self, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, value))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(max_age)
            .build()
    }
}

/// Locally cached copy of a user profile. Never used for authorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CachedProfile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl CachedProfile {
    /// Decode the cookie value; `None` when it is not a profile object
    pub fn parse(raw: &str) -> Option<Self> {
        let decoded = urlencoding::decode(raw).ok()?;
        serde_json::from_str(&decoded).ok()
    }
}

impl From<&AuthenticatedUser> for CachedProfile {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            email: Some(user.email.clone()),
            name: user.name.clone(),
            role: Some(user.role.to_string()),
        }
    }
}
