//! Session token signing and verification
//!
//! The session token is an HS256 JWT carrying only the user id. Callers
//! treat it as opaque; identity and role come from the user directory.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: String, max_age: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + max_age).timestamp(),
        }
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies session tokens with a single HMAC secret
#[derive(Clone)]
pub struct SessionSigner {
    keys: Arc<Keys>,
    max_age: Duration,
}

impl SessionSigner {
    pub fn new(secret: &str, max_age_secs: i64) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            max_age: Duration::seconds(max_age_secs),
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Issue a token for a user with the configured lifetime
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        self.sign(&Claims::new(user_id.to_string(), self.max_age))
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.keys.encoding).map_err(|e| {
            warn!("Failed to encode session token: {}", e);
            AuthError::TokenCreation
        })
    }

    /// Verify and decode token
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| {
                debug!("Session token verification failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })?;

        let claims = token_data.claims;

        if claims.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing credentials")]
    MissingCredentials,
    #[error("Token creation failed")]
    TokenCreation,
    #[error("Missing session token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Unknown user: {0}")]
    UnknownUser(String),
    #[error("User {0} has no routable role")]
    UnknownRole(String),
    #[error("Password hashing failed")]
    PasswordHash,
    #[error("User directory error: {0}")]
    Directory(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email or password",
            ),
            AuthError::MissingCredentials => (
                StatusCode::BAD_REQUEST,
                "missing_credentials",
                "Email and password are required",
            ),
            AuthError::TokenCreation | AuthError::PasswordHash => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_creation_failed",
                "Failed to create session",
            ),
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::UnknownUser(_)
            | AuthError::UnknownRole(_) => (
                StatusCode::UNAUTHORIZED,
                "invalid_session",
                "Session is missing or invalid",
            ),
            AuthError::Directory(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "directory_unavailable",
                "User directory is unavailable",
            ),
        };

        let body = Json(json!({
            "error": error_code,
            "message": message,
        }));

        (status, body).into_response()
    }
}
