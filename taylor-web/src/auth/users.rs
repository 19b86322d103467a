//! User directory and password hashing

use super::jwt::AuthError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use taylor_core::{AuthenticatedUser, Role};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// A user as stored in the directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Raw role string; anything other than ADMIN, MENTOR or MEMBER is unroutable
    #[serde(default)]
    pub role: Option<String>,
    /// Argon2 PHC string
    #[serde(default)]
    pub password_hash: Option<String>,
}

impl UserRecord {
    pub fn new(email: impl Into<String>, name: Option<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            name,
            role: Some(role.to_string()),
            password_hash: None,
        }
    }

    pub fn with_password(mut self, password: &str) -> Result<Self, AuthError> {
        self.password_hash = Some(hash_password(password)?);
        Ok(self)
    }

    /// Verify password; users without a hash cannot log in with one
    pub fn verify_password(&self, password: &str) -> bool {
        self.password_hash
            .as_deref()
            .map(|hash| verify_password(password, hash).unwrap_or(false))
            .unwrap_or(false)
    }

    /// Identity snapshot for this request
    pub fn to_authenticated(&self) -> Result<AuthenticatedUser, AuthError> {
        let role = self
            .role
            .as_deref()
            .and_then(Role::parse)
            .ok_or_else(|| AuthError::UnknownRole(self.id.clone()))?;

        Ok(AuthenticatedUser {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role,
        })
    }
}

/// Resolves user ids and emails to directory records
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError>;
}

/// Entry of the users seed file. Plain `password` values are hashed on load.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserSeed {
    id: Option<String>,
    email: String,
    name: Option<String>,
    role: Option<String>,
    password: Option<String>,
    password_hash: Option<String>,
}

/// In-memory user directory
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// Load users from a JSON array seed file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AuthError::Directory(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let seeds: Vec<UserSeed> = serde_json::from_str(&content).map_err(|e| {
            AuthError::Directory(format!("Invalid users file {}: {}", path.display(), e))
        })?;

        let mut records = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let password_hash = match (seed.password_hash, seed.password) {
                (Some(hash), _) => Some(hash),
                (None, Some(password)) => Some(hash_password(&password)?),
                (None, None) => None,
            };

            if seed.role.as_deref().and_then(Role::parse).is_none() {
                warn!("User {} has no routable role and cannot sign in", seed.email);
            }

            records.push(UserRecord {
                id: seed.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                email: seed.email,
                name: seed.name,
                role: seed.role,
                password_hash,
            });
        }

        info!("Loaded {} user(s) from {}", records.len(), path.display());
        Ok(Self::from_records(records))
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let email = email.trim();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

/// Hash password using Argon2
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            warn!("Failed to hash password: {}", e);
            AuthError::PasswordHash
        })
}

/// Verify password against hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| {
        warn!("Failed to parse password hash: {}", e);
        AuthError::InvalidCredentials
    })?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
