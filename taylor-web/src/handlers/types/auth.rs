//! Auth request and response types

use serde::{Deserialize, Serialize};
use taylor_core::AuthenticatedUser;
use utoipa::ToSchema;

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "member@taylor-made.example")]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Signed-in user plus the dashboard the client should navigate to
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: AuthenticatedUser,
    #[schema(example = "/dashboard/member")]
    pub redirect: String,
}

/// Externally issued session token
#[derive(Debug, Deserialize, ToSchema)]
pub struct SessionRequest {
    pub token: Option<String>,
}
