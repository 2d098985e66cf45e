//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` while the process is serving.
    pub status: String,
}

// ==================== Authentication ====================

/// Form-encoded token request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Access token response.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Signed JWT.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
}
