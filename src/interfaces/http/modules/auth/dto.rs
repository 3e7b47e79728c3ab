//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "username": "admin",
    "password": "secret123"
}))]
pub struct LoginRequest {
    /// Username or email
    #[validate(length(min = 1, max = 200))]
    pub username: String,
    #[validate(length(min = 1, max = 200))]
    pub password: String,
}

/// Successful login response.
///
/// The token goes into the `Authorization: Bearer <token>` header on
/// subsequent requests.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    /// Unix timestamp after which the session is invalid
    pub session_expires_at: i64,
    pub user: UserInfo,
}

/// User details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    /// `admin`, `staff` or `viewer`
    pub role: String,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Unique username, 3-50 characters
    #[validate(length(min = 3, max = 50, message = "must be 3-50 characters"))]
    pub username: String,
    /// Unique email address
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    /// At least 8 characters
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

/// Password change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    /// Current password, for confirmation
    #[validate(length(min = 1))]
    pub current_password: String,
    /// New password, at least 8 characters
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub new_password: String,
}
