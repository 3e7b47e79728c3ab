//! Authentication HTTP handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{Duration, Utc};

use crate::application::session::{SharedSessionRegistry, StaffSession};
use crate::domain::user::{User, UserRepository, UserRole};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::*;

/// Application state for authentication handlers
#[derive(Clone)]
pub struct AuthAppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub jwt_config: JwtConfig,
    pub sessions: SharedSessionRegistry,
}

fn user_info(user: &User) -> UserInfo {
    UserInfo {
        id: user.id.clone(),
        username: user.username.clone(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
    }
}

/// Log in with username/email and password
///
/// Issues a JWT and registers a server-side session for it. Invalid
/// credentials and disabled accounts both return 401 with distinct
/// messages; repeated attempts are rate limited per client.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated; returns a JWT", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials or disabled account"),
        (status = 429, description = "Too many attempts")
    )
)]
pub async fn login(
    State(state): State<AuthAppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let user = state
        .repos
        .users()
        .find_by_username_or_email(&request.username)
        .await
        .map_err(domain_error_response)?;

    let Some(user) = user else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid credentials")),
        ));
    };

    if !user.is_active {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Account is disabled")),
        ));
    }

    let password_valid = verify_password(&request.password, &user.password_hash).unwrap_or(false);
    if !password_valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid credentials")),
        ));
    }

    state
        .repos
        .users()
        .touch_last_login(&user.id, Utc::now())
        .await
        .ok();

    let (token, claims) = create_token(
        &user.id,
        &user.username,
        user.role.as_str(),
        &state.jwt_config,
    )
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let expires_at = Utc::now() + Duration::hours(state.jwt_config.expiration_hours);
    state.sessions.insert(
        claims.jti.clone(),
        StaffSession {
            user_id: user.id.clone(),
            username: user.username.clone(),
            role: user.role.as_str().to_string(),
            expires_at,
        },
    );

    let response = LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        session_expires_at: expires_at.timestamp(),
        user: user_info(&user),
    };

    Ok(Json(ApiResponse::success(response)))
}

/// Register a new user
///
/// New accounts get the `viewer` role. Username and email must be
/// unique.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserInfo>),
        (status = 409, description = "Username or email already exists"),
        (status = 422, description = "Validation failure")
    )
)]
pub async fn register(
    State(state): State<AuthAppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), (StatusCode, Json<ApiResponse<UserInfo>>)> {
    for taken in [&request.username, &request.email] {
        let existing = state
            .repos
            .users()
            .find_by_username_or_email(taken)
            .await
            .map_err(domain_error_response)?;
        if existing.is_some() {
            return Err((
                StatusCode::CONFLICT,
                Json(ApiResponse::error("Username or email already exists")),
            ));
        }
    }

    let password_hash = hash_password(&request.password).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let now = Utc::now();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: request.username,
        email: request.email,
        password_hash,
        role: UserRole::Viewer,
        is_active: true,
        created_at: now,
        updated_at: now,
        last_login_at: None,
    };

    state
        .repos
        .users()
        .insert(user.clone())
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(user_info(&user))),
    ))
}

/// Log out: revoke the current session
///
/// The JWT stops working immediately, regardless of its `exp` claim.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session revoked"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<AuthAppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<ApiResponse<()>> {
    state.sessions.remove(&user.token_id);
    Json(ApiResponse::success(()))
}

/// Current user details
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthAppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserInfo>>, (StatusCode, Json<ApiResponse<UserInfo>>)> {
    let db_user = state
        .repos
        .users()
        .find_by_id(&user.user_id)
        .await
        .map_err(domain_error_response)?;

    let Some(db_user) = db_user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ));
    };

    Ok(Json(ApiResponse::success(user_info(&db_user))))
}

/// Change the current user's password
#[utoipa::path(
    put,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Wrong current password or not authenticated"),
        (status = 422, description = "New password too short")
    )
)]
pub async fn change_password(
    State(state): State<AuthAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    let db_user = state
        .repos
        .users()
        .find_by_id(&user.user_id)
        .await
        .map_err(domain_error_response)?;

    let Some(db_user) = db_user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ));
    };

    let password_valid =
        verify_password(&request.current_password, &db_user.password_hash).unwrap_or(false);
    if !password_valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid current password")),
        ));
    }

    let new_hash = hash_password(&request.new_password).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let updated = User {
        password_hash: new_hash,
        updated_at: Utc::now(),
        ..db_user
    };
    state
        .repos
        .users()
        .update(updated)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(())))
}
