//! Authentication middleware for Axum
//!
//! Verifies the Bearer JWT, then checks the server-side session registry:
//! a token whose session was removed (logout, expiry sweep) gets a 401
//! even while its `exp` claim is still in the future.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::session::SharedSessionRegistry;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    SessionRevoked,
}

/// Authentication state shared by all protected routes
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub sessions: SharedSessionRegistry,
}

/// Authenticated staff information, inserted as a request extension
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub role: String,
    /// The token's `jti`; keys the session registry entry
    pub token_id: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
            token_id: claims.jti,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// JWT + session-registry authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(&auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                // drop the stale session entry right away
                auth_state.sessions.remove(&claims.jti);
                return auth_error_response(AuthError::ExpiredToken);
            }
            if !auth_state.sessions.is_active(&claims.jti) {
                return auth_error_response(AuthError::SessionRevoked);
            }
            let user = AuthenticatedUser::from_claims(claims);
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(_) => auth_error_response(AuthError::InvalidToken),
    }
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
        AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
        AuthError::SessionRevoked => (StatusCode::UNAUTHORIZED, "Session expired or revoked"),
    };

    let body = Json(json!({
        "success": false,
        "error": message
    }));

    (status, body).into_response()
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::session::{SessionRegistry, StaffSession};
    use crate::infrastructure::crypto::jwt::create_token;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::Router;
    use chrono::{Duration, Utc};

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "venue-booking".to_string(),
        }
    }

    fn app(state: AuthState) -> Router {
        Router::new()
            .route("/protected", get(|| async { "ok" }))
            .layer(from_fn_with_state(state, auth_middleware))
    }

    async fn send(router: Router, auth: Option<&str>) -> StatusCode {
        use tower::Service;
        let mut builder = Request::builder().method("GET").uri("/protected");
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        let req = builder.body(Body::empty()).unwrap();
        let mut svc = router.into_service();
        svc.call(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn missing_header_is_401() {
        let state = AuthState {
            jwt_config: jwt_config(),
            sessions: SessionRegistry::shared(),
        };
        assert_eq!(send(app(state), None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn registered_session_passes() {
        let sessions = SessionRegistry::shared();
        let config = jwt_config();
        let (token, claims) = create_token("u-1", "jordan", "staff", &config).unwrap();
        sessions.insert(
            claims.jti.clone(),
            StaffSession {
                user_id: "u-1".to_string(),
                username: "jordan".to_string(),
                role: "staff".to_string(),
                expires_at: Utc::now() + Duration::hours(1),
            },
        );
        let state = AuthState {
            jwt_config: config,
            sessions,
        };
        let bearer = format!("Bearer {token}");
        assert_eq!(send(app(state), Some(&bearer)).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn valid_token_without_session_is_rejected() {
        let config = jwt_config();
        let (token, _) = create_token("u-1", "jordan", "staff", &config).unwrap();
        let state = AuthState {
            jwt_config: config,
            sessions: SessionRegistry::shared(),
        };
        let bearer = format!("Bearer {token}");
        assert_eq!(
            send(app(state), Some(&bearer)).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let state = AuthState {
            jwt_config: jwt_config(),
            sessions: SessionRegistry::shared(),
        };
        assert_eq!(
            send(app(state), Some("Bearer not-a-token")).await,
            StatusCode::UNAUTHORIZED
        );
    }
}
