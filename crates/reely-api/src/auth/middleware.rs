//! JWT bearer authentication middleware.
//!
//! Tokens are HS256-signed with the configured secret. The middleware
//! verifies the token and stores an [`AuthUser`] in request extensions;
//! handlers extract it via `FromRequestParts`.

use crate::auth::models::{AuthClaims, AuthUser};
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use reely_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: String,
}

/// Issue an HS256 bearer token for `user_id`, valid for `expiry_hours`.
pub fn issue_token(user_id: Uuid, secret: &str, expiry_hours: i64) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let claims = AuthClaims {
        sub: user_id,
        exp: (now + chrono::Duration::hours(expiry_hours)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

/// Verify a bearer token and return its claims. Expired or tampered
/// tokens are an authentication error, never an internal one.
pub fn verify_token(token: &str, secret: &str) -> Result<AuthClaims, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<AuthClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid bearer token: {}", e)))
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    };

    match verify_token(token.trim(), &auth_state.jwt_secret) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthUser {
                user_id: claims.sub,
            });
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            HttpAppError(e).into_response()
        }
    }
}
