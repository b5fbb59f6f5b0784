//! User JWT authentication extractor.
//!
//! Tokens are read from the `Authorization: Bearer` header first and fall
//! back to the `access_token` cookie set by the identity service.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use shared::jwt::{JwtError, Role};

use crate::app::AppState;
use crate::error::ApiError;

/// Name of the cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authenticated caller, taken from the token's `sub` and `role` claims.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user_id: String,
    pub role: Role,
    /// JWT ID (jti), logged for session tracing.
    pub jti: String,
}

fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    let Some(value) = headers.get("Authorization") else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(ApiError::Unauthorized(
            "Invalid Authorization header format".to_string(),
        )),
    }
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(&parts.headers)? {
            Some(token) => token,
            None => cookie_token(&parts.headers)
                .ok_or_else(|| ApiError::Unauthorized("Missing access token".to_string()))?,
        };

        let claims = state.jwt.validate_token(&token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            match e {
                JwtError::TokenExpired => ApiError::Unauthorized("Token has expired".to_string()),
                _ => ApiError::Unauthorized("Invalid or expired token".to_string()),
            }
        })?;

        Ok(UserAuth {
            user_id: claims.sub,
            role: claims.role,
            jti: claims.jti,
        })
    }
}
