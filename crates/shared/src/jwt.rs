//! JWT access token utilities using the HS256 algorithm.
//!
//! Tokens are issued by the identity service with a shared secret; this
//! module validates them and exposes the subject and role claims.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Role carried in the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// JWT token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    pub jti: String,
    /// Role of the subject at issuance time
    pub role: Role,
}

/// Configuration for JWT token validation.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Access token expiration in seconds, used when issuing tokens
    pub access_token_expiry_secs: i64,
    /// Leeway in seconds for clock skew tolerance
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Default access token lifetime (15 minutes)
pub const DEFAULT_ACCESS_TOKEN_EXPIRY_SECS: i64 = 900;

impl JwtConfig {
    /// Creates a JwtConfig from a shared HMAC secret.
    pub fn new(secret: &str, leeway_secs: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidKey("secret must not be empty".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry_secs: DEFAULT_ACCESS_TOKEN_EXPIRY_SECS,
            leeway_secs,
        })
    }

    /// Issues an access token for the given user.
    ///
    /// Token issuance belongs to the identity service; this exists so that
    /// tooling and tests can mint tokens signed with the same secret.
    pub fn generate_access_token(
        &self,
        user_id: &str,
        role: Role,
    ) -> Result<(String, String), JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(self.access_token_expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: jti.clone(),
            role,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok((token, jti))
    }

    /// Validates a token and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(JwtError::InvalidToken);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> JwtConfig {
        JwtConfig::new("test_secret_key_for_jwt_testing_12345", 0).unwrap()
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            JwtConfig::new("", 0),
            Err(JwtError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = create_test_config();

        let (token, jti) = config.generate_access_token("user-1", Role::Admin).unwrap();
        let claims = config.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.jti, jti);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let config = create_test_config();
        let other = JwtConfig::new("another_secret_entirely", 0).unwrap();

        let (token, _) = other.generate_access_token("user-1", Role::User).unwrap();
        let result = config.validate_token(&token);

        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_expired_token() {
        let mut config = create_test_config();
        config.access_token_expiry_secs = -120;

        let (token, _) = config.generate_access_token("user-1", Role::User).unwrap();
        let result = config.validate_token(&token);

        assert!(
            matches!(result, Err(JwtError::TokenExpired)),
            "Expected TokenExpired, got: {:?}",
            result
        );
    }

    #[test]
    fn test_malformed_token() {
        let config = create_test_config();
        assert!(config.validate_token("not_a_jwt").is_err());
    }

    #[test]
    fn test_unique_jti_per_token() {
        let config = create_test_config();

        let (_, jti1) = config.generate_access_token("user-1", Role::User).unwrap();
        let (_, jti2) = config.generate_access_token("user-1", Role::User).unwrap();

        assert_ne!(jti1, jti2);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = create_test_config();
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test_secret_key"));
    }
}
