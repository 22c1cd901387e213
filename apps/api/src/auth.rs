//! JWT authentication module.
//!
//! Issues and verifies short-lived HS256 access tokens. Refresh tokens are
//! opaque database rows, see `services::auth_service`.
//!
//! ## Credential Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Authorization: Bearer <jwt>                                            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  extract_bearer_token ──► verify_access_token                           │
//! │                              │  signature, exp, token_type == "access"  │
//! │                              ▼                                          │
//! │                        CredentialEvidence { subject }                   │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                  AuthService::current_user ──► User                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ACCESS_TOKEN_TYPE: &str = "access";

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,

    /// Token type, always "access"
    pub token_type: String,
}

/// What a verified access token proves about the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialEvidence {
    /// The authenticated email.
    pub subject: String,
}

/// Token errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Expected an access token")]
    WrongTokenType,

    #[error("Missing bearer token")]
    MissingToken,
}

/// JWT token manager.
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: &[u8], access_lifetime_secs: i64) -> Self {
        JwtManager {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_lifetime_secs,
        }
    }

    pub fn access_lifetime_secs(&self) -> i64 {
        self.access_lifetime_secs
    }

    /// Issue an access token for `email`.
    pub fn issue_access_token(&self, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_lifetime_secs);

        let claims = Claims {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify an access token and return the evidence it carries.
    pub fn verify_access_token(&self, token: &str) -> Result<CredentialEvidence, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?
            .claims;

        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(AuthError::WrongTokenType);
        }

        Ok(CredentialEvidence {
            subject: claims.sub,
        })
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new(b"test-secret", 900);

        let token = manager.issue_access_token("ann@example.com").unwrap();
        let evidence = manager.verify_access_token(&token).unwrap();

        assert_eq!(evidence.subject, "ann@example.com");
    }

    #[test]
    fn test_token_ids_are_unique() {
        let manager = JwtManager::new(b"test-secret", 900);
        let key = DecodingKey::from_secret(b"test-secret");
        let validation = Validation::new(Algorithm::HS256);
        let jti = |token: String| decode::<Claims>(&token, &key, &validation).unwrap().claims.jti;

        let a = jti(manager.issue_access_token("a@x.io").unwrap());
        let b = jti(manager.issue_access_token("a@x.io").unwrap());
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let issuer = JwtManager::new(b"key-one", 900);
        let verifier = JwtManager::new(b"key-two", 900);

        let token = issuer.issue_access_token("ann@example.com").unwrap();
        assert!(matches!(
            verifier.verify_access_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Well past the default 60s leeway.
        let manager = JwtManager::new(b"test-secret", -600);

        let token = manager.issue_access_token("ann@example.com").unwrap();
        assert!(matches!(
            manager.verify_access_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_wrong_token_type() {
        let manager = JwtManager::new(b"test-secret", 900);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "ann@example.com".to_string(),
            iat: now,
            exp: now + 900,
            jti: "jti".to_string(),
            token_type: "refresh".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            manager.verify_access_token(&token),
            Err(AuthError::WrongTokenType)
        ));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("abc"), None);
    }
}
