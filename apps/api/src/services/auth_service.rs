//! Authentication service.
//!
//! Login, access token refresh, logout, and resolving verified credential
//! evidence back to a user.
//!
//! ## Refresh Token Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   login ──► Issued ──(refresh: new access token, same refresh token)─┐ │
//! │               │  ▲                                                    │ │
//! │               │  └────────────────────────────────────────────────────┘ │
//! │               │                                                         │
//! │               ├── lifetime elapsed ──► stops resolving                 │
//! │               │                                                         │
//! │               └── logout ──► Revoked (row deleted, terminal)           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngCore;
use tracing::{info, warn};

use bazaar_core::{RefreshToken, User};
use bazaar_db::Database;

use crate::auth::{CredentialEvidence, JwtManager};
use crate::error::{ApiError, ApiResult};
use crate::password::verify_password;

/// Bytes of entropy in a refresh token.
const REFRESH_TOKEN_BYTES: usize = 32;

/// Tokens handed out by a successful login.
#[derive(Debug, Clone)]
pub struct LoginTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    jwt: Arc<JwtManager>,
    refresh_lifetime: Duration,
}

impl AuthService {
    pub fn new(db: Database, jwt: Arc<JwtManager>, refresh_lifetime_secs: i64) -> Self {
        AuthService {
            db,
            jwt,
            refresh_lifetime: Duration::seconds(refresh_lifetime_secs),
        }
    }

    /// Exchange email and password for an access token and a refresh token.
    ///
    /// An unknown email and a wrong password are indistinguishable to the
    /// caller. Nothing is persisted on failure.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginTokens> {
        let user = self
            .db
            .users()
            .get_by_email(email)
            .await?
            .filter(|user| verify_password(password, &user.password_hash));

        let Some(user) = user else {
            warn!(email = %email, "Login failed");
            return Err(ApiError::InvalidCredentials);
        };

        let access_token = self.jwt.issue_access_token(&user.email)?;
        let refresh_token = self.issue_refresh_token(&user.email).await?;

        info!(email = %user.email, "Login succeeded");

        Ok(LoginTokens {
            access_token,
            refresh_token: refresh_token.token,
        })
    }

    /// Mint a new access token from a live refresh token.
    ///
    /// The refresh token itself is not rotated.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> ApiResult<String> {
        let record = self.resolve_refresh_token(refresh_token).await?;
        let access_token = self.jwt.issue_access_token(&record.user_email)?;

        info!(email = %record.user_email, "Access token refreshed");
        Ok(access_token)
    }

    /// Revoke a refresh token. Unknown tokens are rejected.
    pub async fn logout(&self, refresh_token: &str) -> ApiResult<()> {
        if !self.revoke_refresh_token(refresh_token).await? {
            return Err(ApiError::InvalidRefreshToken);
        }

        info!("Refresh token revoked");
        Ok(())
    }

    /// Generate and persist a refresh token for `email`.
    pub async fn issue_refresh_token(&self, email: &str) -> ApiResult<RefreshToken> {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);

        let token = RefreshToken {
            token: hex::encode(bytes),
            user_email: email.to_string(),
            issued_at: Utc::now(),
        };

        self.db
            .refresh_tokens()
            .insert(&token)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        Ok(token)
    }

    /// Look a refresh token up. Unknown and expired tokens are both invalid.
    pub async fn resolve_refresh_token(&self, token: &str) -> ApiResult<RefreshToken> {
        let record = self
            .db
            .refresh_tokens()
            .get(token)
            .await?
            .ok_or(ApiError::InvalidRefreshToken)?;

        if record.is_expired(Utc::now(), self.refresh_lifetime) {
            warn!(email = %record.user_email, "Expired refresh token presented");
            return Err(ApiError::InvalidRefreshToken);
        }

        Ok(record)
    }

    /// Delete a refresh token. Returns whether it existed.
    pub async fn revoke_refresh_token(&self, token: &str) -> ApiResult<bool> {
        Ok(self.db.refresh_tokens().delete(token).await?)
    }

    /// The user a verified access token speaks for.
    pub async fn current_user(&self, evidence: &CredentialEvidence) -> ApiResult<User> {
        self.db
            .users()
            .get_by_email(&evidence.subject)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Verify a bearer token.
    pub fn verify_access_token(&self, token: &str) -> ApiResult<CredentialEvidence> {
        Ok(self.jwt.verify_access_token(token)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;

    fn service(db: &Database, refresh_lifetime_secs: i64) -> AuthService {
        let jwt = Arc::new(JwtManager::new(b"test-key", 900));
        AuthService::new(db.clone(), jwt, refresh_lifetime_secs)
    }

    #[tokio::test]
    async fn test_login_issues_both_tokens() {
        let db = testing::db().await;
        testing::user(&db, "ann@example.com", "correct horse", 0).await;
        let auth = service(&db, 3600);

        let tokens = auth.login("ann@example.com", "correct horse").await.unwrap();
        assert_eq!(tokens.refresh_token.len(), REFRESH_TOKEN_BYTES * 2);

        let evidence = auth.verify_access_token(&tokens.access_token).unwrap();
        assert_eq!(evidence.subject, "ann@example.com");

        let user = auth.current_user(&evidence).await.unwrap();
        assert_eq!(user.email, "ann@example.com");
    }

    #[tokio::test]
    async fn test_wrong_password_stores_nothing() {
        let db = testing::db().await;
        testing::user(&db, "ann@example.com", "correct horse", 0).await;
        let auth = service(&db, 3600);

        let err = auth.login("ann@example.com", "wrong horse").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));

        let err = auth.login("bob@example.com", "correct horse").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));

        let stored = db.refresh_tokens().count_for_user("ann@example.com").await.unwrap();
        assert_eq!(stored, 0);
    }

    #[tokio::test]
    async fn test_refresh_resolves_repeatedly_until_logout() {
        let db = testing::db().await;
        testing::user(&db, "ann@example.com", "correct horse", 0).await;
        let auth = service(&db, 3600);
        let tokens = auth.login("ann@example.com", "correct horse").await.unwrap();

        let first = auth.resolve_refresh_token(&tokens.refresh_token).await.unwrap();
        let second = auth.resolve_refresh_token(&tokens.refresh_token).await.unwrap();
        assert_eq!(first.user_email, second.user_email);

        let access = auth.refresh_access_token(&tokens.refresh_token).await.unwrap();
        assert_eq!(
            auth.verify_access_token(&access).unwrap().subject,
            "ann@example.com"
        );

        auth.logout(&tokens.refresh_token).await.unwrap();
        assert!(matches!(
            auth.refresh_access_token(&tokens.refresh_token).await,
            Err(ApiError::InvalidRefreshToken)
        ));
        assert!(matches!(
            auth.logout(&tokens.refresh_token).await,
            Err(ApiError::InvalidRefreshToken)
        ));
        assert!(!auth.revoke_refresh_token(&tokens.refresh_token).await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_refresh_token_is_invalid() {
        let db = testing::db().await;
        testing::user(&db, "ann@example.com", "correct horse", 0).await;
        let auth = service(&db, 0);

        let token = auth.issue_refresh_token("ann@example.com").await.unwrap();
        assert!(matches!(
            auth.resolve_refresh_token(&token.token).await,
            Err(ApiError::InvalidRefreshToken)
        ));
    }

    #[tokio::test]
    async fn test_current_user_for_deleted_subject() {
        let db = testing::db().await;
        let auth = service(&db, 3600);
        let evidence = CredentialEvidence {
            subject: "ghost@example.com".to_string(),
        };
        assert!(matches!(
            auth.current_user(&evidence).await,
            Err(ApiError::NotFound(_))
        ));
    }
}
