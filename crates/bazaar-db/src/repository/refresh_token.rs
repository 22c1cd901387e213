//! # Refresh Token Repository
//!
//! Persistence for opaque refresh tokens. A row exists from login until
//! logout; expiry is judged by the caller from `issued_at`.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use bazaar_core::RefreshToken;

/// Repository for refresh tokens.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    pool: SqlitePool,
}

impl RefreshTokenRepository {
    /// Creates a new RefreshTokenRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RefreshTokenRepository { pool }
    }

    /// Stores a freshly issued token.
    pub async fn insert(&self, token: &RefreshToken) -> DbResult<()> {
        debug!(email = %token.user_email, "Storing refresh token");

        sqlx::query(
            "INSERT INTO refresh_tokens (token, user_email, issued_at) VALUES (?1, ?2, ?3)",
        )
        .bind(&token.token)
        .bind(&token.user_email)
        .bind(token.issued_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Looks a token up by its value.
    pub async fn get(&self, token: &str) -> DbResult<Option<RefreshToken>> {
        let found = sqlx::query_as::<_, RefreshToken>(
            "SELECT token, user_email, issued_at FROM refresh_tokens WHERE token = ?1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found)
    }

    /// Deletes a token. Returns whether a row was removed.
    pub async fn delete(&self, token: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token = ?1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        debug!(removed = result.rows_affected(), "Deleted refresh token");
        Ok(result.rows_affected() > 0)
    }

    /// Counts live rows for a user.
    pub async fn count_for_user(&self, email: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens WHERE user_email = ?1")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
