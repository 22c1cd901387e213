//! # User Repository
//!
//! Database operations for accounts.
//!
//! ## Balance Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The balance column is only ever changed by a guarded debit inside a   │
//! │  unit of work:                                                          │
//! │                                                                         │
//! │    UPDATE users SET balance = balance - :cost                          │
//! │    WHERE email = :email AND balance >= :cost                           │
//! │                                                                         │
//! │  0 rows affected → the balance no longer covers the cost (or the       │
//! │  user is gone). The caller rolls back.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::unit_of_work::UnitOfWork;
use bazaar_core::{Money, User};

const USER_COLUMNS: &str =
    "email, first_name, last_name, password_hash, balance, created_at, updated_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn insert(&self, user: &User) -> DbResult<User> {
        debug!(email = %user.email, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (
                email, first_name, last_name, password_hash, balance, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.balance)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user.clone())
    }

    /// Gets a user by email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all users ordered by email.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY email"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Updates a user's display names and returns the fresh row.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No user with that email
    pub async fn update_names(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> DbResult<User> {
        debug!(email = %email, "Updating user names");

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET first_name = ?2, last_name = ?3, updated_at = ?4
            WHERE email = ?1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| DbError::not_found("User", email))
    }

    /// Debits `amount` from a balance inside a unit of work.
    ///
    /// Returns `false`, leaving the row untouched, when the user does not
    /// exist or the balance is below `amount`.
    pub async fn debit_balance(
        &self,
        uow: &mut UnitOfWork,
        email: &str,
        amount: Money,
    ) -> DbResult<bool> {
        debug!(email = %email, amount = %amount, "Debiting balance");

        let result = sqlx::query(
            r#"
            UPDATE users
            SET balance = balance - ?2, updated_at = ?3
            WHERE email = ?1 AND balance >= ?2
            "#,
        )
        .bind(email)
        .bind(amount)
        .bind(Utc::now())
        .execute(uow.conn())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Counts users (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
