//! # Ledger Repository
//!
//! The purchase ledger (`transactions` table). Rows are only ever inserted,
//! and only inside the unit of work that also moves the stock and balance.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::unit_of_work::UnitOfWork;
use bazaar_core::Transaction;

const LEDGER_COLUMNS: &str = "id, product_id, user_email, quantity, total_price, created_at";

/// Repository for purchase ledger entries.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Appends an entry inside a unit of work.
    pub async fn insert(&self, uow: &mut UnitOfWork, entry: &Transaction) -> DbResult<()> {
        debug!(
            id = %entry.id,
            product_id = %entry.product_id,
            email = %entry.user_email,
            "Recording purchase"
        );

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, product_id, user_email, quantity, total_price, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.product_id)
        .bind(&entry.user_email)
        .bind(entry.quantity)
        .bind(entry.total_price)
        .bind(entry.created_at)
        .execute(uow.conn())
        .await?;

        Ok(())
    }

    /// Gets an entry by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let entry = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {LEDGER_COLUMNS} FROM transactions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Lists a buyer's entries, newest first.
    pub async fn list_by_user(&self, email: &str) -> DbResult<Vec<Transaction>> {
        let entries = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            SELECT {LEDGER_COLUMNS} FROM transactions
            WHERE user_email = ?1
            ORDER BY created_at DESC, id
            "#
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Counts all entries.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
