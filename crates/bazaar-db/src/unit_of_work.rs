//! # Unit of Work
//!
//! A scoped database transaction for writes that must land together.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  db.begin() ──► UnitOfWork ──┬──► commit()    all writes visible       │
//! │                              ├──► rollback()  no writes visible        │
//! │                              └──► drop        same as rollback         │
//! │                                                                         │
//! │  Repository methods that take `&mut UnitOfWork` run on the             │
//! │  transaction's connection; everything else uses the pool.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// An open database transaction.
///
/// Owns its pooled connection; the connection goes back to the pool on
/// commit, rollback or drop.
pub struct UnitOfWork {
    tx: sqlx::Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    pub(crate) async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let tx = pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        debug!("Unit of work started");
        Ok(UnitOfWork { tx })
    }

    /// The transaction's connection, for repository statements.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut *self.tx
    }

    /// Makes every write in this unit visible atomically.
    pub async fn commit(self) -> DbResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        debug!("Unit of work committed");
        Ok(())
    }

    /// Discards every write in this unit.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        debug!("Unit of work rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    async fn count_users(db: &Database) -> i64 {
        db.users().count().await.unwrap()
    }

    async fn insert_raw_user(uow: &mut super::UnitOfWork, email: &str) {
        sqlx::query(
            "INSERT INTO users (email, first_name, last_name, password_hash, balance, created_at, updated_at)
             VALUES (?1, 'A', 'B', 'x', 0, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .bind(email)
        .execute(uow.conn())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_commit_makes_writes_visible() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut uow = db.begin().await.unwrap();
        insert_raw_user(&mut uow, "ann@example.com").await;
        uow.commit().await.unwrap();

        assert_eq!(count_users(&db).await, 1);
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut uow = db.begin().await.unwrap();
        insert_raw_user(&mut uow, "ann@example.com").await;
        uow.rollback().await.unwrap();

        assert_eq!(count_users(&db).await, 0);
    }

    #[tokio::test]
    async fn test_drop_discards_writes() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        {
            let mut uow = db.begin().await.unwrap();
            insert_raw_user(&mut uow, "ann@example.com").await;
        }

        assert_eq!(count_users(&db).await, 0);
    }
}
