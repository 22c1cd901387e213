//! # Store Repository
//!
//! Database operations for storefronts. `owner_email` is UNIQUE, so a second
//! insert for the same owner fails with `DbError::UniqueViolation`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bazaar_core::Store;

const STORE_COLUMNS: &str = "id, owner_email, name, created_at, updated_at";

/// Repository for store database operations.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Inserts a new store.
    pub async fn insert(&self, store: &Store) -> DbResult<Store> {
        debug!(owner = %store.owner_email, "Inserting store");

        sqlx::query(
            r#"
            INSERT INTO stores (id, owner_email, name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&store.id)
        .bind(&store.owner_email)
        .bind(&store.name)
        .bind(store.created_at)
        .bind(store.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(store.clone())
    }

    /// Gets a store by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Gets the store owned by `email`, if any.
    pub async fn get_by_owner(&self, email: &str) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE owner_email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Lists all stores ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Store>> {
        let stores = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores ORDER BY name, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    /// Renames a store and returns the fresh row.
    pub async fn rename(&self, id: &str, name: &str) -> DbResult<Store> {
        debug!(id = %id, "Renaming store");

        let store = sqlx::query_as::<_, Store>(&format!(
            r#"
            UPDATE stores SET name = ?2, updated_at = ?3
            WHERE id = ?1
            RETURNING {STORE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        store.ok_or_else(|| DbError::not_found("Store", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{fixtures, generate_id};

    #[tokio::test]
    async fn test_get_by_owner_and_id() {
        let db = fixtures::db().await;
        fixtures::user(&db, "ann@example.com", 0).await;
        let store = fixtures::store(&db, "ann@example.com").await;

        let by_owner = db.stores().get_by_owner("ann@example.com").await.unwrap().unwrap();
        assert_eq!(by_owner.id, store.id);

        let by_id = db.stores().get_by_id(&store.id).await.unwrap().unwrap();
        assert_eq!(by_id.owner_email, "ann@example.com");

        assert!(db.stores().get_by_owner("bob@example.com").await.unwrap().is_none());
        assert!(db.stores().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_store_for_owner_is_rejected() {
        let db = fixtures::db().await;
        fixtures::user(&db, "ann@example.com", 0).await;
        let first = fixtures::store(&db, "ann@example.com").await;

        let second = Store {
            id: generate_id(),
            ..first
        };
        let err = db.stores().insert(&second).await.unwrap_err();
        assert!(err.is_unique_violation(), "got {err:?}");
    }

    #[tokio::test]
    async fn test_store_requires_existing_owner() {
        let db = fixtures::db().await;
        let now = Utc::now();
        let orphan = Store {
            id: generate_id(),
            owner_email: "ghost@example.com".to_string(),
            name: "Ghost Shop".to_string(),
            created_at: now,
            updated_at: now,
        };

        let err = db.stores().insert(&orphan).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_rename() {
        let db = fixtures::db().await;
        fixtures::user(&db, "ann@example.com", 0).await;
        let store = fixtures::store(&db, "ann@example.com").await;

        let renamed = db.stores().rename(&store.id, "Ann's Lamps").await.unwrap();
        assert_eq!(renamed.name, "Ann's Lamps");
        assert_eq!(db.stores().list().await.unwrap().len(), 1);

        assert!(matches!(
            db.stores().rename("missing", "x").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
