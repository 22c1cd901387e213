//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Catalog reads and owner edits (pool, single statement)
//! - Guarded stock decrement (unit of work, used by purchases)
//!
//! ## Stock Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  ❌ WRONG: write back a value computed from an earlier read        │
//! │     UPDATE products SET stock = 2 WHERE id = ?                     │
//! │                                                                     │
//! │  ✅ CORRECT: relative, guarded update                              │
//! │     UPDATE products SET stock = stock - 3                          │
//! │     WHERE id = ? AND stock >= 3                                    │
//! │                                                                     │
//! │  Buyer A: buys 3 of 5 → stock 2                                    │
//! │  Buyer B: buys 3, guard fails → 0 rows, rolled back                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::unit_of_work::UnitOfWork;
use bazaar_core::Product;

const PRODUCT_COLUMNS: &str =
    "id, store_id, name, description, price, stock, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.get_by_id("uuid-here").await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists all products, newest first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Store doesn't exist
    /// * `Err(DbError::CheckViolation)` - Non-positive price or negative stock
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, store_id = %product.store_id, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, store_id, name, description, price, stock, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.store_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Updates the editable fields of an existing product.
    ///
    /// `store_id` and `created_at` are never changed; `updated_at` is set
    /// to now. Returns the fresh row.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, "Updating product");

        let updated = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price = ?4,
                stock = ?5,
                updated_at = ?6
            WHERE id = ?1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| DbError::not_found("Product", &product.id))
    }

    /// Takes `quantity` units out of stock inside a unit of work.
    ///
    /// Returns `false`, leaving the row untouched, when the product does not
    /// exist or holds fewer than `quantity` units.
    pub async fn decrement_stock(
        &self,
        uow: &mut UnitOfWork,
        id: &str,
        quantity: i64,
    ) -> DbResult<bool> {
        debug!(id = %id, quantity = quantity, "Decrementing stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - ?2, updated_at = ?3
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(uow.conn())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Counts products (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;
    use bazaar_core::Money;

    #[tokio::test]
    async fn test_insert_and_get_by_id() {
        let db = fixtures::db().await;
        fixtures::user(&db, "ann@example.com", 0).await;
        let store = fixtures::store(&db, "ann@example.com").await;
        let product = fixtures::product(&db, &store.id, 300, 5).await;

        let found = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(found.price, Money::from_cents(300));
        assert_eq!(found.stock, 5);
        assert_eq!(found.store_id, store.id);

        assert!(db.products().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_check_constraints() {
        let db = fixtures::db().await;
        fixtures::user(&db, "ann@example.com", 0).await;
        let store = fixtures::store(&db, "ann@example.com").await;
        let product = fixtures::product(&db, &store.id, 300, 5).await;

        let negative = Product {
            stock: -1,
            ..product.clone()
        };
        let err = db.products().update(&negative).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }), "got {err:?}");

        let free = Product {
            id: crate::repository::generate_id(),
            price: Money::zero(),
            ..product
        };
        let err = db.products().insert(&free).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_update_keeps_store() {
        let db = fixtures::db().await;
        fixtures::user(&db, "ann@example.com", 0).await;
        let store = fixtures::store(&db, "ann@example.com").await;
        let product = fixtures::product(&db, &store.id, 300, 5).await;

        let edited = Product {
            name: "Floor Lamp".to_string(),
            price: Money::from_cents(450),
            stock: 9,
            store_id: "someone-else".to_string(),
            ..product.clone()
        };
        let updated = db.products().update(&edited).await.unwrap();
        assert_eq!(updated.name, "Floor Lamp");
        assert_eq!(updated.price, Money::from_cents(450));
        assert_eq!(updated.stock, 9);
        assert_eq!(updated.store_id, store.id);

        let missing = Product {
            id: "missing".to_string(),
            ..product
        };
        assert!(matches!(
            db.products().update(&missing).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_decrement_stock_is_guarded() {
        let db = fixtures::db().await;
        fixtures::user(&db, "ann@example.com", 0).await;
        let store = fixtures::store(&db, "ann@example.com").await;
        let product = fixtures::product(&db, &store.id, 300, 5).await;
        let products = db.products();

        let mut uow = db.begin().await.unwrap();
        assert!(products.decrement_stock(&mut uow, &product.id, 3).await.unwrap());
        assert!(!products.decrement_stock(&mut uow, &product.id, 3).await.unwrap());
        assert!(!products.decrement_stock(&mut uow, "missing", 1).await.unwrap());
        uow.commit().await.unwrap();

        let after = products.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 2);
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let db = fixtures::db().await;
        fixtures::user(&db, "ann@example.com", 0).await;
        let store = fixtures::store(&db, "ann@example.com").await;
        fixtures::product(&db, &store.id, 100, 1).await;
        fixtures::product(&db, &store.id, 200, 2).await;

        assert_eq!(db.products().list().await.unwrap().len(), 2);
        assert_eq!(db.products().count().await.unwrap(), 2);
    }
}
