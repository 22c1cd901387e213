//! Catalog service.
//!
//! Anyone may browse; only a store owner may list products, and only in their
//! own store.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use bazaar_core::{Product, ProductDraft};
use bazaar_db::repository::generate_id;
use bazaar_db::Database;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone)]
pub struct ProductService {
    db: Database,
}

impl ProductService {
    pub fn new(db: Database) -> Self {
        ProductService { db }
    }

    pub async fn list(&self) -> ApiResult<Vec<Product>> {
        Ok(self.db.products().list().await?)
    }

    /// Fetch a product. Malformed ids are treated like unknown ones.
    pub async fn get(&self, id: &str) -> ApiResult<Product> {
        let not_found = || ApiError::NotFound("Product not found".to_string());

        if Uuid::parse_str(id).is_err() {
            return Err(not_found());
        }

        self.db.products().get_by_id(id).await?.ok_or_else(not_found)
    }

    /// List a product in the caller's store.
    pub async fn create(&self, owner_email: &str, draft: ProductDraft) -> ApiResult<Product> {
        draft.validate()?;

        let store = self
            .db
            .stores()
            .get_by_owner(owner_email)
            .await?
            .ok_or_else(|| ApiError::BadRequest("You don't have a store".to_string()))?;

        let now = Utc::now();
        let product = Product {
            id: generate_id(),
            store_id: store.id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            stock: draft.stock,
            created_at: now,
            updated_at: now,
        };

        let product = self.db.products().insert(&product).await?;

        info!(product_id = %product.id, store_id = %product.store_id, "Product created");
        Ok(product)
    }

    /// Replace a product's editable fields. Only the owning store may do this.
    pub async fn update(
        &self,
        owner_email: &str,
        id: &str,
        draft: ProductDraft,
    ) -> ApiResult<Product> {
        draft.validate()?;

        let product = self.get(id).await?;
        let owns = self
            .db
            .stores()
            .get_by_owner(owner_email)
            .await?
            .is_some_and(|store| product.is_listed_by(&store));

        if !owns {
            return Err(ApiError::Forbidden("You don't own this product".to_string()));
        }

        let edited = Product {
            name: draft.name,
            description: draft.description,
            price: draft.price,
            stock: draft.stock,
            ..product
        };
        let product = self.db.products().update(&edited).await?;

        info!(product_id = %product.id, "Product updated");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;
    use bazaar_core::Money;

    fn draft(name: &str, price: i64, stock: i64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: String::new(),
            price: Money::from_cents(price),
            stock,
        }
    }

    #[tokio::test]
    async fn test_create_requires_a_store() {
        let db = testing::db().await;
        testing::user(&db, "ann@example.com", "correct horse", 0).await;
        let products = ProductService::new(db.clone());

        let err = products
            .create("ann@example.com", draft("Lamp", 300, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "You don't have a store"));

        let store = testing::store(&db, "ann@example.com").await;
        let product = products
            .create("ann@example.com", draft("Lamp", 300, 5))
            .await
            .unwrap();
        assert_eq!(product.store_id, store.id);
        assert_eq!(products.get(&product.id).await.unwrap().stock, 5);
    }

    #[tokio::test]
    async fn test_get_rejects_malformed_and_unknown_ids() {
        let db = testing::db().await;
        let products = ProductService::new(db);

        assert!(matches!(
            products.get("not-a-uuid").await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            products.get(&Uuid::new_v4().to_string()).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_only_owner_may_update() {
        let db = testing::db().await;
        testing::user(&db, "ann@example.com", "correct horse", 0).await;
        testing::user(&db, "bob@example.com", "correct horse", 0).await;
        let store = testing::store(&db, "ann@example.com").await;
        testing::store(&db, "bob@example.com").await;
        let product = testing::product(&db, &store.id, 300, 5).await;
        let products = ProductService::new(db);

        let err = products
            .update("bob@example.com", &product.id, draft("Mine now", 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let updated = products
            .update("ann@example.com", &product.id, draft("Floor Lamp", 450, 9))
            .await
            .unwrap();
        assert_eq!(updated.name, "Floor Lamp");
        assert_eq!(updated.price, Money::from_cents(450));
        assert_eq!(updated.store_id, store.id);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected() {
        let db = testing::db().await;
        testing::user(&db, "ann@example.com", "correct horse", 0).await;
        testing::store(&db, "ann@example.com").await;
        let products = ProductService::new(db);

        assert!(matches!(
            products.create("ann@example.com", draft("Lamp", 0, 5)).await,
            Err(ApiError::Validation(_))
        ));
        assert!(products.list().await.unwrap().is_empty());
    }
}
