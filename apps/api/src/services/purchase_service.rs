//! Purchase orchestration.
//!
//! ## Buy Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           PurchaseService::buy                          │
//! │                                                                         │
//! │  1. Resolve buyer            missing ──► Unauthenticated                │
//! │  2. Load product             missing ──► NotFound                       │
//! │  3. quote_purchase           quantity, stock, cost, balance checks      │
//! │         │                    (nothing written on failure)               │
//! │         ▼                                                               │
//! │  4. BEGIN (UnitOfWork)                                                  │
//! │       a. debit balance   WHERE balance >= cost   0 rows ──► rollback   │
//! │       b. insert ledger row                                              │
//! │       c. decrement stock WHERE stock >= qty      0 rows ──► rollback   │
//! │  5. COMMIT                   failure ──► Internal, nothing visible      │
//! │  6. Return the ledger entry                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The guards in 4a and 4c re-check what the quote checked, against the rows
//! as they are inside the unit of work. A quote computed from a stale read can
//! therefore never drive stock or balance below zero.

use chrono::Utc;
use tracing::{info, warn};

use bazaar_core::{quote_purchase, BuyCommand, PurchaseQuote, Transaction};
use bazaar_db::repository::generate_id;
use bazaar_db::{Database, UnitOfWork};

use crate::error::{ApiError, ApiResult};
use crate::services::ProductService;

#[derive(Debug, Clone)]
pub struct PurchaseService {
    db: Database,
    products: ProductService,
}

impl PurchaseService {
    pub fn new(db: Database) -> Self {
        let products = ProductService::new(db.clone());
        PurchaseService { db, products }
    }

    /// Buy `cmd.quantity` units of `cmd.product_id` for `cmd.buyer_email`.
    pub async fn buy(&self, cmd: BuyCommand) -> ApiResult<Transaction> {
        let buyer = self
            .db
            .users()
            .get_by_email(&cmd.buyer_email)
            .await?
            .ok_or_else(ApiError::unauthenticated)?;

        let product = self.products.get(&cmd.product_id).await?;

        let quote = quote_purchase(&buyer, &product, cmd.quantity).map_err(|e| {
            warn!(
                email = %buyer.email,
                product_id = %product.id,
                quantity = cmd.quantity,
                error = %e,
                "Purchase rejected"
            );
            ApiError::from(e)
        })?;

        let entry = Transaction {
            id: generate_id(),
            product_id: quote.product_id.clone(),
            user_email: buyer.email,
            quantity: quote.quantity,
            total_price: quote.cost,
            created_at: Utc::now(),
        };

        self.execute(&quote, &entry).await?;

        info!(
            id = %entry.id,
            email = %entry.user_email,
            product_id = %entry.product_id,
            quantity = entry.quantity,
            total = %entry.total_price,
            balance = %quote.balance_after,
            "Purchase completed"
        );
        Ok(entry)
    }

    /// Apply a quote atomically.
    async fn execute(&self, quote: &PurchaseQuote, entry: &Transaction) -> ApiResult<()> {
        let mut uow = self.db.begin().await?;

        if let Err(e) = self.apply(&mut uow, quote, entry).await {
            if let Err(rollback) = uow.rollback().await {
                warn!(error = %rollback, "Rollback failed");
            }
            return Err(e);
        }

        uow.commit()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))
    }

    async fn apply(
        &self,
        uow: &mut UnitOfWork,
        quote: &PurchaseQuote,
        entry: &Transaction,
    ) -> ApiResult<()> {
        let debited = self
            .db
            .users()
            .debit_balance(uow, &entry.user_email, quote.cost)
            .await?;
        if !debited {
            return Err(ApiError::InsufficientBalance("Insufficient balance".to_string()));
        }

        self.db.ledger().insert(uow, entry).await?;

        let taken = self
            .db
            .products()
            .decrement_stock(uow, &quote.product_id, quote.quantity)
            .await?;
        if !taken {
            return Err(ApiError::InsufficientStock("Insufficient stock".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;
    use bazaar_core::{Money, Product};

    fn buy(email: &str, product: &Product, quantity: i64) -> BuyCommand {
        BuyCommand {
            buyer_email: email.to_string(),
            product_id: product.id.clone(),
            quantity,
        }
    }

    async fn shop(balance: i64, price: i64, stock: i64) -> (Database, Product) {
        let db = testing::db().await;
        testing::user(&db, "seller@example.com", "correct horse", 0).await;
        testing::user(&db, "buyer@example.com", "correct horse", balance).await;
        let store = testing::store(&db, "seller@example.com").await;
        let product = testing::product(&db, &store.id, price, stock).await;
        (db, product)
    }

    async fn balance(db: &Database, email: &str) -> Money {
        db.users().get_by_email(email).await.unwrap().unwrap().balance
    }

    async fn stock(db: &Database, id: &str) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_successful_purchase() {
        let (db, product) = shop(1000, 300, 5).await;
        let purchases = PurchaseService::new(db.clone());

        let entry = purchases.buy(buy("buyer@example.com", &product, 3)).await.unwrap();
        assert_eq!(entry.quantity, 3);
        assert_eq!(entry.total_price, Money::from_cents(900));
        assert_eq!(entry.user_email, "buyer@example.com");

        assert_eq!(stock(&db, &product.id).await, 2);
        assert_eq!(balance(&db, "buyer@example.com").await, Money::from_cents(100));

        let ledger = db.ledger().list_by_user("buyer@example.com").await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].id, entry.id);
    }

    #[tokio::test]
    async fn test_insufficient_stock_changes_nothing() {
        let (db, product) = shop(1000, 300, 2).await;
        let purchases = PurchaseService::new(db.clone());

        let err = purchases
            .buy(buy("buyer@example.com", &product, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InsufficientStock(_)));

        assert_eq!(stock(&db, &product.id).await, 2);
        assert_eq!(balance(&db, "buyer@example.com").await, Money::from_cents(1000));
        assert_eq!(db.ledger().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insufficient_balance_changes_nothing() {
        let (db, product) = shop(800, 300, 5).await;
        let purchases = PurchaseService::new(db.clone());

        let err = purchases
            .buy(buy("buyer@example.com", &product, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InsufficientBalance(_)));

        assert_eq!(stock(&db, &product.id).await, 5);
        assert_eq!(balance(&db, "buyer@example.com").await, Money::from_cents(800));
        assert_eq!(db.ledger().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_buyer_and_product() {
        let (db, product) = shop(1000, 300, 5).await;
        let purchases = PurchaseService::new(db);

        assert!(matches!(
            purchases.buy(buy("ghost@example.com", &product, 1)).await,
            Err(ApiError::Unauthenticated(_))
        ));

        let cmd = BuyCommand {
            buyer_email: "buyer@example.com".to_string(),
            product_id: generate_id(),
            quantity: 1,
        };
        assert!(matches!(purchases.buy(cmd).await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_zero_quantity_is_validation_error() {
        let (db, product) = shop(1000, 300, 5).await;
        let purchases = PurchaseService::new(db);

        assert!(matches!(
            purchases.buy(buy("buyer@example.com", &product, 0)).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_second_purchase_sees_first() {
        let (db, product) = shop(1000, 300, 5).await;
        let purchases = PurchaseService::new(db.clone());

        purchases.buy(buy("buyer@example.com", &product, 3)).await.unwrap();
        let err = purchases
            .buy(buy("buyer@example.com", &product, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InsufficientStock(_)));
        assert_eq!(db.ledger().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_stale_quote_rolls_back_debit_and_ledger() {
        let (db, product) = shop(1000, 300, 5).await;
        let purchases = PurchaseService::new(db.clone());
        let buyer = db.users().get_by_email("buyer@example.com").await.unwrap().unwrap();

        let quote = quote_purchase(&buyer, &product, 3).unwrap();
        let entry = Transaction {
            id: generate_id(),
            product_id: product.id.clone(),
            user_email: buyer.email.clone(),
            quantity: 3,
            total_price: quote.cost,
            created_at: Utc::now(),
        };

        // Someone else buys most of the stock after the quote was taken.
        db.products()
            .update(&Product {
                stock: 1,
                ..product.clone()
            })
            .await
            .unwrap();

        let err = purchases.execute(&quote, &entry).await.unwrap_err();
        assert!(matches!(err, ApiError::InsufficientStock(_)));

        assert_eq!(balance(&db, "buyer@example.com").await, Money::from_cents(1000));
        assert_eq!(db.ledger().count().await.unwrap(), 0);
        assert_eq!(stock(&db, &product.id).await, 1);
    }
}
