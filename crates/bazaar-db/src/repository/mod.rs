//! # Repository Module
//!
//! Database repository implementations for Bazaar.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Service                                                               │
//! │       │                                                                 │
//! │       │  db.products().get_by_id(id)          (pool, single statement) │
//! │       │  db.products().decrement_stock(&mut uow, id, 3)  (unit of work)│
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get_by_id / list        → Option / Vec, never NotFound            │
//! │  ├── insert / update         → DbError on constraint violations        │
//! │  └── guarded writes          → bool: did the guard hold?               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts and balances
//! - [`StoreRepository`](store::StoreRepository) - Storefronts
//! - [`ProductRepository`](product::ProductRepository) - Catalog and stock
//! - [`LedgerRepository`](ledger::LedgerRepository) - Purchase ledger
//! - [`RefreshTokenRepository`](refresh_token::RefreshTokenRepository) - Login sessions

pub mod ledger;
pub mod product;
pub mod refresh_token;
pub mod store;
pub mod user;

/// Generates a new entity ID (UUID v4).
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared setup for repository tests.

    use bazaar_core::{Money, Product, Store, User};
    use chrono::Utc;

    use super::generate_id;
    use crate::pool::{Database, DbConfig};

    pub async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub async fn user(db: &Database, email: &str, balance: i64) -> User {
        let now = Utc::now();
        let user = User {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            balance: Money::from_cents(balance),
            created_at: now,
            updated_at: now,
        };
        db.users().insert(&user).await.unwrap()
    }

    pub async fn store(db: &Database, owner_email: &str) -> Store {
        let now = Utc::now();
        let store = Store {
            id: generate_id(),
            owner_email: owner_email.to_string(),
            name: "Corner Shop".to_string(),
            created_at: now,
            updated_at: now,
        };
        db.stores().insert(&store).await.unwrap()
    }

    pub async fn product(db: &Database, store_id: &str, price: i64, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: generate_id(),
            store_id: store_id.to_string(),
            name: "Desk Lamp".to_string(),
            description: "Warm light".to_string(),
            price: Money::from_cents(price),
            stock,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap()
    }
}
