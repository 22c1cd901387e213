//! # Domain Types
//!
//! Core domain types used throughout Bazaar.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │      Store      │   │     Product     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  email (PK)     │◄──│  owner_email    │◄──│  store_id (FK)  │       │
//! │  │  password_hash  │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  balance        │   │  name           │   │  price, stock   │       │
//! │  └────────┬────────┘   └─────────────────┘   └────────┬────────┘       │
//! │           │                                           │                 │
//! │           │          ┌─────────────────┐              │                 │
//! │           └─────────►│   Transaction   │◄─────────────┘                 │
//! │                      │  (ledger entry) │                                │
//! │                      │  quantity       │  append-only                   │
//! │                      │  total_price    │                                │
//! │                      └─────────────────┘                                │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │  RefreshToken   │  opaque secret → exactly one user                 │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// User
// =============================================================================

/// A registered account. The email is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub email: String,
    pub first_name: String,
    pub last_name: String,

    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Spendable balance. Only the purchase flow changes it.
    pub balance: Money,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Store
// =============================================================================

/// A storefront. Each user owns at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Store {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub owner_email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product listed by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning store.
    pub store_id: String,

    pub name: String,
    pub description: String,

    /// Unit price, always > 0.
    pub price: Money,

    /// Units available, never negative.
    pub stock: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks if `quantity` units can be taken from stock.
    #[inline]
    pub fn has_stock(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }

    /// Checks if the product is listed by `store`.
    #[inline]
    pub fn is_listed_by(&self, store: &Store) -> bool {
        self.store_id == store.id
    }
}

// =============================================================================
// Transaction (ledger entry)
// =============================================================================

/// The durable record of one completed purchase.
///
/// Uses the snapshot pattern: `total_price` freezes what the buyer was
/// charged, so later catalog price edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub product_id: String,

    /// Buyer.
    pub user_email: String,

    /// Units bought, always > 0.
    pub quantity: i64,

    /// `price × quantity` at the time of purchase.
    pub total_price: Money,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Refresh Token
// =============================================================================

/// A long-lived opaque secret that can be exchanged for access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RefreshToken {
    /// The secret itself (hex-encoded random bytes).
    #[serde(skip_serializing)]
    pub token: String,
    pub user_email: String,
    pub issued_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Checks whether the token is older than `lifetime` at `now`.
    ///
    /// A lifetime that reaches past the representable range never expires.
    pub fn is_expired(&self, now: DateTime<Utc>, lifetime: Duration) -> bool {
        match self.issued_at.checked_add_signed(lifetime) {
            Some(expires_at) => now >= expires_at,
            None => false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
