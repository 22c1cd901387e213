//! # bazaar-core: Pure Business Logic for Bazaar
//!
//! This crate holds the domain of the Bazaar marketplace as pure types and
//! functions. Nothing here touches a database, a socket or a clock it was not
//! handed.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    bazaar-api (axum)                            │   │
//! │  │    /auth/* ──► /users ──► /stores ──► /products/{id}/buy       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazaar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  command  │  │ purchase  │  │   │
//! │  │   │   User    │  │   Money   │  │ BuyCommand│  │  quote    │  │   │
//! │  │   │  Product  │  │  checked  │  │  NewStore │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bazaar-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, repositories, unit of work   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Store, Product, Transaction, RefreshToken)
//! - [`money`] - Money type with checked integer arithmetic
//! - [`command`] - Validated request values handed to services
//! - [`purchase`] - Stock and balance checks for a buy
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use bazaar_core::money::Money;
//!
//! let price = Money::from_cents(300);
//! let cost = price.checked_mul_quantity(3).unwrap();
//! let balance = Money::from_cents(1000).checked_debit(cost).unwrap();
//!
//! assert_eq!(balance.cents(), 100);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod command;
pub mod error;
pub mod money;
pub mod purchase;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use command::{BuyCommand, NewStore, ProductDraft, RegisterUser, UpdateProfile};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use purchase::{quote_purchase, PurchaseQuote};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum password length, in characters.
pub const MAX_PASSWORD_LEN: usize = 128;

/// Maximum length for person and store names.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length for product descriptions.
pub const MAX_DESCRIPTION_LEN: usize = 2000;
