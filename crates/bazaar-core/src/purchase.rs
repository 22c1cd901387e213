//! # Purchase Quoting
//!
//! The checks a buy must pass before anything is written.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quote_purchase(buyer, product, quantity)                               │
//! │                                                                         │
//! │    quantity > 0 ?                 no → Validation                       │
//! │         │                                                               │
//! │    product.stock >= quantity ?    no → InsufficientStock                │
//! │         │                                                               │
//! │    cost = price × quantity        overflow → InsufficientBalance        │
//! │         │                                                               │
//! │    balance - cost >= 0 ?          no → InsufficientBalance              │
//! │         │                                                               │
//! │    PurchaseQuote { cost, balance_after, .. }                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The quote is computed from snapshots read outside the unit of work. The
//! database layer re-checks stock and balance with guarded updates.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, User};
use crate::validation::validate_quantity;

/// The priced outcome of a successful pre-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseQuote {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// `unit_price × quantity`.
    pub cost: Money,
    /// The buyer's balance once `cost` is debited.
    pub balance_after: Money,
}

/// Checks that `buyer` can take `quantity` units of `product`.
pub fn quote_purchase(buyer: &User, product: &Product, quantity: i64) -> CoreResult<PurchaseQuote> {
    validate_quantity(quantity)?;

    if !product.has_stock(quantity) {
        return Err(CoreError::InsufficientStock {
            product_id: product.id.clone(),
            available: product.stock,
            requested: quantity,
        });
    }

    let cost = product
        .price
        .checked_mul_quantity(quantity)
        .ok_or(CoreError::InsufficientBalance {
            available: buyer.balance,
            required: None,
        })?;

    let balance_after = buyer
        .balance
        .checked_debit(cost)
        .ok_or(CoreError::InsufficientBalance {
            available: buyer.balance,
            required: Some(cost),
        })?;

    Ok(PurchaseQuote {
        product_id: product.id.clone(),
        quantity,
        unit_price: product.price,
        cost,
        balance_after,
    })
}
