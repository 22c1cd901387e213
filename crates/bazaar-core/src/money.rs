//! # Money Module
//!
//! Provides the `Money` type for balances, prices and purchase costs.
//!
//! ## Integer Minor Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every monetary value is an i64 count of the smallest currency unit.    │
//! │                                                                         │
//! │    price 300  ×  quantity 3  =  cost 900                               │
//! │    balance 1000  -  cost 900  =  balance 100                           │
//! │                                                                         │
//! │  Arithmetic that can overflow is CHECKED: a cost that does not fit in  │
//! │  an i64 is larger than any balance, so it is reported, never wrapped.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::money::Money;
//!
//! let price = Money::from_cents(300);
//! let cost = price.checked_mul_quantity(3).unwrap();
//! assert_eq!(cost.cents(), 900);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// Serialized as a bare integer so JSON payloads keep the same shape as the
/// database columns (`balance`, `price`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// Returns `None` when the product does not fit in an `i64`.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(300).checked_mul_quantity(3), Some(Money::from_cents(900)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, quantity: i64) -> Option<Self> {
        match self.0.checked_mul(quantity) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Subtracts `other`, returning `None` if the result would be negative
    /// or overflow.
    ///
    /// Used to compute a balance after a debit; a `None` means the debit
    /// is not covered.
    #[inline]
    pub const fn checked_debit(&self, other: Money) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) if v >= 0 => Some(Money(v)),
            _ => None,
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Two-decimal rendering used in log lines and error messages.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Money(cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_mul_quantity() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.checked_mul_quantity(3).unwrap().cents(), 897);
        assert_eq!(unit_price.checked_mul_quantity(0).unwrap().cents(), 0);
        assert!(Money::from_cents(i64::MAX / 2).checked_mul_quantity(3).is_none());
    }

    #[test]
    fn test_checked_debit() {
        let balance = Money::from_cents(1000);
        assert_eq!(balance.checked_debit(Money::from_cents(900)), Some(Money::from_cents(100)));
        assert_eq!(balance.checked_debit(Money::from_cents(1000)), Some(Money::zero()));
        assert_eq!(balance.checked_debit(Money::from_cents(1001)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(i64::MIN).to_string(), "-92233720368547758.08");
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_string(&Money::from_cents(300)).unwrap();
        assert_eq!(json, "300");
        let back: Money = serde_json::from_str("42").unwrap();
        assert_eq!(back.cents(), 42);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::from_cents(1).is_positive());
        assert!(!Money::zero().is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }
}
