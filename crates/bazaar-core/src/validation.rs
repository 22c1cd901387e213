//! # Validation Module
//!
//! Field-level validation for everything a client can send.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler                                                 │
//! │  ├── Form decoding (strings)                                           │
//! │  └── Command value built from the form                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (via Command::validate)                          │
//! │  ├── Required / length checks                                          │
//! │  └── Numeric parsing and sign checks                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock >= 0), CHECK (balance >= 0), ...                     │
//! │  └── UNIQUE / FOREIGN KEY constraints                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::validation::{parse_quantity, validate_email};
//!
//! assert!(validate_email("ann@example.com").is_ok());
//! assert_eq!(parse_quantity("3").unwrap(), 3);
//! assert!(parse_quantity("0").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_EMAIL_LEN: usize = 254;
const MAX_PRODUCT_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty, at most 254 characters
/// - Exactly one `@`, non-empty local part
/// - Domain contains a dot that is neither first nor last
/// - No whitespace
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.trim().is_empty() {
        return Err(required("email"));
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("must contain '@'"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@domain.tld"));
    }

    match domain.find('.') {
        Some(dot) if dot > 0 && !domain.ends_with('.') => Ok(()),
        _ => Err(invalid("must look like name@domain.tld")),
    }
}

/// Validates a person or store name field.
///
/// ## Rules
/// - Must not be blank
/// - At most 100 characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    validate_required_text(field, value, MAX_NAME_LEN)
}

/// Validates a product name (required, at most 200 characters).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates a product description. Empty is allowed.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(())
}

/// Validates a plaintext password before hashing.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(required("password"));
    }

    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    if len > MAX_PASSWORD_LEN {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: MAX_PASSWORD_LEN,
        });
    }

    Ok(())
}

fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a purchase quantity (> 0).
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a unit price (> 0). Free products are not allowed.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level (>= 0).
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

/// Parses and validates a quantity form field.
///
/// ## User Workflow
/// ```text
/// POST /products/{id}/buy   quantity=abc
///      │
///      ▼
/// parse_quantity("abc") ← THIS FUNCTION
///      │
///      ├── not an integer? → "quantity has invalid format"
///      ├── <= 0?           → "quantity must be positive"
///      └── OK → BuyCommand { quantity }
/// ```
pub fn parse_quantity(raw: &str) -> ValidationResult<i64> {
    let quantity = parse_integer("quantity", raw)?;
    validate_quantity(quantity)?;
    Ok(quantity)
}

/// Parses and validates a price form field.
pub fn parse_price(raw: &str) -> ValidationResult<Money> {
    let price = Money::from_cents(parse_integer("price", raw)?);
    validate_price(price)?;
    Ok(price)
}

/// Parses and validates a stock form field.
pub fn parse_stock(raw: &str) -> ValidationResult<i64> {
    let stock = parse_integer("stock", raw)?;
    validate_stock(stock)?;
    Ok(stock)
}

fn parse_integer(field: &str, raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(required(field));
    }

    raw.parse::<i64>().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a whole number".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ann@example.com").is_ok());
        assert!(validate_email("a.b+c@mail.example.org").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("ann").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ann@example").is_err());
        assert!(validate_email("ann@.com").is_err());
        assert!(validate_email("ann@example.").is_err());
        assert!(validate_email("ann@@example.com").is_err());
        assert!(validate_email("ann lee@example.com").is_err());
        assert!(validate_email(&format!("{}@example.com", "a".repeat(260))).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("first_name", "Ann").is_ok());
        assert_eq!(
            validate_name("first_name", "   ").unwrap_err().to_string(),
            "first_name is required"
        );
        assert!(validate_name("name", &"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("correct horse").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_product_fields() {
        assert!(validate_product_name("Desk Lamp").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_description("").is_ok());
        assert!(validate_description(&"d".repeat(2001)).is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3").unwrap(), 3);
        assert_eq!(parse_quantity(" 7 ").unwrap(), 7);
        assert!(matches!(
            parse_quantity("0"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(parse_quantity("-1").is_err());
        assert!(matches!(
            parse_quantity("three"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(parse_quantity(""), Err(ValidationError::Required { .. })));
    }

    #[test]
    fn test_parse_price_and_stock() {
        assert_eq!(parse_price("300").unwrap(), Money::from_cents(300));
        assert!(parse_price("0").is_err());
        assert!(parse_price("1.50").is_err());

        assert_eq!(parse_stock("0").unwrap(), 0);
        assert!(matches!(
            parse_stock("-5"),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
    }
}
