//! # Commands
//!
//! Plain values built by the transport layer and handed to services.
//!
//! Each command is constructed from already-decoded request fields and
//! checked with `validate()` before a service touches storage. Services take
//! commands by value and return fresh domain values; nothing is mutated in
//! place across layers.

use serde::Deserialize;

use crate::money::Money;
use crate::validation::{
    validate_description, validate_email, validate_name, validate_password, validate_price,
    validate_product_name, validate_quantity, validate_stock, ValidationResult,
};

/// Create a new account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegisterUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl RegisterUser {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_email(&self.email)?;
        validate_name("first_name", &self.first_name)?;
        validate_name("last_name", &self.last_name)?;
        validate_password(&self.password)
    }
}

/// Change the caller's display names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpdateProfile {
    pub first_name: String,
    pub last_name: String,
}

impl UpdateProfile {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("first_name", &self.first_name)?;
        validate_name("last_name", &self.last_name)
    }
}

/// Name for a store being created or renamed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewStore {
    pub name: String,
}

impl NewStore {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)
    }
}

/// Full set of editable product fields, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: i64,
}

impl ProductDraft {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_product_name(&self.name)?;
        validate_description(&self.description)?;
        validate_price(self.price)?;
        validate_stock(self.stock)
    }
}

/// Buy `quantity` units of a product on behalf of `buyer_email`.
///
/// `buyer_email` always comes from verified credential evidence, never from
/// the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyCommand {
    pub buyer_email: String,
    pub product_id: String,
    pub quantity: i64,
}

impl BuyCommand {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_quantity(self.quantity)
    }
}
