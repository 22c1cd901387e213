//! Catalog and purchase routes.
//!
//! Numeric form fields arrive as text and go through the core parsers, so
//! `price=abc` is a validation error rather than a decoding failure.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;

use bazaar_core::validation::{parse_price, parse_quantity, parse_stock};
use bazaar_core::{BuyCommand, Product, ProductDraft, Transaction, ValidationError};

use crate::error::ApiResult;
use crate::routes::extract::{CurrentUser, Evidence};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/{id}", get(by_id).put(update))
        .route("/products/{id}/buy", post(buy))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
}

impl ProductForm {
    fn into_draft(self) -> Result<ProductDraft, ValidationError> {
        Ok(ProductDraft {
            price: parse_price(&self.price)?,
            stock: parse_stock(&self.stock)?,
            name: self.name,
            description: self.description,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BuyForm {
    pub quantity: String,
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.products().list().await?))
}

async fn by_id(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Product>> {
    Ok(Json(state.products().get(&id).await?))
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<ProductForm>,
) -> ApiResult<Json<Product>> {
    let draft = form.into_draft()?;
    Ok(Json(state.products().create(&user.email, draft).await?))
}

async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> ApiResult<Json<Product>> {
    let draft = form.into_draft()?;
    Ok(Json(state.products().update(&user.email, &id, draft).await?))
}

async fn buy(
    State(state): State<AppState>,
    Evidence(evidence): Evidence,
    Path(id): Path<String>,
    Form(form): Form<BuyForm>,
) -> ApiResult<Json<Transaction>> {
    let cmd = BuyCommand {
        buyer_email: evidence.subject,
        product_id: id,
        quantity: parse_quantity(&form.quantity)?,
    };

    Ok(Json(state.purchases().buy(cmd).await?))
}
