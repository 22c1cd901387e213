//! # Bazaar API
//!
//! HTTP server for the Bazaar marketplace: accounts, storefronts, products,
//! and atomic purchases.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            API Layers                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  routes (axum)                                                    │  │
//! │  │  form decoding • Evidence / CurrentUser extractors • JSON bodies  │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 │ commands                              │
//! │  ┌──────────────────────────────▼───────────────────────────────────┐  │
//! │  │  services                                                         │  │
//! │  │  Auth • Users • Stores • Products • Purchases • Health            │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 │ repositories / UnitOfWork             │
//! │  ┌──────────────────────────────▼───────────────────────────────────┐  │
//! │  │  bazaar-db (SQLite)                                               │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Supporting: auth (JWT) • password (argon2) • config • error            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (an optional `.env` file is loaded first):
//! - `PORT` - HTTP port (default: 8080)
//! - `DATABASE_PATH` - SQLite file (default: ./data/bazaar.db)
//! - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `JWT_KEY` - Secret for signing access tokens
//! - `JWT_ACCESS_LIFETIME_SECS` - Access token lifetime (default: 900)
//! - `REFRESH_TOKEN_LIFETIME_SECS` - Refresh token lifetime (default: 604800)
//! - `COOKIE_SECURE` - Mark the refresh cookie `Secure` (default: false)
//! - `SIGNUP_BALANCE` - Starting balance for new accounts (default: 0)

use std::sync::Arc;

use bazaar_core::Money;
use bazaar_db::Database;

pub mod auth;
pub mod config;
pub mod error;
pub mod password;
pub mod routes;
pub mod services;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::router;

use crate::auth::JwtManager;
use crate::services::{
    AuthService, HealthService, ProductService, PurchaseService, StoreService, UserService,
};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(config.jwt_key.as_bytes(), config.jwt_access_lifetime_secs);

        AppState {
            db,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
        }
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(
            self.db.clone(),
            Arc::clone(&self.jwt),
            self.config.refresh_token_lifetime_secs,
        )
    }

    pub fn users(&self) -> UserService {
        UserService::new(
            self.db.clone(),
            Money::from_cents(self.config.signup_balance),
        )
    }

    pub fn stores(&self) -> StoreService {
        StoreService::new(self.db.clone())
    }

    pub fn products(&self) -> ProductService {
        ProductService::new(self.db.clone())
    }

    pub fn purchases(&self) -> PurchaseService {
        PurchaseService::new(self.db.clone())
    }

    pub fn health(&self) -> HealthService {
        HealthService::new(self.db.clone())
    }
}
