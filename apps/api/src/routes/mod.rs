//! HTTP routes.
//!
//! Requests are form-encoded; responses are JSON. Handlers decode the request,
//! build a command, and hand it to a service.
//!
//! ## Route Map
//! ```text
//! ┌──────────────────────────────────┬────────┬──────────────────────────┐
//! │ Path                             │ Auth   │ Handler module           │
//! ├──────────────────────────────────┼────────┼──────────────────────────┤
//! │ GET  /health                     │ -      │ health                   │
//! │ POST /auth/{login,refresh,logout}│ cookie │ auth                     │
//! │      /users, /users/me/..        │ bearer │ users                    │
//! │      /stores, /stores/me         │ bearer │ stores                   │
//! │      /products, /products/{id}/..│ bearer │ products                 │
//! └──────────────────────────────────┴────────┴──────────────────────────┘
//! ```

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod auth;
pub mod extract;
pub mod health;
pub mod products;
pub mod stores;
pub mod users;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(users::routes())
        .merge(stores::routes())
        .merge(products::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
