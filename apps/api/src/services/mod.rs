//! Service layer.
//!
//! Each service owns cheap clones of what it needs (database handle, token
//! manager, settings) and exposes the operations the HTTP routes call. Services
//! take commands by value and return fresh domain values.

pub mod auth_service;
pub mod health_service;
pub mod product_service;
pub mod purchase_service;
pub mod store_service;
pub mod user_service;

pub use auth_service::{AuthService, LoginTokens};
pub use health_service::{HealthReport, HealthService, MigrationState, ServingStatus};
pub use product_service::ProductService;
pub use purchase_service::PurchaseService;
pub use store_service::StoreService;
pub use user_service::UserService;
