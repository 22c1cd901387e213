//! Error types for the HTTP API.
//!
//! ## Status Mapping
//! ```text
//! ┌──────────────────────────┬────────┬──────────────────────────────────┐
//! │ ApiError                 │ Status │ Typical source                   │
//! ├──────────────────────────┼────────┼──────────────────────────────────┤
//! │ Validation / BadRequest  │ 400    │ ValidationError, missing store   │
//! │ InsufficientStock/Balance│ 400    │ CoreError, guarded updates       │
//! │ Unauthenticated          │ 401    │ missing/invalid bearer token     │
//! │ InvalidCredentials       │ 401    │ login                            │
//! │ InvalidRefreshToken      │ 401    │ refresh, logout                  │
//! │ Forbidden                │ 403    │ editing someone else's product   │
//! │ NotFound                 │ 404    │ Option::None, DbError::NotFound  │
//! │ Conflict                 │ 409    │ DbError::UniqueViolation         │
//! │ Internal                 │ 500    │ storage, hashing, signing        │
//! └──────────────────────────┴────────┴──────────────────────────────────┘
//! ```
//!
//! Bodies are `{"error": "<code>", "message": "<text>"}`. Internal errors are
//! logged with their detail and answered with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use bazaar_core::{CoreError, ValidationError};
use bazaar_db::DbError;

use crate::auth::AuthError;
use crate::password::PasswordError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InsufficientStock(String),

    #[error("{0}")]
    InsufficientBalance(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::Unauthenticated(_) => "unauthenticated",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::InvalidRefreshToken => "invalid_refresh_token",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::InsufficientStock(_) => "insufficient_stock",
            ApiError::InsufficientBalance(_) => "insufficient_balance",
            ApiError::Conflict(_) => "conflict",
            ApiError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::BadRequest(_)
            | ApiError::InsufficientStock(_)
            | ApiError::InsufficientBalance(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_)
            | ApiError::InvalidCredentials
            | ApiError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unauthenticated() -> Self {
        ApiError::Unauthenticated("Authentication required".to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: self.code(),
            message,
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InsufficientStock { .. } => {
                ApiError::InsufficientStock("Insufficient stock".to_string())
            }
            CoreError::InsufficientBalance { .. } => {
                ApiError::InsufficientBalance("Insufficient balance".to_string())
            }
            CoreError::Validation(e) => ApiError::Validation(e),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::NotFound { entity, .. } => ApiError::NotFound(format!("{entity} not found")),
            DbError::UniqueViolation { message } => ApiError::Conflict(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(error: PasswordError) -> Self {
        ApiError::Internal(error.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Signing(detail) => ApiError::Internal(detail),
            AuthError::InvalidToken(_) | AuthError::WrongTokenType | AuthError::MissingToken => {
                ApiError::unauthenticated()
            }
        }
    }
}

/// Result type alias for handlers and services.
pub type ApiResult<T> = Result<T, ApiError>;
