//! Credential extractors.
//!
//! ```rust,ignore
//! async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
//!     Json(user)
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use bazaar_core::User;

use crate::auth::{extract_bearer_token, AuthError, CredentialEvidence};
use crate::error::ApiError;
use crate::AppState;

/// Verified bearer token. Rejects with 401 when absent or invalid.
#[derive(Debug, Clone)]
pub struct Evidence(pub CredentialEvidence);

impl FromRequestParts<AppState> for Evidence {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or(AuthError::MissingToken)?;

        let evidence = state.jwt.verify_access_token(token)?;
        Ok(Evidence(evidence))
    }
}

/// The user behind a verified bearer token.
///
/// A token whose subject no longer exists is treated as unauthenticated.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Evidence(evidence) = Evidence::from_request_parts(parts, state).await?;

        let user = state
            .auth()
            .current_user(&evidence)
            .await
            .map_err(|e| match e {
                ApiError::Internal(detail) => ApiError::Internal(detail),
                _ => ApiError::unauthenticated(),
            })?;

        Ok(CurrentUser(user))
    }
}

/// Value of cookie `name` from the request's `Cookie` headers.
pub fn cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
