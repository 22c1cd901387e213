//! Login, refresh and logout.
//!
//! The refresh token only ever travels in an `HttpOnly` cookie scoped to
//! `/auth`; the access token is returned in the body.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::routes::extract::cookie;
use crate::AppState;

pub const REFRESH_COOKIE: &str = "refresh_token";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl TokenResponse {
    fn bearer(access_token: String, expires_in: i64) -> Self {
        TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<impl IntoResponse> {
    let tokens = state.auth().login(&form.email, &form.password).await?;

    let set_cookie = refresh_cookie(
        &tokens.refresh_token,
        state.config.refresh_token_lifetime_secs,
        state.config.cookie_secure,
    );
    let body = TokenResponse::bearer(tokens.access_token, state.jwt.access_lifetime_secs());

    Ok(([(header::SET_COOKIE, set_cookie)], Json(body)))
}

async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<TokenResponse>> {
    let token = cookie(&headers, REFRESH_COOKIE).ok_or(ApiError::InvalidRefreshToken)?;
    let access_token = state.auth().refresh_access_token(token).await?;

    Ok(Json(TokenResponse::bearer(
        access_token,
        state.jwt.access_lifetime_secs(),
    )))
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<impl IntoResponse> {
    let token = cookie(&headers, REFRESH_COOKIE).ok_or(ApiError::InvalidRefreshToken)?;
    state.auth().logout(token).await?;

    let cleared = refresh_cookie("", 0, state.config.cookie_secure);
    Ok((StatusCode::OK, [(header::SET_COOKIE, cleared)]))
}

fn refresh_cookie(value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{REFRESH_COOKIE}={value}; HttpOnly; SameSite=Strict; Path=/auth; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
