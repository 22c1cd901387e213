//! Storefront routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Form, Json, Router,
};

use bazaar_core::{NewStore, Store};

use crate::error::ApiResult;
use crate::routes::extract::CurrentUser;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stores", get(list))
        .route("/stores/me", get(mine).post(create).put(rename))
        .route("/stores/{id}", get(by_id))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Store>>> {
    Ok(Json(state.stores().list().await?))
}

async fn by_id(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Store>> {
    Ok(Json(state.stores().get(&id).await?))
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(cmd): Form<NewStore>,
) -> ApiResult<(StatusCode, Json<Store>)> {
    let store = state.stores().create(&user.email, cmd).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

async fn mine(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> ApiResult<Json<Store>> {
    Ok(Json(state.stores().mine(&user.email).await?))
}

async fn rename(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(cmd): Form<NewStore>,
) -> ApiResult<Json<Store>> {
    Ok(Json(state.stores().rename(&user.email, cmd).await?))
}
