//! Account routes.

use axum::{
    extract::{Path, State},
    routing::get,
    Form, Json, Router,
};

use bazaar_core::{RegisterUser, Transaction, UpdateProfile, User};

use crate::error::ApiResult;
use crate::routes::extract::CurrentUser;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list).post(register))
        .route("/users/me", get(me).put(update_me))
        .route("/users/me/transactions", get(my_transactions))
        .route("/users/me/transactions/{id}", get(my_transaction))
        .route("/users/{email}", get(by_email))
}

async fn register(
    State(state): State<AppState>,
    Form(cmd): Form<RegisterUser>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.users().register(cmd).await?))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users().list().await?))
}

async fn by_email(State(state): State<AppState>, Path(email): Path<String>) -> ApiResult<Json<User>> {
    Ok(Json(state.users().get(&email).await?))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(cmd): Form<UpdateProfile>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.users().update_profile(&user.email, cmd).await?))
}

async fn my_transactions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<Transaction>>> {
    Ok(Json(state.users().transactions(&user.email).await?))
}

async fn my_transaction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Transaction>> {
    Ok(Json(state.users().transaction(&user.email, &id).await?))
}
