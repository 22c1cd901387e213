use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::services::HealthReport;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(check))
}

/// 200 while the database answers, 503 otherwise.
async fn check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.health().check().await;
    let status = if report.is_serving() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report))
}
