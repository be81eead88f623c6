use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

#[must_use]
pub fn router() -> Router {
    Router::new().route("/health", get(health_check))
}
