pub mod api;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use serde_json::json;

use crate::harvest::Harvester;

async fn index() -> impl IntoResponse {
    Json(json!({ "Hello": "World" }))
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub fn router(harvester: Harvester) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .merge(api::router(harvester))
}
