//! Health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::ocr::PoolStats;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub ocr: PoolStats,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ocr = state.extractor().pool_stats();
    Json(HealthResponse {
        status: if ocr.size > 0 { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        service: "folio-ocr",
        ocr,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}
