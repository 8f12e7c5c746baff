//! System endpoints: health check and contract configuration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::config::ContractAddresses;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    fallback_listings: usize,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, current timestamp, and the number of fallback listings loaded.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            fallback_listings: state.view_service.fallback().len(),
        }),
    )
}

/// `GET /config/contracts`: Deployed contract addresses.
#[utoipa::path(
    get,
    path = "/config/contracts",
    tag = "System",
    summary = "Contract addresses",
    description = "Returns the contract addresses the browser wallet signs transactions against.",
    responses(
        (status = 200, description = "Contract addresses", body = ContractAddresses),
    )
)]
pub async fn contracts_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.contracts.as_ref().clone()))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/contracts", get(contracts_handler))
}
