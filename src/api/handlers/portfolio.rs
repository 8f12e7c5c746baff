//! Investor portfolio handler.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /investors/{address}/portfolio`: Investments and votes of one
/// address.
///
/// Each section carries its own `ready`/`failed` state, so an indexer
/// failure on one side still returns `200` with the other side populated.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidAddress`] for a malformed address.
#[utoipa::path(
    get,
    path = "/api/v1/investors/{address}/portfolio",
    tag = "Portfolio",
    summary = "Get investor portfolio",
    description = "Fetches the investor's contributions and governance votes concurrently. Each section reports its own ready or failed state.",
    params(
        ("address" = String, Path, description = "Investor address"),
    ),
    responses(
        (status = 200, description = "Portfolio sections", body = serde_json::Value),
        (status = 400, description = "Malformed address", body = ErrorResponse),
    )
)]
pub async fn get_portfolio(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let view = state.view_service.portfolio(&address).await?;
    Ok(Json(view))
}

/// Portfolio routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/investors/{address}/portfolio", get(get_portfolio))
}
