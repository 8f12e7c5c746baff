//! Fundraising handlers: listing cards and detail page.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{FundraisingListResponse, PaginationParams};
use crate::app_state::AppState;
use crate::domain::FundraisingView;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /fundraisings`: Paginated fundraising cards.
///
/// # Errors
///
/// Returns [`GatewayError`] when the indexer cannot be queried.
#[utoipa::path(
    get,
    path = "/api/v1/fundraisings",
    tag = "Fundraisings",
    summary = "List fundraisings",
    description = "Returns listing cards for every campaign with a property listing. Campaigns not yet indexed are shown with placeholder figures.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated fundraising cards", body = FundraisingListResponse),
        (status = 502, description = "Indexer unavailable", body = ErrorResponse),
    )
)]
pub async fn list_fundraisings(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let cards = state.view_service.fundraising_cards().await?;
    let (data, pagination) = params.paginate(cards);
    Ok(Json(FundraisingListResponse { data, pagination }))
}

/// `GET /fundraisings/{id}`: Fundraising detail page.
///
/// # Errors
///
/// Returns [`GatewayError::FundraisingNotFound`] for an unknown campaign.
#[utoipa::path(
    get,
    path = "/api/v1/fundraisings/{id}",
    tag = "Fundraisings",
    summary = "Get fundraising details",
    description = "Returns the merged live and listing view for one campaign, including progress, countdown, and contribution rows.",
    params(
        ("id" = String, Path, description = "Campaign contract address"),
    ),
    responses(
        (status = 200, description = "Fundraising details", body = FundraisingView),
        (status = 400, description = "Malformed address", body = ErrorResponse),
        (status = 404, description = "Fundraising not found", body = ErrorResponse),
        (status = 502, description = "Indexer unavailable", body = ErrorResponse),
    )
)]
pub async fn get_fundraising(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let view = state.view_service.fundraising_view(&id).await?;
    Ok(Json(view))
}

/// Fundraising routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fundraisings", get(list_fundraisings))
        .route("/fundraisings/{id}", get(get_fundraising))
}
