//! Governance handlers: proposal rows and detail page.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{PaginationParams, ProposalListResponse};
use crate::app_state::AppState;
use crate::domain::ProposalView;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /proposals`: Paginated proposal rows.
///
/// # Errors
///
/// Returns [`GatewayError`] when the indexer cannot be queried.
#[utoipa::path(
    get,
    path = "/api/v1/proposals",
    tag = "Governance",
    summary = "List proposals",
    description = "Returns proposal rows with status, vote split, and countdown.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated proposal rows", body = ProposalListResponse),
        (status = 502, description = "Indexer unavailable", body = ErrorResponse),
    )
)]
pub async fn list_proposals(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let summaries = state.view_service.proposal_summaries().await?;
    let (data, pagination) = params.paginate(summaries);
    Ok(Json(ProposalListResponse { data, pagination }))
}

/// `GET /proposals/{id}`: Proposal detail page.
///
/// # Errors
///
/// Returns [`GatewayError::ProposalNotFound`] for an unknown proposal.
#[utoipa::path(
    get,
    path = "/api/v1/proposals/{id}",
    tag = "Governance",
    summary = "Get proposal details",
    description = "Returns one proposal with its decoded description, tallies, splits, and vote rows.",
    params(
        ("id" = String, Path, description = "Proposal id"),
    ),
    responses(
        (status = 200, description = "Proposal details", body = ProposalView),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Proposal not found", body = ErrorResponse),
        (status = 502, description = "Indexer unavailable", body = ErrorResponse),
    )
)]
pub async fn get_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let view = state.view_service.proposal_view(&id).await?;
    Ok(Json(view))
}

/// Governance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/proposals", get(list_proposals))
        .route("/proposals/{id}", get(get_proposal))
}
