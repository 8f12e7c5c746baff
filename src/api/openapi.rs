//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{FundraisingListResponse, PaginationMeta, ProposalListResponse};
use super::handlers::{fundraisings, portfolio, proposals, system};
use crate::config::ContractAddresses;
use crate::domain::aggregate::{TimeRemaining, VoteSplit};
use crate::domain::view_model::{
    DataSource, FundingFigures, FundraisingCard, FundraisingView, InvestmentView, NftSummary,
    PropertyDetails, ProposalSummary, ProposalView, TokenSummary, VoteView,
};
use crate::domain::{FundraisingStatus, StatusBadge};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification served next to Swagger UI.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "estate-gateway",
        description = "Read-side gateway for a real-world-asset tokenization marketplace and DAO."
    ),
    paths(
        fundraisings::list_fundraisings,
        fundraisings::get_fundraising,
        proposals::list_proposals,
        proposals::get_proposal,
        portfolio::get_portfolio,
        system::health_handler,
        system::contracts_handler,
    ),
    components(schemas(
        ErrorResponse,
        ErrorBody,
        PaginationMeta,
        FundraisingListResponse,
        ProposalListResponse,
        FundraisingCard,
        FundraisingView,
        FundingFigures,
        PropertyDetails,
        TokenSummary,
        NftSummary,
        InvestmentView,
        ProposalSummary,
        ProposalView,
        VoteView,
        VoteSplit,
        TimeRemaining,
        DataSource,
        FundraisingStatus,
        StatusBadge,
        ContractAddresses,
        system::HealthResponse,
    )),
    tags(
        (name = "Fundraisings", description = "Campaign listing and detail pages"),
        (name = "Governance", description = "DAO proposals and votes"),
        (name = "Portfolio", description = "Per-investor holdings and votes"),
        (name = "System", description = "Health and deployment configuration"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/fundraisings",
            "/api/v1/fundraisings/{id}",
            "/api/v1/proposals",
            "/api/v1/proposals/{id}",
            "/api/v1/investors/{address}/portfolio",
            "/health",
            "/config/contracts",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
