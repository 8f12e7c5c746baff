//! List response envelopes for the view endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{FundraisingCard, ProposalSummary};

/// Paginated fundraising cards.
#[derive(Debug, Serialize, ToSchema)]
pub struct FundraisingListResponse {
    /// Cards on this page.
    pub data: Vec<FundraisingCard>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Paginated proposal rows.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProposalListResponse {
    /// Rows on this page.
    pub data: Vec<ProposalSummary>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
