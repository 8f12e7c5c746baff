//! Raw source adapter: the indexer boundary.
//!
//! [`IndexerClient`] is the seam between the gateway and the subgraph. It is
//! injected as `Arc<dyn IndexerClient>` into [`crate::service::ViewService`]
//! so that tests can substitute a stub; there is no process-wide client.
//! Implementations return typed records and map transport failures to
//! [`GatewayError::IndexerUnavailable`] and malformed responses to
//! [`GatewayError::IndexerResponse`].

pub mod memory;
pub mod queries;
pub mod subgraph;

use std::fmt;

use futures_util::future::BoxFuture;

use crate::domain::{FundraisingRecord, InvestmentRecord, ProposalRecord, VoteRecord};
use crate::error::GatewayError;

pub use memory::MemoryIndexer;
pub use subgraph::SubgraphClient;

/// Result of an indexer call.
pub type IndexerResult<T> = Result<T, GatewayError>;

/// Read access to the marketplace indexer.
///
/// Every call is a fresh fetch; implementations must not cache.
pub trait IndexerClient: Send + Sync + fmt::Debug {
    /// Lists up to `first` fundraisings.
    fn fundraisings(&self, first: u32) -> BoxFuture<'_, IndexerResult<Vec<FundraisingRecord>>>;

    /// Fetches one fundraising; `Ok(None)` when the indexer has no record.
    fn fundraising<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, IndexerResult<Option<FundraisingRecord>>>;

    /// Lists up to `first` proposals.
    fn proposals(&self, first: u32) -> BoxFuture<'_, IndexerResult<Vec<ProposalRecord>>>;

    /// Fetches one proposal; `Ok(None)` when the indexer has no record.
    fn proposal<'a>(&'a self, id: &'a str) -> BoxFuture<'a, IndexerResult<Option<ProposalRecord>>>;

    /// Lists up to `first` investments made by `investor`.
    fn investments_by_investor<'a>(
        &'a self,
        investor: &'a str,
        first: u32,
    ) -> BoxFuture<'a, IndexerResult<Vec<InvestmentRecord>>>;

    /// Lists up to `first` votes cast by `voter`.
    fn votes_by_voter<'a>(
        &'a self,
        voter: &'a str,
        first: u32,
    ) -> BoxFuture<'a, IndexerResult<Vec<VoteRecord>>>;
}
