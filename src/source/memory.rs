//! In-memory [`IndexerClient`] for tests and local demos.
//!
//! Records are fixed at construction. Individual operations can be made to
//! fail, and lookups by id can be delayed to simulate a slow indexer.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use super::{IndexerClient, IndexerResult};
use crate::domain::{FundraisingRecord, InvestmentRecord, ProposalRecord, VoteRecord};
use crate::error::GatewayError;

/// Operation names accepted by [`MemoryIndexer::failing`].
pub const OPERATIONS: [&str; 6] = [
    "fundraisings",
    "fundraising",
    "proposals",
    "proposal",
    "investments_by_investor",
    "votes_by_voter",
];

/// Fixed-content indexer.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndexer {
    fundraisings: Vec<FundraisingRecord>,
    proposals: Vec<ProposalRecord>,
    investments: Vec<InvestmentRecord>,
    votes: Vec<VoteRecord>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
}

impl MemoryIndexer {
    /// Creates an empty indexer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fundraising.
    #[must_use]
    pub fn with_fundraising(mut self, record: FundraisingRecord) -> Self {
        self.fundraisings.push(record);
        self
    }

    /// Adds a proposal.
    #[must_use]
    pub fn with_proposal(mut self, record: ProposalRecord) -> Self {
        self.proposals.push(record);
        self
    }

    /// Adds a standalone investment, returned by per-investor queries.
    #[must_use]
    pub fn with_investment(mut self, record: InvestmentRecord) -> Self {
        self.investments.push(record);
        self
    }

    /// Adds a standalone vote, returned by per-voter queries.
    #[must_use]
    pub fn with_vote(mut self, record: VoteRecord) -> Self {
        self.votes.push(record);
        self
    }

    /// Makes `operation` (one of [`OPERATIONS`]) fail as unavailable.
    /// Unknown names are ignored with a warning.
    #[must_use]
    pub fn failing(mut self, operation: &str) -> Self {
        if OPERATIONS.contains(&operation) {
            self.failing.insert(operation.to_string());
        } else {
            tracing::warn!(operation, "unknown memory indexer operation, ignoring");
        }
        self
    }

    /// Delays lookups keyed by `id` (an entity id or an address) by `delay`.
    #[must_use]
    pub fn delayed(mut self, id: &str, delay: Duration) -> Self {
        self.delays.insert(id.to_string(), delay);
        self
    }

    fn check(&self, operation: &str) -> IndexerResult<()> {
        if self.failing.contains(operation) {
            return Err(GatewayError::IndexerUnavailable(format!(
                "{operation}: memory indexer configured to fail"
            )));
        }
        Ok(())
    }

    async fn pause(&self, id: &str) {
        if let Some(delay) = self.delays.get(id) {
            tokio::time::sleep(*delay).await;
        }
    }
}

fn take<T: Clone>(items: &[T], first: u32) -> Vec<T> {
    items
        .iter()
        .take(usize::try_from(first).unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

impl IndexerClient for MemoryIndexer {
    fn fundraisings(&self, first: u32) -> BoxFuture<'_, IndexerResult<Vec<FundraisingRecord>>> {
        async move {
            self.check("fundraisings")?;
            Ok(take(&self.fundraisings, first))
        }
        .boxed()
    }

    fn fundraising<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, IndexerResult<Option<FundraisingRecord>>> {
        async move {
            self.pause(id).await;
            self.check("fundraising")?;
            Ok(self.fundraisings.iter().find(|f| f.id == id).cloned())
        }
        .boxed()
    }

    fn proposals(&self, first: u32) -> BoxFuture<'_, IndexerResult<Vec<ProposalRecord>>> {
        async move {
            self.check("proposals")?;
            Ok(take(&self.proposals, first))
        }
        .boxed()
    }

    fn proposal<'a>(&'a self, id: &'a str) -> BoxFuture<'a, IndexerResult<Option<ProposalRecord>>> {
        async move {
            self.pause(id).await;
            self.check("proposal")?;
            Ok(self.proposals.iter().find(|p| p.id == id).cloned())
        }
        .boxed()
    }

    fn investments_by_investor<'a>(
        &'a self,
        investor: &'a str,
        first: u32,
    ) -> BoxFuture<'a, IndexerResult<Vec<InvestmentRecord>>> {
        async move {
            self.pause(investor).await;
            self.check("investments_by_investor")?;
            let matching: Vec<InvestmentRecord> = self
                .investments
                .iter()
                .filter(|inv| inv.investor == investor)
                .cloned()
                .collect();
            Ok(take(&matching, first))
        }
        .boxed()
    }

    fn votes_by_voter<'a>(
        &'a self,
        voter: &'a str,
        first: u32,
    ) -> BoxFuture<'a, IndexerResult<Vec<VoteRecord>>> {
        async move {
            self.pause(voter).await;
            self.check("votes_by_voter")?;
            let matching: Vec<VoteRecord> = self
                .votes
                .iter()
                .filter(|vote| vote.voter == voter)
                .cloned()
                .collect();
            Ok(take(&matching, first))
        }
        .boxed()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn fundraising(id: &str) -> FundraisingRecord {
        FundraisingRecord {
            id: id.to_string(),
            ..FundraisingRecord::default()
        }
    }

    #[tokio::test]
    async fn lists_respect_first() {
        let indexer = MemoryIndexer::new()
            .with_fundraising(fundraising("0x1"))
            .with_fundraising(fundraising("0x2"))
            .with_fundraising(fundraising("0x3"));
        let Ok(page) = indexer.fundraisings(2).await else {
            panic!("no failure configured");
        };
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn lookup_by_id() {
        let indexer = MemoryIndexer::new().with_fundraising(fundraising("0x1"));
        assert!(matches!(indexer.fundraising("0x1").await, Ok(Some(_))));
        assert!(matches!(indexer.fundraising("0x9").await, Ok(None)));
    }

    #[tokio::test]
    async fn configured_failure() {
        let indexer = MemoryIndexer::new().failing("proposals");
        assert!(matches!(
            indexer.proposals(10).await,
            Err(GatewayError::IndexerUnavailable(_))
        ));
        assert!(indexer.votes_by_voter("0xv", 10).await.is_ok());
    }

    #[tokio::test]
    async fn every_listed_operation_can_fail() {
        for operation in OPERATIONS {
            let indexer = MemoryIndexer::new().failing(operation);
            let failed = match operation {
                "fundraisings" => indexer.fundraisings(1).await.is_err(),
                "fundraising" => indexer.fundraising("0x1").await.is_err(),
                "proposals" => indexer.proposals(1).await.is_err(),
                "proposal" => indexer.proposal("1").await.is_err(),
                "investments_by_investor" => {
                    indexer.investments_by_investor("0xa", 1).await.is_err()
                }
                "votes_by_voter" => indexer.votes_by_voter("0xa", 1).await.is_err(),
                other => panic!("operation without a dispatch arm: {other}"),
            };
            assert!(failed, "{operation} should fail");
        }
    }

    #[tokio::test]
    async fn unknown_operation_name_is_ignored() {
        let indexer = MemoryIndexer::new().failing("swaps");
        assert!(indexer.failing.is_empty());
        assert!(indexer.fundraisings(1).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_lookup_waits() {
        let indexer = MemoryIndexer::new()
            .with_fundraising(fundraising("0x1"))
            .delayed("0x1", Duration::from_secs(30));
        let started = tokio::time::Instant::now();
        let _ = indexer.fundraising("0x1").await;
        assert!(started.elapsed() >= Duration::from_secs(30));
    }
}
