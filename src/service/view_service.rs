//! View service: fetches raw records and derives render-ready views.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::domain::view_model::{
    InvestmentsSection, VoteView, assemble_fundraising, assemble_proposal,
};
use crate::domain::{
    FallbackStore, FundraisingCard, FundraisingView, PortfolioView, ProposalSummary, ProposalView,
    Section,
};
use crate::error::GatewayError;
use crate::source::IndexerClient;

/// Longest accepted entity id.
const MAX_ID_LEN: usize = 128;

/// Page sizes passed to the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizes {
    /// Top-level list queries.
    pub list: u32,
    /// Child collections and per-address queries.
    pub nested: u32,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            list: 100,
            nested: 1000,
        }
    }
}

/// Read-side orchestration for every page the gateway serves.
///
/// Stateless apart from the injected indexer and the fallback listings:
/// every call fetches fresh records and rebuilds the view from scratch.
#[derive(Debug, Clone)]
pub struct ViewService {
    indexer: Arc<dyn IndexerClient>,
    fallback: Arc<FallbackStore>,
    pages: PageSizes,
}

impl ViewService {
    /// Creates a new `ViewService`.
    #[must_use]
    pub fn new(indexer: Arc<dyn IndexerClient>, fallback: FallbackStore, pages: PageSizes) -> Self {
        Self {
            indexer,
            fallback: Arc::new(fallback),
            pages,
        }
    }

    /// Returns the fallback listings.
    #[must_use]
    pub fn fallback(&self) -> &FallbackStore {
        &self.fallback
    }

    /// Builds the fundraising listing page.
    ///
    /// Live campaigns come first in indexer order, followed by listings the
    /// indexer does not know about yet. Live campaigns without a listing
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Propagates indexer failures.
    pub async fn fundraising_cards(&self) -> Result<Vec<FundraisingCard>, GatewayError> {
        let records = self.indexer.fundraisings(self.pages.list).await?;
        let now = Utc::now();

        let mut seen = HashSet::new();
        let mut cards = Vec::with_capacity(self.fallback.len());
        for record in &records {
            let id = record.id.to_lowercase();
            let Some(listing) = self.fallback.get(&id) else {
                tracing::debug!(fundraising = %id, "live fundraising without listing, skipped");
                continue;
            };
            if !seen.insert(id.clone()) {
                continue;
            }
            let view = assemble_fundraising(&id, Some(record), Some(listing), now)?;
            cards.push(FundraisingCard::from(view));
        }
        for listing in self.fallback.iter() {
            let id = listing.id.to_lowercase();
            if seen.contains(&id) {
                continue;
            }
            let view = assemble_fundraising(&id, None, Some(listing), now)?;
            cards.push(FundraisingCard::from(view));
        }

        tracing::debug!(live = records.len(), cards = cards.len(), "fundraising cards built");
        Ok(cards)
    }

    /// Builds the detail page for one fundraising.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidAddress`] for a malformed id,
    /// [`GatewayError::FundraisingNotFound`] when no listing exists, and
    /// propagates indexer failures.
    pub async fn fundraising_view(&self, id: &str) -> Result<FundraisingView, GatewayError> {
        let id = normalize_address(id)?;
        let live = self.indexer.fundraising(&id).await?;
        if live.is_none() {
            tracing::debug!(fundraising = %id, "no live record, using listing");
        }
        assemble_fundraising(&id, live.as_ref(), self.fallback.get(&id), Utc::now())
    }

    /// Builds the governance page rows.
    ///
    /// # Errors
    ///
    /// Propagates indexer failures.
    pub async fn proposal_summaries(&self) -> Result<Vec<ProposalSummary>, GatewayError> {
        let records = self.indexer.proposals(self.pages.list).await?;
        let now = Utc::now();
        Ok(records
            .iter()
            .map(|record| ProposalSummary::from(assemble_proposal(record, now)))
            .collect())
    }

    /// Builds the detail page for one proposal.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for a malformed id,
    /// [`GatewayError::ProposalNotFound`] when the indexer has no such
    /// proposal, and propagates indexer failures.
    pub async fn proposal_view(&self, id: &str) -> Result<ProposalView, GatewayError> {
        let id = normalize_entity_id(id)?;
        let record = self
            .indexer
            .proposal(&id)
            .await?
            .ok_or_else(|| GatewayError::ProposalNotFound(id.clone()))?;
        Ok(assemble_proposal(&record, Utc::now()))
    }

    /// Builds an investor's portfolio.
    ///
    /// Investments and votes are fetched concurrently; a failure in one
    /// section is reported inside that section only.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidAddress`] for a malformed address.
    pub async fn portfolio(&self, address: &str) -> Result<PortfolioView, GatewayError> {
        let address = normalize_address(address)?;
        let (investments, votes) = tokio::join!(
            self.indexer
                .investments_by_investor(&address, self.pages.nested),
            self.indexer.votes_by_voter(&address, self.pages.nested),
        );

        let view = PortfolioView {
            investments: Section::from_result(investments, |records| {
                InvestmentsSection::from_records(&records)
            }),
            votes: Section::from_result(votes, |records| {
                records.iter().map(VoteView::from).collect()
            }),
            address,
        };
        if !view.investments.is_ready() || !view.votes.is_ready() {
            tracing::warn!(address = %view.address, "portfolio section failed to load");
        }
        Ok(view)
    }
}

/// Validates a `0x`-prefixed 20-byte hex address and lowercases it.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidAddress`] when `raw` is not 42 characters
/// of `0x` followed by hex digits.
pub fn normalize_address(raw: &str) -> Result<String, GatewayError> {
    let trimmed = raw.trim();
    let valid = trimmed.len() == 42
        && trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Err(GatewayError::InvalidAddress(raw.to_string()));
    }
    Ok(trimmed.to_lowercase())
}

/// Validates an opaque entity id (proposal ids are decimal or hex).
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for an empty, overlong, or
/// non-alphanumeric id.
pub fn normalize_entity_id(raw: &str) -> Result<String, GatewayError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_ID_LEN {
        return Err(GatewayError::InvalidRequest(format!(
            "id must be 1-{MAX_ID_LEN} characters"
        )));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(GatewayError::InvalidRequest(format!(
            "id contains invalid characters: {raw}"
        )));
    }
    Ok(trimmed.to_lowercase())
}
