//! Render-ready view models and the assembler that builds them.
//!
//! Assembly merges a live indexer record with its static
//! [`PropertyListing`]: a field that is present and readable in the live
//! record wins, anything absent or malformed falls back to the listing.
//! Malformed values are logged and absorbed here; the only error a caller
//! can see is "not found". View models are rebuilt on every request.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::aggregate::{
    TimeRemaining, VoteSplit, average_investment, progress_percent, unique_investor_count,
};
use super::description::ProposalDescription;
use super::fallback::PropertyListing;
use super::records::{
    FundraisingRecord, InvestmentRecord, NftRecord, PropertyTokenRecord, ProposalRecord,
    VoteRecord,
};
use super::status::{FundraisingStatus, ProposalStatus, StatusBadge};
use super::units::{
    format_amount, format_percent, format_timestamp, normalize_wei, parse_decimal, parse_wei,
    parse_unix_seconds, parse_unix_seconds_strict,
};
use crate::error::GatewayError;

/// Fraction digits used for token amounts.
const AMOUNT_DIGITS: usize = 2;

/// Where the figures of a view came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Indexer record merged with the listing.
    Live,
    /// No indexer record; placeholder figures from the listing.
    Fallback,
}

/// Off-chain property details shown on listing and detail pages.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PropertyDetails {
    /// Display name.
    pub name: String,
    /// City / region.
    pub location: String,
    /// Hero image URL.
    pub image_url: String,
    /// Marketing description.
    pub description: String,
    /// Amenity list.
    pub amenities: Vec<String>,
    /// Property category.
    pub property_type: String,
    /// Floor area in square feet.
    pub area_sqft: u32,
    /// Projected annual yield, in percent.
    pub expected_yield_percent: f64,
}

impl From<&PropertyListing> for PropertyDetails {
    fn from(listing: &PropertyListing) -> Self {
        Self {
            name: listing.name.clone(),
            location: listing.location.clone(),
            image_url: listing.image_url.clone(),
            description: listing.description.clone(),
            amenities: listing.amenities.clone(),
            property_type: listing.property_type.clone(),
            area_sqft: listing.area_sqft,
            expected_yield_percent: listing.expected_yield_percent,
        }
    }
}

/// Goal, raised, and bounds of a campaign, with display strings.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FundingFigures {
    /// Campaign goal in token units.
    pub goal: f64,
    /// Amount raised in token units.
    pub raised: f64,
    /// Smallest accepted contribution.
    pub min_investment: f64,
    /// Largest accepted contribution.
    pub max_investment: f64,
    /// `raised / goal`, clamped to `[0, 100]`.
    pub progress_percent: f64,
    /// Formatted goal.
    pub goal_display: String,
    /// Formatted raised amount.
    pub raised_display: String,
    /// Formatted minimum contribution.
    pub min_investment_display: String,
    /// Formatted maximum contribution.
    pub max_investment_display: String,
    /// Formatted progress, e.g. `65.0%`.
    pub progress_display: String,
}

impl FundingFigures {
    fn new(goal: f64, raised: f64, min_investment: f64, max_investment: f64) -> Self {
        let progress = progress_percent(raised, goal);
        Self {
            goal,
            raised,
            min_investment,
            max_investment,
            progress_percent: progress,
            goal_display: format_amount(goal, AMOUNT_DIGITS),
            raised_display: format_amount(raised, AMOUNT_DIGITS),
            min_investment_display: format_amount(min_investment, AMOUNT_DIGITS),
            max_investment_display: format_amount(max_investment, AMOUNT_DIGITS),
            progress_display: format_percent(progress),
        }
    }
}

/// Property token summary.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TokenSummary {
    /// Token contract address.
    pub address: String,
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Total supply in token units.
    pub total_supply: f64,
    /// Formatted total supply.
    pub total_supply_display: String,
}

impl From<&PropertyTokenRecord> for TokenSummary {
    fn from(token: &PropertyTokenRecord) -> Self {
        let total_supply = normalize_wei(token.total_supply.as_deref());
        Self {
            address: token.id.clone(),
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            total_supply,
            total_supply_display: format_amount(total_supply, AMOUNT_DIGITS),
        }
    }
}

/// Property NFT summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NftSummary {
    /// Token id within the NFT contract.
    pub token_id: String,
    /// Metadata URI.
    pub token_uri: String,
    /// Current holder.
    pub owner: String,
}

impl From<&NftRecord> for NftSummary {
    fn from(nft: &NftRecord) -> Self {
        Self {
            token_id: nft.token_id.clone(),
            token_uri: nft.token_uri.clone(),
            owner: nft.owner.clone(),
        }
    }
}

/// One contribution row.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InvestmentView {
    /// Investment entity id.
    pub id: String,
    /// Investor address.
    pub investor: String,
    /// Campaign the investment belongs to, when known.
    pub fundraising_id: Option<String>,
    /// Amount in token units.
    pub amount: f64,
    /// Formatted amount.
    pub amount_display: String,
    /// Share of the campaign goal, clamped; `None` when the goal is unknown.
    pub share_of_goal_percent: Option<f64>,
    /// Whether the dividend was claimed.
    pub claimed: bool,
    /// Contribution time.
    pub timestamp: Option<DateTime<Utc>>,
    /// Formatted contribution time or `Unknown`.
    pub timestamp_display: String,
}

impl InvestmentView {
    /// Builds a row; `goal` enables the share-of-goal column.
    #[must_use]
    pub fn from_record(record: &InvestmentRecord, goal: Option<f64>) -> Self {
        let amount = normalize_wei(record.amount.as_deref());
        let timestamp = parse_unix_seconds(record.timestamp.as_deref());
        Self {
            id: record.id.clone(),
            investor: record.investor.clone(),
            fundraising_id: record.fundraising.as_ref().map(|f| f.id.clone()),
            amount,
            amount_display: format_amount(amount, AMOUNT_DIGITS),
            share_of_goal_percent: goal.map(|goal| progress_percent(amount, goal)),
            claimed: record.claimed,
            timestamp,
            timestamp_display: format_timestamp(timestamp),
        }
    }
}

/// Fundraising detail page.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FundraisingView {
    /// Campaign contract address.
    pub id: String,
    /// Where the figures came from.
    pub source: DataSource,
    /// Property owner, when indexed.
    pub owner: Option<String>,
    /// Off-chain property details.
    pub property: PropertyDetails,
    /// Campaign status.
    pub status: FundraisingStatus,
    /// Badge category for `status`.
    pub badge: StatusBadge,
    /// Campaign deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Formatted deadline or `Unknown`.
    pub deadline_display: String,
    /// Countdown to the deadline.
    pub time_remaining: TimeRemaining,
    /// Formatted countdown.
    pub time_remaining_display: String,
    /// Goal, raised, bounds, progress.
    pub funding: FundingFigures,
    /// Distinct investor addresses.
    pub investor_count: usize,
    /// Number of contributions.
    pub investment_count: usize,
    /// Mean contribution size.
    pub average_investment: f64,
    /// Formatted mean contribution size.
    pub average_investment_display: String,
    /// Symbol of the property token (indexed, or from the listing).
    pub token_symbol: String,
    /// Indexed property token.
    pub property_token: Option<TokenSummary>,
    /// Indexed property NFT.
    pub nft: Option<NftSummary>,
    /// Contribution rows.
    pub investments: Vec<InvestmentView>,
}

/// Fundraising card on the listing page.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FundraisingCard {
    /// Campaign contract address.
    pub id: String,
    /// Where the figures came from.
    pub source: DataSource,
    /// Display name.
    pub name: String,
    /// City / region.
    pub location: String,
    /// Hero image URL.
    pub image_url: String,
    /// Property category.
    pub property_type: String,
    /// Projected annual yield, in percent.
    pub expected_yield_percent: f64,
    /// Campaign status.
    pub status: FundraisingStatus,
    /// Badge category for `status`.
    pub badge: StatusBadge,
    /// Clamped progress.
    pub progress_percent: f64,
    /// Formatted progress.
    pub progress_display: String,
    /// Formatted goal.
    pub goal_display: String,
    /// Formatted raised amount.
    pub raised_display: String,
    /// Distinct investor addresses.
    pub investor_count: usize,
    /// Formatted countdown.
    pub time_remaining_display: String,
}

impl From<FundraisingView> for FundraisingCard {
    fn from(view: FundraisingView) -> Self {
        Self {
            id: view.id,
            source: view.source,
            name: view.property.name,
            location: view.property.location,
            image_url: view.property.image_url,
            property_type: view.property.property_type,
            expected_yield_percent: view.property.expected_yield_percent,
            status: view.status,
            badge: view.badge,
            progress_percent: view.funding.progress_percent,
            progress_display: view.funding.progress_display,
            goal_display: view.funding.goal_display,
            raised_display: view.funding.raised_display,
            investor_count: view.investor_count,
            time_remaining_display: view.time_remaining_display,
        }
    }
}

/// Reads a live wei amount, falling back when it is absent or malformed.
fn wei_or(raw: Option<&str>, fallback: f64, field: &'static str) -> f64 {
    match raw.map(parse_wei) {
        Some(Ok(value)) => value,
        None => fallback,
        Some(Err(err)) => {
            tracing::warn!(field, error = %err, "malformed live amount, using fallback");
            fallback
        }
    }
}

fn deadline_or(raw: Option<&str>, fallback: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match raw.map(parse_unix_seconds_strict) {
        Some(Ok(ts)) => Some(ts),
        None => fallback,
        Some(Err(err)) => {
            tracing::warn!(error = %err, "malformed live deadline, using fallback");
            fallback
        }
    }
}

/// Builds the detail view for a fundraising.
///
/// # Errors
///
/// Returns [`GatewayError::FundraisingNotFound`] when there is no listing
/// for `id`; a partially populated page is never produced.
pub fn assemble_fundraising(
    id: &str,
    live: Option<&FundraisingRecord>,
    listing: Option<&PropertyListing>,
    now: DateTime<Utc>,
) -> Result<FundraisingView, GatewayError> {
    let Some(listing) = listing else {
        return Err(GatewayError::FundraisingNotFound(id.to_string()));
    };
    let placeholder = &listing.funding;

    let view = match live {
        Some(record) => {
            let goal = wei_or(record.goal_amount.as_deref(), placeholder.goal, "goal_amount");
            let raised = wei_or(
                record.total_raised.as_deref(),
                placeholder.raised,
                "total_raised",
            );
            let min_investment = wei_or(
                record.min_investment.as_deref(),
                placeholder.min_investment,
                "min_investment",
            );
            let max_investment = wei_or(
                record.max_investment.as_deref(),
                placeholder.max_investment,
                "max_investment",
            );
            let deadline = deadline_or(record.deadline.as_deref(), placeholder.deadline);
            let investments: Vec<InvestmentView> = record
                .investments
                .iter()
                .map(|inv| InvestmentView::from_record(inv, Some(goal)))
                .collect();
            let average = average_investment(raised, record.investments.len());
            let property_token = record.property_token.as_ref().map(TokenSummary::from);
            let token_symbol = property_token
                .as_ref()
                .map(|t| t.symbol.clone())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| listing.token_symbol.clone());

            build_view(
                id,
                DataSource::Live,
                listing,
                FundraisingStatus::classify(record.is_completed, deadline, now),
                deadline,
                FundingFigures::new(goal, raised, min_investment, max_investment),
                unique_investor_count(&record.investments),
                average,
                now,
                Extras {
                    owner: Some(record.owner.clone()).filter(|o| !o.is_empty()),
                    token_symbol,
                    property_token,
                    nft: record.nft.as_ref().map(NftSummary::from),
                    investments,
                },
            )
        }
        None => build_view(
            id,
            DataSource::Fallback,
            listing,
            FundraisingStatus::classify(placeholder.is_completed, placeholder.deadline, now),
            placeholder.deadline,
            FundingFigures::new(
                placeholder.goal,
                placeholder.raised,
                placeholder.min_investment,
                placeholder.max_investment,
            ),
            placeholder.investor_count,
            average_investment(placeholder.raised, placeholder.investor_count),
            now,
            Extras {
                owner: None,
                token_symbol: listing.token_symbol.clone(),
                property_token: None,
                nft: None,
                investments: Vec::new(),
            },
        ),
    };
    Ok(view)
}

struct Extras {
    owner: Option<String>,
    token_symbol: String,
    property_token: Option<TokenSummary>,
    nft: Option<NftSummary>,
    investments: Vec<InvestmentView>,
}

#[allow(clippy::too_many_arguments)]
fn build_view(
    id: &str,
    source: DataSource,
    listing: &PropertyListing,
    status: FundraisingStatus,
    deadline: Option<DateTime<Utc>>,
    funding: FundingFigures,
    investor_count: usize,
    average: f64,
    now: DateTime<Utc>,
    extras: Extras,
) -> FundraisingView {
    let time_remaining = TimeRemaining::until(deadline, now);
    FundraisingView {
        id: id.to_string(),
        source,
        owner: extras.owner,
        property: PropertyDetails::from(listing),
        status,
        badge: status.badge(),
        deadline,
        deadline_display: format_timestamp(deadline),
        time_remaining,
        time_remaining_display: time_remaining.to_string(),
        funding,
        investor_count,
        investment_count: extras.investments.len(),
        average_investment: average,
        average_investment_display: format_amount(average, AMOUNT_DIGITS),
        token_symbol: extras.token_symbol,
        property_token: extras.property_token,
        nft: extras.nft,
        investments: extras.investments,
    }
}

/// One vote row.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VoteView {
    /// Vote entity id.
    pub id: String,
    /// Voter address.
    pub voter: String,
    /// Proposal voted on, when known.
    pub proposal_id: Option<String>,
    /// `true` for a vote in favour.
    pub support: bool,
    /// `For` or `Against`.
    pub choice: String,
    /// Voting weight in token units.
    pub weight: f64,
    /// Formatted weight.
    pub weight_display: String,
    /// Time the vote was cast.
    pub timestamp: Option<DateTime<Utc>>,
    /// Formatted time or `Unknown`.
    pub timestamp_display: String,
}

impl From<&VoteRecord> for VoteView {
    fn from(vote: &VoteRecord) -> Self {
        let weight = normalize_wei(vote.weight.as_deref());
        let timestamp = parse_unix_seconds(vote.timestamp.as_deref());
        Self {
            id: vote.id.clone(),
            voter: vote.voter.clone(),
            proposal_id: vote.proposal.as_ref().map(|p| p.id.clone()),
            support: vote.support,
            choice: if vote.support { "For" } else { "Against" }.to_string(),
            weight,
            weight_display: format_amount(weight, AMOUNT_DIGITS),
            timestamp,
            timestamp_display: format_timestamp(timestamp),
        }
    }
}

/// Proposal detail page.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProposalView {
    /// Proposal id.
    pub id: String,
    /// Proposer address.
    pub proposer: String,
    /// Headline from the description payload.
    pub title: String,
    /// Body from the description payload.
    pub detail: String,
    /// `false` when the description payload was malformed.
    pub description_well_formed: bool,
    /// Proposal status label.
    #[schema(value_type = String)]
    pub status: ProposalStatus,
    /// Badge category for `status`.
    pub badge: StatusBadge,
    /// Raw governor state code.
    pub state_code: i64,
    /// Whether votes can currently be cast.
    pub voting_open: bool,
    /// Voting start.
    pub start_time: Option<DateTime<Utc>>,
    /// Formatted start or `Unknown`.
    pub start_display: String,
    /// Voting end.
    pub end_time: Option<DateTime<Utc>>,
    /// Formatted end or `Unknown`.
    pub end_display: String,
    /// Countdown to the end of voting.
    pub time_remaining: TimeRemaining,
    /// Formatted countdown.
    pub time_remaining_display: String,
    /// Raw tally in favour.
    pub for_votes: String,
    /// Raw tally against.
    pub against_votes: String,
    /// Raw abstain tally.
    pub abstain_votes: String,
    /// For/against split.
    pub split: VoteSplit,
    /// For/against/abstain split.
    pub split_with_abstain: VoteSplit,
    /// Formatted share in favour.
    pub for_percent_display: String,
    /// Formatted share against.
    pub against_percent_display: String,
    /// Number of individual votes.
    pub vote_count: usize,
    /// Vote rows.
    pub votes: Vec<VoteView>,
}

/// Proposal row on the governance page.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProposalSummary {
    /// Proposal id.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Proposal status label.
    #[schema(value_type = String)]
    pub status: ProposalStatus,
    /// Badge category for `status`.
    pub badge: StatusBadge,
    /// For/against split.
    pub split: VoteSplit,
    /// Formatted share in favour.
    pub for_percent_display: String,
    /// Formatted share against.
    pub against_percent_display: String,
    /// Formatted end of voting.
    pub end_display: String,
    /// Formatted countdown.
    pub time_remaining_display: String,
}

impl From<ProposalView> for ProposalSummary {
    fn from(view: ProposalView) -> Self {
        Self {
            id: view.id,
            title: view.title,
            status: view.status,
            badge: view.badge,
            split: view.split,
            for_percent_display: view.for_percent_display,
            against_percent_display: view.against_percent_display,
            end_display: view.end_display,
            time_remaining_display: view.time_remaining_display,
        }
    }
}

fn raw_tally(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("0")
        .to_string()
}

/// Builds the detail view for a proposal. Never fails: malformed tallies
/// read as `0` and a malformed description degrades to a placeholder.
#[must_use]
pub fn assemble_proposal(record: &ProposalRecord, now: DateTime<Utc>) -> ProposalView {
    let description = ProposalDescription::parse(&record.description);
    let status = ProposalStatus::from_state_code(record.state);
    let start_time = parse_unix_seconds(record.start_time.as_deref());
    let end_time = parse_unix_seconds(record.end_time.as_deref());
    let time_remaining = TimeRemaining::until(end_time, now);

    let for_votes = parse_decimal(record.for_votes.as_deref());
    let against_votes = parse_decimal(record.against_votes.as_deref());
    let abstain_votes = parse_decimal(record.abstain_votes.as_deref());
    let split = VoteSplit::two_way(for_votes, against_votes);

    ProposalView {
        id: record.id.clone(),
        proposer: record.proposer.clone(),
        title: description.title,
        detail: description.detail,
        description_well_formed: description.well_formed,
        status,
        badge: status.badge(),
        state_code: record.state,
        voting_open: status.is_voting_open(),
        start_time,
        start_display: format_timestamp(start_time),
        end_time,
        end_display: format_timestamp(end_time),
        time_remaining,
        time_remaining_display: time_remaining.to_string(),
        for_votes: raw_tally(record.for_votes.as_deref()),
        against_votes: raw_tally(record.against_votes.as_deref()),
        abstain_votes: raw_tally(record.abstain_votes.as_deref()),
        split,
        split_with_abstain: VoteSplit::three_way(for_votes, against_votes, abstain_votes),
        for_percent_display: format_percent(split.for_percent),
        against_percent_display: format_percent(split.against_percent),
        vote_count: record.votes.len(),
        votes: record.votes.iter().map(VoteView::from).collect(),
    }
}

/// One independently fetched part of a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Section<T> {
    /// Data arrived and was derived.
    Ready {
        /// Section payload.
        data: T,
    },
    /// The fetch for this section failed; other sections are unaffected.
    Failed {
        /// Gateway error code.
        code: u32,
        /// Human-readable message.
        message: String,
    },
}

impl<T> Section<T> {
    /// Wraps a fetch result, deriving the payload on success.
    pub fn from_result<R>(result: Result<R, GatewayError>, derive: impl FnOnce(R) -> T) -> Self {
        match result {
            Ok(raw) => Self::Ready { data: derive(raw) },
            Err(err) => Self::Failed {
                code: err.error_code(),
                message: err.to_string(),
            },
        }
    }

    /// `true` when the section has data.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// An investor's contributions with totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentsSection {
    /// Contribution rows.
    pub rows: Vec<InvestmentView>,
    /// Sum of all contributions in token units.
    pub total_invested: f64,
    /// Formatted sum.
    pub total_invested_display: String,
    /// Distinct campaigns invested in.
    pub fundraising_count: usize,
    /// Contributions whose dividend is still unclaimed.
    pub unclaimed_count: usize,
}

impl InvestmentsSection {
    /// Derives the section from raw investment records.
    #[must_use]
    pub fn from_records(records: &[InvestmentRecord]) -> Self {
        let rows: Vec<InvestmentView> = records
            .iter()
            .map(|inv| InvestmentView::from_record(inv, None))
            .collect();
        let total_invested: f64 = rows.iter().map(|r| r.amount).sum();
        let fundraising_count = rows
            .iter()
            .filter_map(|r| r.fundraising_id.as_deref())
            .collect::<HashSet<_>>()
            .len();
        let unclaimed_count = rows.iter().filter(|r| !r.claimed).count();
        Self {
            rows,
            total_invested,
            total_invested_display: format_amount(total_invested, AMOUNT_DIGITS),
            fundraising_count,
            unclaimed_count,
        }
    }
}

/// Investor portfolio page; each section loads and fails independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioView {
    /// Investor address.
    pub address: String,
    /// Contributions section.
    pub investments: Section<InvestmentsSection>,
    /// Governance votes section.
    pub votes: Section<Vec<VoteView>>,
}
