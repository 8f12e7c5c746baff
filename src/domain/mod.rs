//! Domain layer: raw indexer records and the pure derivation pipeline.
//!
//! Records flow through unit normalization, status classification, and
//! aggregation into the view models served to clients. Nothing in this
//! module performs I/O except loading the fallback listings file.

pub mod aggregate;
pub mod description;
pub mod fallback;
pub mod records;
pub mod status;
pub mod units;
pub mod view_model;

pub use aggregate::{TimeRemaining, VoteSplit};
pub use description::ProposalDescription;
pub use fallback::{FallbackError, FallbackStore, PropertyListing};
pub use records::{FundraisingRecord, InvestmentRecord, ProposalRecord, VoteRecord};
pub use status::{FundraisingStatus, ProposalStatus, StatusBadge};
pub use view_model::{
    DataSource, FundraisingCard, FundraisingView, PortfolioView, ProposalSummary, ProposalView,
    Section,
};
