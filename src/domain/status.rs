//! Status classification for fundraisings and proposals.
//!
//! Both classifiers are pure functions of already-normalized data. The
//! badge category shown next to a status is a fixed lookup on the status
//! itself; it is not configurable.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

/// Visual category of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusBadge {
    /// Positive terminal or ongoing state.
    Success,
    /// Informational, in progress.
    Info,
    /// Waiting on something.
    Warning,
    /// Negative terminal state.
    Danger,
    /// No meaningful state.
    Neutral,
}

/// Lifecycle of a fundraising campaign as shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum FundraisingStatus {
    /// Open for investment.
    Active,
    /// Deadline passed without completion.
    Expired,
    /// Marked completed by the contract.
    Completed,
}

impl FundraisingStatus {
    /// Classifies a campaign. Completion wins over the deadline; a campaign
    /// is expired only when its deadline is strictly before `now`. An
    /// unknown deadline never expires a campaign.
    #[must_use]
    pub fn classify(
        is_completed: bool,
        deadline: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        if is_completed {
            return Self::Completed;
        }
        match deadline {
            Some(deadline) if deadline < now => Self::Expired,
            _ => Self::Active,
        }
    }

    /// User-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Expired => "Expired",
            Self::Completed => "Completed",
        }
    }

    /// Badge category for this status.
    #[must_use]
    pub const fn badge(self) -> StatusBadge {
        match self {
            Self::Active => StatusBadge::Info,
            Self::Expired => StatusBadge::Danger,
            Self::Completed => StatusBadge::Success,
        }
    }
}

impl fmt::Display for FundraisingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Governor proposal state as shown to users.
///
/// Codes outside the known table (including `2`, whose on-chain meaning
/// is not surfaced by the indexer) are reported as [`Self::Unknown`]
/// rather than being folded into `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalStatus {
    /// Code 0.
    Pending,
    /// Code 1.
    Active,
    /// Code 3.
    Defeated,
    /// Code 4.
    Succeeded,
    /// Code 5.
    Executed,
    /// Any other code, kept for diagnostics.
    Unknown(i64),
}

impl ProposalStatus {
    /// Maps an on-chain state code to a status.
    #[must_use]
    pub fn from_state_code(code: i64) -> Self {
        match code {
            0 => Self::Pending,
            1 => Self::Active,
            3 => Self::Defeated,
            4 => Self::Succeeded,
            5 => Self::Executed,
            other => {
                tracing::warn!(code = other, "unmapped proposal state code");
                Self::Unknown(other)
            }
        }
    }

    /// User-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Defeated => "Defeated",
            Self::Succeeded => "Succeeded",
            Self::Executed => "Executed",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Badge category for this status.
    #[must_use]
    pub const fn badge(self) -> StatusBadge {
        match self {
            Self::Pending => StatusBadge::Warning,
            Self::Active => StatusBadge::Info,
            Self::Defeated => StatusBadge::Danger,
            Self::Succeeded | Self::Executed => StatusBadge::Success,
            Self::Unknown(_) => StatusBadge::Neutral,
        }
    }

    /// Whether votes can currently be cast.
    #[must_use]
    pub const fn is_voting_open(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ProposalStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap_or_default()
    }

    #[test]
    fn completed_wins_regardless_of_deadline() {
        let past = Some(now() - Duration::days(3));
        let future = Some(now() + Duration::days(3));
        for deadline in [past, future, None] {
            assert_eq!(
                FundraisingStatus::classify(true, deadline, now()),
                FundraisingStatus::Completed
            );
        }
    }

    #[test]
    fn past_deadline_is_expired() {
        let past = Some(now() - Duration::seconds(1));
        assert_eq!(
            FundraisingStatus::classify(false, past, now()),
            FundraisingStatus::Expired
        );
    }

    #[test]
    fn future_or_equal_deadline_is_active() {
        let future = Some(now() + Duration::hours(1));
        assert_eq!(
            FundraisingStatus::classify(false, future, now()),
            FundraisingStatus::Active
        );
        assert_eq!(
            FundraisingStatus::classify(false, Some(now()), now()),
            FundraisingStatus::Active
        );
    }

    #[test]
    fn unknown_deadline_is_active() {
        assert_eq!(
            FundraisingStatus::classify(false, None, now()),
            FundraisingStatus::Active
        );
    }

    #[test]
    fn proposal_table_mapping() {
        assert_eq!(ProposalStatus::from_state_code(0).label(), "Pending");
        assert_eq!(ProposalStatus::from_state_code(1).label(), "Active");
        assert_eq!(ProposalStatus::from_state_code(3).label(), "Defeated");
        assert_eq!(ProposalStatus::from_state_code(4).label(), "Succeeded");
        assert_eq!(ProposalStatus::from_state_code(5).label(), "Executed");
    }

    #[test]
    fn unmapped_codes_are_unknown_not_pending() {
        for code in [2, 6, 7, -1, 99] {
            let status = ProposalStatus::from_state_code(code);
            assert_eq!(status, ProposalStatus::Unknown(code));
            assert_eq!(status.label(), "Unknown");
            assert_eq!(status.badge(), StatusBadge::Neutral);
        }
    }

    #[test]
    fn badges_are_fixed() {
        assert_eq!(FundraisingStatus::Completed.badge(), StatusBadge::Success);
        assert_eq!(FundraisingStatus::Expired.badge(), StatusBadge::Danger);
        assert_eq!(ProposalStatus::Pending.badge(), StatusBadge::Warning);
        assert!(ProposalStatus::Active.is_voting_open());
        assert!(!ProposalStatus::Executed.is_voting_open());
    }

    #[test]
    fn statuses_serialize_as_labels() {
        let json = serde_json::to_string(&ProposalStatus::Unknown(2)).unwrap_or_default();
        assert_eq!(json, "\"Unknown\"");
        let json = serde_json::to_string(&FundraisingStatus::Expired).unwrap_or_default();
        assert_eq!(json, "\"Expired\"");
    }
}
