//! Aggregates derived from collections of raw records.
//!
//! Every ratio here guards its divisor: an empty tally, a zero goal, or an
//! empty investment list yields `0`, never `NaN` or infinity.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::records::InvestmentRecord;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Share of each side of a tally, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, ToSchema)]
pub struct VoteSplit {
    /// Percentage of weight in favour.
    pub for_percent: f64,
    /// Percentage of weight against.
    pub against_percent: f64,
    /// Percentage of weight abstaining; always `0` for a two-way split.
    pub abstain_percent: f64,
}

impl VoteSplit {
    /// Splits a for/against tally. No votes → both `0`.
    #[must_use]
    pub fn two_way(for_votes: f64, against_votes: f64) -> Self {
        Self::three_way(for_votes, against_votes, 0.0)
    }

    /// Splits a for/against/abstain tally. No votes → all `0`. A negative
    /// side counts as `0` so every share stays within `[0, 100]`.
    #[must_use]
    pub fn three_way(for_votes: f64, against_votes: f64, abstain_votes: f64) -> Self {
        let for_votes = for_votes.max(0.0);
        let against_votes = against_votes.max(0.0);
        let abstain_votes = abstain_votes.max(0.0);
        let total = for_votes + against_votes + abstain_votes;
        if !(total.is_finite() && total > 0.0) {
            return Self::default();
        }
        Self {
            for_percent: for_votes / total * 100.0,
            against_percent: against_votes / total * 100.0,
            abstain_percent: abstain_votes / total * 100.0,
        }
    }
}

/// Clamps a percentage into `[0, 100]`; non-finite values read as `0`.
#[must_use]
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// `part / whole × 100`, clamped to `[0, 100]`. A non-positive `whole`
/// yields `0`.
#[must_use]
pub fn progress_percent(part: f64, whole: f64) -> f64 {
    if !(whole.is_finite() && whole > 0.0) {
        return 0.0;
    }
    clamp_percent(part / whole * 100.0)
}

/// Number of distinct investor addresses. Addresses compare as raw strings,
/// so `0xAb` and `0xab` count twice.
#[must_use]
pub fn unique_investor_count(investments: &[InvestmentRecord]) -> usize {
    investments
        .iter()
        .map(|inv| inv.investor.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Mean contribution size; `0` when there are no contributions.
#[must_use]
pub fn average_investment(total_raised: f64, investment_count: usize) -> f64 {
    if investment_count == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = investment_count as f64;
    total_raised / count
}

/// Time left until a deadline, decomposed for countdown display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimeRemaining {
    /// Deadline is still ahead.
    Remaining {
        /// Whole days.
        days: i64,
        /// Hours after whole days.
        hours: i64,
        /// Minutes after whole hours.
        minutes: i64,
        /// Seconds after whole minutes.
        seconds: i64,
    },
    /// Deadline reached or passed.
    Expired,
    /// Deadline could not be read.
    Unknown,
}

impl TimeRemaining {
    /// Computes the time left between `now` and `deadline`. Zero or
    /// negative remaining time is [`Self::Expired`].
    #[must_use]
    pub fn until(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(deadline) = deadline else {
            return Self::Unknown;
        };
        let total = (deadline - now).num_seconds();
        if total <= 0 {
            return Self::Expired;
        }
        let days = total / SECONDS_PER_DAY;
        let rest = total % SECONDS_PER_DAY;
        let hours = rest / SECONDS_PER_HOUR;
        let rest = rest % SECONDS_PER_HOUR;
        let minutes = rest / SECONDS_PER_MINUTE;
        let seconds = rest % SECONDS_PER_MINUTE;
        Self::Remaining {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// `true` once the deadline has passed.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remaining {
                days,
                hours,
                minutes,
                seconds,
            } => write!(f, "{days}d {hours}h {minutes}m {seconds}s"),
            Self::Expired => f.write_str("Expired"),
            Self::Unknown => f.write_str(super::units::UNKNOWN_PLACEHOLDER),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn investment(investor: &str) -> InvestmentRecord {
        InvestmentRecord {
            investor: investor.to_string(),
            ..InvestmentRecord::default()
        }
    }

    #[test]
    fn two_way_split() {
        let split = VoteSplit::two_way(3.0, 1.0);
        assert_eq!(split.for_percent, 75.0);
        assert_eq!(split.against_percent, 25.0);
        assert_eq!(split.abstain_percent, 0.0);
    }

    #[test]
    fn empty_tallies_are_zero_not_nan() {
        let split = VoteSplit::two_way(0.0, 0.0);
        assert_eq!(split, VoteSplit::default());
        let split = VoteSplit::three_way(0.0, 0.0, 0.0);
        assert!(!split.for_percent.is_nan());
        assert_eq!(split.abstain_percent, 0.0);
    }

    #[test]
    fn three_way_split_sums_to_hundred() {
        let split = VoteSplit::three_way(2.0, 1.0, 1.0);
        assert_eq!(split.for_percent, 50.0);
        assert_eq!(split.against_percent, 25.0);
        assert_eq!(split.abstain_percent, 25.0);
    }

    #[test]
    fn negative_sides_count_as_zero() {
        let split = VoteSplit::three_way(-4.0, 1.0, 1.0);
        assert_eq!(split.for_percent, 0.0);
        assert_eq!(split.against_percent, 50.0);
        assert_eq!(split.abstain_percent, 50.0);

        let split = VoteSplit::two_way(-3.0, 1.0);
        assert_eq!(split.for_percent, 0.0);
        assert_eq!(split.against_percent, 100.0);

        assert_eq!(VoteSplit::two_way(-1.0, 0.0), VoteSplit::default());
    }

    #[test]
    fn progress_is_ratio_and_clamped() {
        assert_eq!(progress_percent(650.0, 1000.0), 65.0);
        assert_eq!(progress_percent(1500.0, 1000.0), 100.0);
        assert_eq!(progress_percent(-5.0, 1000.0), 0.0);
        assert_eq!(progress_percent(10.0, 0.0), 0.0);
        assert_eq!(progress_percent(10.0, f64::NAN), 0.0);
    }

    #[test]
    fn unique_investors_by_raw_address() {
        let list = [investment("0xA"), investment("0xB"), investment("0xA")];
        assert_eq!(unique_investor_count(&list), 2);

        let mixed_case = [investment("0xab"), investment("0xAB")];
        assert_eq!(unique_investor_count(&mixed_case), 2);
        assert_eq!(unique_investor_count(&[]), 0);
    }

    #[test]
    fn average_of_empty_list_is_zero() {
        assert_eq!(average_investment(500.0, 0), 0.0);
        assert_eq!(average_investment(500.0, 4), 125.0);
    }

    #[test]
    fn countdown_decomposes_by_floor_division() {
        let now = DateTime::<Utc>::from_timestamp(1_000_000, 0).unwrap_or_default();
        let deadline = now
            + Duration::days(2)
            + Duration::hours(3)
            + Duration::minutes(4)
            + Duration::seconds(5);
        let remaining = TimeRemaining::until(Some(deadline), now);
        assert_eq!(
            remaining,
            TimeRemaining::Remaining {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5
            }
        );
        assert_eq!(remaining.to_string(), "2d 3h 4m 5s");
    }

    #[test]
    fn countdown_expires_at_zero() {
        let now = DateTime::<Utc>::from_timestamp(1_000_000, 0).unwrap_or_default();
        assert!(TimeRemaining::until(Some(now), now).is_expired());
        let past = now - Duration::minutes(1);
        assert_eq!(TimeRemaining::until(Some(past), now).to_string(), "Expired");
        assert_eq!(TimeRemaining::until(None, now).to_string(), "Unknown");
    }
}
