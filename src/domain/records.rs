//! Raw records as returned by the marketplace subgraph.
//!
//! Every query response deserializes into one of these explicit structs.
//! Amounts stay as the decimal strings the indexer emits (wei-scale, up to
//! 78 digits) and timestamps stay as unix-second strings; conversion happens
//! in [`super::units`]. Missing and `null` fields default at this boundary so
//! that one malformed record never fails the decode of its siblings.

use serde::{Deserialize, Deserializer, Serialize};

/// Reference to a parent entity by id (e.g. `investment.fundraising`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityRef {
    /// Entity id.
    #[serde(deserialize_with = "null_default")]
    pub id: String,
}

/// A fundraising campaign contract and its contributions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FundraisingRecord {
    /// Campaign contract address.
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    /// Property owner address.
    #[serde(deserialize_with = "null_default")]
    pub owner: String,
    /// Target amount (wei-scale integer string).
    pub goal_amount: Option<String>,
    /// Smallest accepted contribution (wei-scale integer string).
    pub min_investment: Option<String>,
    /// Largest accepted contribution (wei-scale integer string).
    pub max_investment: Option<String>,
    /// Campaign deadline (unix seconds string).
    pub deadline: Option<String>,
    /// Amount raised so far (wei-scale integer string).
    pub total_raised: Option<String>,
    /// Whether the contract marked the campaign completed.
    #[serde(deserialize_with = "null_default")]
    pub is_completed: bool,
    /// Contributions, in indexer order.
    #[serde(deserialize_with = "null_default")]
    pub investments: Vec<InvestmentRecord>,
    /// Property token issued for the campaign.
    pub property_token: Option<PropertyTokenRecord>,
    /// Property NFT backing the campaign.
    pub nft: Option<NftRecord>,
}

/// A single contribution to a fundraising campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvestmentRecord {
    /// Investment entity id.
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    /// Investor address, as indexed (case preserved).
    #[serde(deserialize_with = "null_default")]
    pub investor: String,
    /// Contributed amount (wei-scale integer string).
    pub amount: Option<String>,
    /// Whether the dividend for this investment was claimed.
    #[serde(deserialize_with = "null_default")]
    pub claimed: bool,
    /// Contribution time (unix seconds string).
    pub timestamp: Option<String>,
    /// Owning campaign, present on per-investor queries.
    pub fundraising: Option<EntityRef>,
}

/// ERC-20 property token issued per campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyTokenRecord {
    /// Token contract address.
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    /// Token name.
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// Token symbol.
    #[serde(deserialize_with = "null_default")]
    pub symbol: String,
    /// Total supply (wei-scale integer string).
    pub total_supply: Option<String>,
}

/// Property NFT metadata pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NftRecord {
    /// NFT entity id.
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    /// Token id within the NFT contract.
    #[serde(deserialize_with = "null_default")]
    pub token_id: String,
    /// Metadata URI.
    #[serde(rename = "tokenURI", deserialize_with = "null_default")]
    pub token_uri: String,
    /// Current holder.
    #[serde(deserialize_with = "null_default")]
    pub owner: String,
}

/// A governance proposal with its vote tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProposalRecord {
    /// Proposal id.
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    /// Proposer address.
    #[serde(deserialize_with = "null_default")]
    pub proposer: String,
    /// On-chain governor state code. Accepts a JSON number or a numeric
    /// string; a missing, null, or unreadable code reads as `-1`, which
    /// classifies as unknown.
    #[serde(default = "unknown_state", deserialize_with = "state_code")]
    pub state: i64,
    /// Voting start (unix seconds string).
    pub start_time: Option<String>,
    /// Voting end (unix seconds string).
    pub end_time: Option<String>,
    /// Weight voted in favour (decimal integer string).
    pub for_votes: Option<String>,
    /// Weight voted against (decimal integer string).
    pub against_votes: Option<String>,
    /// Weight that abstained (decimal integer string).
    pub abstain_votes: Option<String>,
    /// JSON payload `{"title": …, "detail": …}`.
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    /// Individual votes, in indexer order.
    #[serde(deserialize_with = "null_default")]
    pub votes: Vec<VoteRecord>,
}

/// A single vote cast on a proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoteRecord {
    /// Vote entity id.
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    /// `true` for a vote in favour.
    #[serde(deserialize_with = "null_default")]
    pub support: bool,
    /// Voting weight (wei-scale integer string).
    pub weight: Option<String>,
    /// Voter address.
    #[serde(deserialize_with = "null_default")]
    pub voter: String,
    /// Time the vote was cast (unix seconds string).
    pub timestamp: Option<String>,
    /// Proposal voted on, present on per-voter queries.
    pub proposal: Option<EntityRef>,
}

/// Reads `null` as the type's default instead of failing the whole decode.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

const fn unknown_state() -> i64 {
    -1
}

fn state_code<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let code = match &value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(code.unwrap_or_else(|| {
        tracing::warn!(raw = %value, "unreadable proposal state code");
        -1
    }))
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn fundraising_deserializes_from_subgraph_shape() {
        let json = r#"{
            "id": "0xfund",
            "owner": "0xowner",
            "goalAmount": "1000000000000000000000",
            "deadline": "1700000000",
            "totalRaised": "650000000000000000000",
            "isCompleted": false,
            "investments": [
                {"id": "i1", "investor": "0xA", "amount": "1", "claimed": false, "timestamp": "1"}
            ],
            "propertyToken": {"id": "0xtok", "name": "Villa", "symbol": "VIL", "totalSupply": "5"},
            "nft": {"id": "n1", "tokenId": "7", "tokenURI": "ipfs://x", "owner": "0xowner"}
        }"#;
        let Ok(record) = serde_json::from_str::<FundraisingRecord>(json) else {
            panic!("fundraising should deserialize");
        };
        assert_eq!(record.goal_amount.as_deref(), Some("1000000000000000000000"));
        assert_eq!(record.investments.len(), 1);
        assert_eq!(record.investments[0].investor, "0xA");
        assert_eq!(
            record.nft.map(|n| n.token_uri),
            Some("ipfs://x".to_string())
        );
        assert!(record.min_investment.is_none());
    }

    #[test]
    fn missing_fields_default() {
        let Ok(record) = serde_json::from_str::<ProposalRecord>(r#"{"id": "3"}"#) else {
            panic!("partial proposal should deserialize");
        };
        assert_eq!(record.state, -1);
        assert!(record.votes.is_empty());
        assert!(record.for_votes.is_none());
        assert!(record.description.is_empty());
    }

    #[test]
    fn state_code_accepts_number_or_string() {
        let from_number: Result<ProposalRecord, _> = serde_json::from_str(r#"{"state": 4}"#);
        let from_string: Result<ProposalRecord, _> = serde_json::from_str(r#"{"state": "5"}"#);
        let garbage: Result<ProposalRecord, _> = serde_json::from_str(r#"{"state": "x"}"#);
        assert_eq!(from_number.map(|p| p.state).ok(), Some(4));
        assert_eq!(from_string.map(|p| p.state).ok(), Some(5));
        assert_eq!(garbage.map(|p| p.state).ok(), Some(-1));
    }

    #[test]
    fn null_state_is_unknown_not_pending() {
        let Ok(record) = serde_json::from_str::<ProposalRecord>(r#"{"id": "1", "state": null}"#)
        else {
            panic!("null state should deserialize");
        };
        assert_eq!(record.state, -1);
    }

    #[test]
    fn null_scalars_fall_back_to_defaults() {
        let proposal = r#"{"id": "2", "proposer": null, "state": 1, "description": null, "votes": null}"#;
        let Ok(record) = serde_json::from_str::<ProposalRecord>(proposal) else {
            panic!("null description should deserialize");
        };
        assert!(record.description.is_empty());
        assert!(record.proposer.is_empty());
        assert!(record.votes.is_empty());
        assert_eq!(record.state, 1);

        let fundraising = r#"{"id": "0xf", "owner": null, "isCompleted": null, "investments": [
            {"id": "i1", "investor": null, "amount": "1", "claimed": null}
        ]}"#;
        let Ok(record) = serde_json::from_str::<FundraisingRecord>(fundraising) else {
            panic!("null isCompleted should deserialize");
        };
        assert!(!record.is_completed);
        assert!(record.owner.is_empty());
        assert_eq!(record.investments.len(), 1);
        assert!(!record.investments[0].claimed);
    }

    #[test]
    fn one_null_laden_record_keeps_its_siblings() {
        let json = r#"[
            {"id": null, "proposer": null, "state": null, "description": null},
            {"id": "8", "proposer": "0xP", "state": 4, "description": "{}"}
        ]"#;
        let Ok(records) = serde_json::from_str::<Vec<ProposalRecord>>(json) else {
            panic!("list with a null-laden record should deserialize");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].state, -1);
        assert_eq!(records[1].id, "8");
        assert_eq!(records[1].state, 4);
    }

    #[test]
    fn vote_keeps_parent_reference() {
        let json = r#"{"id": "v1", "support": true, "weight": "10", "voter": "0xV", "proposal": {"id": "9"}}"#;
        let Ok(vote) = serde_json::from_str::<VoteRecord>(json) else {
            panic!("vote should deserialize");
        };
        assert!(vote.support);
        assert_eq!(vote.proposal.map(|p| p.id), Some("9".to_string()));
    }
}
