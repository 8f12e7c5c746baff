//! GraphQL documents sent to the marketplace subgraph.
//!
//! Page sizes are passed as variables: `$first` for the top-level list and
//! `$nested` for child collections.

/// Fields selected on every investment.
const INVESTMENT_FIELDS: &str = "id investor amount claimed timestamp";

/// Fields selected on every vote.
const VOTE_FIELDS: &str = "id support weight voter timestamp";

macro_rules! fundraising_selection {
    () => {
        "id owner goalAmount minInvestment maxInvestment deadline totalRaised isCompleted \
         investments(first: $nested, orderBy: timestamp, orderDirection: desc) { \
           id investor amount claimed timestamp } \
         propertyToken { id name symbol totalSupply } \
         nft { id tokenId tokenURI owner }"
    };
}

macro_rules! proposal_selection {
    () => {
        "id proposer state startTime endTime forVotes againstVotes abstainVotes description \
         votes(first: $nested, orderBy: timestamp, orderDirection: desc) { \
           id support weight voter timestamp }"
    };
}

/// All fundraisings, newest deadline first.
pub const FUNDRAISINGS: &str = concat!(
    "query Fundraisings($first: Int!, $nested: Int!) { \
     fundraisings(first: $first, orderBy: deadline, orderDirection: desc) { ",
    fundraising_selection!(),
    " } }"
);

/// A single fundraising by contract address.
pub const FUNDRAISING: &str = concat!(
    "query Fundraising($id: ID!, $nested: Int!) { fundraising(id: $id) { ",
    fundraising_selection!(),
    " } }"
);

/// All proposals, most recently started first.
pub const PROPOSALS: &str = concat!(
    "query Proposals($first: Int!, $nested: Int!) { \
     proposals(first: $first, orderBy: startTime, orderDirection: desc) { ",
    proposal_selection!(),
    " } }"
);

/// A single proposal by id.
pub const PROPOSAL: &str = concat!(
    "query Proposal($id: ID!, $nested: Int!) { proposal(id: $id) { ",
    proposal_selection!(),
    " } }"
);

/// Builds the per-investor investments query.
#[must_use]
pub fn investments_by_investor() -> String {
    format!(
        "query InvestorInvestments($investor: Bytes!, $first: Int!) {{ \
         investments(first: $first, where: {{ investor: $investor }}, \
         orderBy: timestamp, orderDirection: desc) {{ {INVESTMENT_FIELDS} fundraising {{ id }} }} }}"
    )
}

/// Builds the per-voter votes query.
#[must_use]
pub fn votes_by_voter() -> String {
    format!(
        "query VoterVotes($voter: Bytes!, $first: Int!) {{ \
         votes(first: $first, where: {{ voter: $voter }}, \
         orderBy: timestamp, orderDirection: desc) {{ {VOTE_FIELDS} proposal {{ id }} }} }}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_queries_take_page_sizes() {
        for query in [FUNDRAISINGS, PROPOSALS] {
            assert!(query.contains("$first: Int!"));
            assert!(query.contains("first: $nested"));
        }
    }

    #[test]
    fn detail_queries_take_id() {
        assert!(FUNDRAISING.contains("fundraising(id: $id)"));
        assert!(PROPOSAL.contains("proposal(id: $id)"));
        assert!(FUNDRAISING.contains("tokenURI"));
    }

    #[test]
    fn per_address_queries_filter() {
        let q = investments_by_investor();
        assert!(q.contains("where: { investor: $investor }"));
        assert!(q.contains("fundraising { id }"));
        let q = votes_by_voter();
        assert!(q.contains("where: { voter: $voter }"));
        assert!(q.contains("proposal { id }"));
    }
}
