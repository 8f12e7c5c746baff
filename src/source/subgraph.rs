//! Subgraph client over GraphQL-on-HTTP.

use std::time::{Duration, Instant};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{IndexerClient, IndexerResult, queries};
use crate::domain::{FundraisingRecord, InvestmentRecord, ProposalRecord, VoteRecord};
use crate::error::GatewayError;

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct FundraisingsData {
    fundraisings: Vec<FundraisingRecord>,
}

#[derive(Debug, Deserialize)]
struct FundraisingData {
    fundraising: Option<FundraisingRecord>,
}

#[derive(Debug, Deserialize)]
struct ProposalsData {
    proposals: Vec<ProposalRecord>,
}

#[derive(Debug, Deserialize)]
struct ProposalData {
    proposal: Option<ProposalRecord>,
}

#[derive(Debug, Deserialize)]
struct InvestmentsData {
    investments: Vec<InvestmentRecord>,
}

#[derive(Debug, Deserialize)]
struct VotesData {
    votes: Vec<VoteRecord>,
}

/// [`IndexerClient`] backed by a subgraph GraphQL endpoint.
///
/// Requests carry `Cache-Control: no-cache` so intermediaries never serve a
/// stale page; responses are never cached locally either.
#[derive(Debug, Clone)]
pub struct SubgraphClient {
    http: reqwest::Client,
    endpoint: String,
    nested_first: u32,
}

impl SubgraphClient {
    /// Creates a client for `endpoint`.
    ///
    /// `nested_first` bounds child collections (investments of a
    /// fundraising, votes of a proposal).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the HTTP client cannot be built.
    pub fn new(endpoint: &str, timeout: Duration, nested_first: u32) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("http client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            nested_first,
        })
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn query<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &str,
        variables: serde_json::Value,
    ) -> IndexerResult<T> {
        let started = Instant::now();
        let response = self
            .http
            .post(&self.endpoint)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| GatewayError::IndexerUnavailable(format!("{operation}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::IndexerUnavailable(format!(
                "{operation}: HTTP {status}"
            )));
        }

        let body: GraphQlResponse<T> = response
            .json()
            .await
            .map_err(|e| GatewayError::IndexerResponse(format!("{operation}: {e}")))?;

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(operation, elapsed_ms, "subgraph query completed");

        decode(operation, body)
    }
}

/// Unwraps a GraphQL envelope: any reported error fails the whole query.
fn decode<T>(operation: &'static str, body: GraphQlResponse<T>) -> IndexerResult<T> {
    if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(GatewayError::IndexerResponse(format!(
            "{operation}: {}",
            messages.join("; ")
        )));
    }
    body.data
        .ok_or_else(|| GatewayError::IndexerResponse(format!("{operation}: missing data")))
}

impl IndexerClient for SubgraphClient {
    fn fundraisings(&self, first: u32) -> BoxFuture<'_, IndexerResult<Vec<FundraisingRecord>>> {
        async move {
            let data: FundraisingsData = self
                .query(
                    "fundraisings",
                    queries::FUNDRAISINGS,
                    json!({ "first": first, "nested": self.nested_first }),
                )
                .await?;
            Ok(data.fundraisings)
        }
        .boxed()
    }

    fn fundraising<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, IndexerResult<Option<FundraisingRecord>>> {
        async move {
            let data: FundraisingData = self
                .query(
                    "fundraising",
                    queries::FUNDRAISING,
                    json!({ "id": id, "nested": self.nested_first }),
                )
                .await?;
            Ok(data.fundraising)
        }
        .boxed()
    }

    fn proposals(&self, first: u32) -> BoxFuture<'_, IndexerResult<Vec<ProposalRecord>>> {
        async move {
            let data: ProposalsData = self
                .query(
                    "proposals",
                    queries::PROPOSALS,
                    json!({ "first": first, "nested": self.nested_first }),
                )
                .await?;
            Ok(data.proposals)
        }
        .boxed()
    }

    fn proposal<'a>(&'a self, id: &'a str) -> BoxFuture<'a, IndexerResult<Option<ProposalRecord>>> {
        async move {
            let data: ProposalData = self
                .query(
                    "proposal",
                    queries::PROPOSAL,
                    json!({ "id": id, "nested": self.nested_first }),
                )
                .await?;
            Ok(data.proposal)
        }
        .boxed()
    }

    fn investments_by_investor<'a>(
        &'a self,
        investor: &'a str,
        first: u32,
    ) -> BoxFuture<'a, IndexerResult<Vec<InvestmentRecord>>> {
        async move {
            let data: InvestmentsData = self
                .query(
                    "investments_by_investor",
                    &queries::investments_by_investor(),
                    json!({ "investor": investor, "first": first }),
                )
                .await?;
            Ok(data.investments)
        }
        .boxed()
    }

    fn votes_by_voter<'a>(
        &'a self,
        voter: &'a str,
        first: u32,
    ) -> BoxFuture<'a, IndexerResult<Vec<VoteRecord>>> {
        async move {
            let data: VotesData = self
                .query(
                    "votes_by_voter",
                    &queries::votes_by_voter(),
                    json!({ "voter": voter, "first": first }),
                )
                .await?;
            Ok(data.votes)
        }
        .boxed()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse<T: DeserializeOwned>(json: &str) -> GraphQlResponse<T> {
        match serde_json::from_str(json) {
            Ok(body) => body,
            Err(e) => panic!("invalid test body: {e}"),
        }
    }

    #[test]
    fn decode_returns_data() {
        let body = parse::<ProposalData>(r#"{"data": {"proposal": {"id": "1", "state": 1}}}"#);
        let Ok(data) = decode("proposal", body) else {
            panic!("expected data");
        };
        assert_eq!(data.proposal.map(|p| p.state), Some(1));
    }

    #[test]
    fn decode_null_entity_is_none() {
        let body = parse::<FundraisingData>(r#"{"data": {"fundraising": null}}"#);
        let Ok(data) = decode("fundraising", body) else {
            panic!("expected data");
        };
        assert!(data.fundraising.is_none());
    }

    #[test]
    fn graphql_errors_fail_the_query() {
        let body = parse::<VotesData>(
            r#"{"data": null, "errors": [{"message": "indexing_error"}, {"message": "x"}]}"#,
        );
        let Err(err) = decode("votes_by_voter", body) else {
            panic!("expected error");
        };
        assert_eq!(err.error_code(), 3002);
        assert!(err.to_string().contains("indexing_error; x"));
    }

    #[test]
    fn missing_data_is_an_error() {
        let body = parse::<VotesData>(r#"{"errors": []}"#);
        assert!(matches!(
            decode("votes_by_voter", body),
            Err(GatewayError::IndexerResponse(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        let Ok(client) = SubgraphClient::new("http://127.0.0.1:9/graphql", Duration::from_secs(2), 10)
        else {
            panic!("client builds");
        };
        let result = client.proposals(5).await;
        assert!(matches!(result, Err(GatewayError::IndexerUnavailable(_))));
    }
}
