//! Shared harness: runs the gateway on an ephemeral port over a
//! [`MemoryIndexer`].

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use estate_gateway::api::build_app;
use estate_gateway::app_state::AppState;
use estate_gateway::config::ContractAddresses;
use estate_gateway::domain::{FallbackStore, FundraisingRecord, ProposalRecord};
use estate_gateway::service::{PageSizes, ViewService};
use estate_gateway::source::MemoryIndexer;

/// Listing with a live record in most tests.
pub const HARBOUR: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";
/// Completed listing, usually without a live record.
pub const CANAL: &str = "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512";
/// Investor used in portfolio tests.
pub const INVESTOR: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

/// Live record for [`HARBOUR`]: goal 1000, raised 650.
pub fn harbour_live() -> FundraisingRecord {
    FundraisingRecord {
        id: HARBOUR.to_string(),
        owner: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".to_string(),
        goal_amount: Some("1000000000000000000000".to_string()),
        total_raised: Some("650000000000000000000".to_string()),
        min_investment: Some("10000000000000000000".to_string()),
        max_investment: Some("250000000000000000000".to_string()),
        deadline: Some("1900000000".to_string()),
        ..FundraisingRecord::default()
    }
}

/// Proposal with a 3:1 split, ending at unix second 1900000000.
pub fn proposal(id: &str, state: i64) -> ProposalRecord {
    ProposalRecord {
        id: id.to_string(),
        proposer: "0xproposer".to_string(),
        state,
        start_time: Some("1700000000".to_string()),
        end_time: Some("1900000000".to_string()),
        for_votes: Some("3".to_string()),
        against_votes: Some("1".to_string()),
        description: r#"{"title":"Repaint facade","detail":"Budget 20k"}"#.to_string(),
        ..ProposalRecord::default()
    }
}

/// Starts the gateway and returns its address.
pub async fn spawn_gateway(indexer: MemoryIndexer, tick: Duration) -> SocketAddr {
    let fallback = match FallbackStore::embedded() {
        Ok(store) => store,
        Err(e) => panic!("embedded listings: {e}"),
    };
    let state = AppState {
        view_service: Arc::new(ViewService::new(
            Arc::new(indexer),
            fallback,
            PageSizes::default(),
        )),
        contracts: Arc::new(ContractAddresses {
            governance: "0x9a676e781a523b5d0c0e43731313a708cb607508".to_string(),
            ..ContractAddresses::default()
        }),
        countdown_interval: tick,
    };

    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(e) => panic!("bind: {e}"),
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(e) => panic!("local addr: {e}"),
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, build_app(state)).await;
    });
    addr
}
