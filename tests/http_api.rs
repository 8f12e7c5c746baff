//! REST surface against an in-memory indexer.

#![allow(clippy::panic, clippy::indexing_slicing)]

mod common;

use std::time::Duration;

use estate_gateway::domain::{InvestmentRecord, VoteRecord};
use estate_gateway::source::MemoryIndexer;
use reqwest::StatusCode;
use serde_json::Value;

use common::{CANAL, HARBOUR, INVESTOR, harbour_live, proposal, spawn_gateway};

async fn get(url: String) -> (StatusCode, Value) {
    let response = match reqwest::get(&url).await {
        Ok(response) => response,
        Err(e) => panic!("GET {url}: {e}"),
    };
    let status = response.status();
    let body = response.json::<Value>().await.unwrap_or_default();
    (status, body)
}

async fn gateway(indexer: MemoryIndexer) -> String {
    let addr = spawn_gateway(indexer, Duration::from_secs(1)).await;
    format!("http://{addr}")
}

#[tokio::test]
async fn health_reports_listings() {
    let base = gateway(MemoryIndexer::new()).await;
    let (status, body) = get(format!("{base}/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["fallback_listings"], 3);
}

#[tokio::test]
async fn contracts_are_published() {
    let base = gateway(MemoryIndexer::new()).await;
    let (status, body) = get(format!("{base}/config/contracts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["governance"], "0x9a676e781a523b5d0c0e43731313a708cb607508");
    assert_eq!(body["nft"], "");
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let base = gateway(MemoryIndexer::new()).await;
    let response = match reqwest::Client::new()
        .get(format!("{base}/health"))
        .header("origin", "http://localhost:5173")
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => panic!("GET /health: {e}"),
    };
    assert_eq!(response.status(), StatusCode::OK);
    let allow = response
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(allow, "*");
}

#[tokio::test]
async fn fundraising_list_is_paginated() {
    let base = gateway(MemoryIndexer::new().with_fundraising(harbour_live())).await;
    let (status, body) = get(format!("{base}/api/v1/fundraisings?page=1&per_page=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["total_pages"], 2);
    let Some(cards) = body["data"].as_array() else {
        panic!("data is an array");
    };
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["id"], HARBOUR);
    assert_eq!(cards[0]["source"], "live");
    assert_eq!(cards[0]["progress_display"], "65.0%");
    assert_eq!(cards[1]["source"], "fallback");
}

#[tokio::test]
async fn fundraising_detail_merges_live_record() {
    let base = gateway(MemoryIndexer::new().with_fundraising(harbour_live())).await;
    let (status, body) = get(format!("{base}/api/v1/fundraisings/{HARBOUR}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["funding"]["goal_display"], "1,000.00");
    assert_eq!(body["funding"]["progress_percent"], 65.0);
    assert_eq!(body["property"]["name"], "Harbourview Residences");
    assert_eq!(body["status"], "Active");
}

#[tokio::test]
async fn fundraising_detail_without_live_record_uses_listing() {
    let base = gateway(MemoryIndexer::new()).await;
    let (status, body) = get(format!("{base}/api/v1/fundraisings/{CANAL}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["status"], "Completed");
}

#[tokio::test]
async fn fundraising_errors_are_structured() {
    let base = gateway(MemoryIndexer::new()).await;
    let (status, body) = get(format!(
        "{base}/api/v1/fundraisings/0x000000000000000000000000000000000000beef"
    ))
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2001);

    let (status, body) = get(format!("{base}/api/v1/fundraisings/not-an-address")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1002);
}

#[tokio::test]
async fn indexer_outage_is_bad_gateway() {
    let base = gateway(MemoryIndexer::new().failing("fundraisings")).await;
    let (status, body) = get(format!("{base}/api/v1/fundraisings")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], 3001);
}

#[tokio::test]
async fn proposals_list_and_detail() {
    let base = gateway(
        MemoryIndexer::new()
            .with_proposal(proposal("1", 1))
            .with_proposal(proposal("2", 2)),
    )
    .await;

    let (status, body) = get(format!("{base}/api/v1/proposals")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["data"][0]["title"], "Repaint facade");
    assert_eq!(body["data"][0]["status"], "Active");
    assert_eq!(body["data"][0]["for_percent_display"], "75.0%");
    assert_eq!(body["data"][1]["status"], "Unknown");

    let (status, body) = get(format!("{base}/api/v1/proposals/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Budget 20k");
    assert_eq!(body["voting_open"], true);

    let (status, body) = get(format!("{base}/api/v1/proposals/99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2002);
}

#[tokio::test]
async fn portfolio_sections_are_independent() {
    let indexer = MemoryIndexer::new()
        .with_investment(InvestmentRecord {
            id: "i1".to_string(),
            investor: INVESTOR.to_string(),
            amount: Some("2500000000000000000".to_string()),
            ..InvestmentRecord::default()
        })
        .with_vote(VoteRecord {
            id: "v1".to_string(),
            voter: INVESTOR.to_string(),
            ..VoteRecord::default()
        })
        .failing("votes_by_voter");
    let base = gateway(indexer).await;

    let (status, body) = get(format!("{base}/api/v1/investors/{INVESTOR}/portfolio")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["investments"]["state"], "ready");
    assert_eq!(body["investments"]["data"]["total_invested_display"], "2.50");
    assert_eq!(body["votes"]["state"], "failed");
    assert_eq!(body["votes"]["code"], 3001);
}

#[cfg(feature = "swagger-ui")]
#[tokio::test]
async fn openapi_document_is_served() {
    let base = gateway(MemoryIndexer::new()).await;
    let (status, body) = get(format!("{base}/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/fundraisings/{id}"].is_object());
}
