//! # estate-gateway
//!
//! Read-side REST and WebSocket gateway for a real-world-asset tokenization
//! marketplace and its DAO.
//!
//! The gateway queries the marketplace subgraph, normalizes the raw records
//! (wei-scale amounts, unix timestamps, governor state codes, JSON proposal
//! descriptions), merges them with static property listings, and serves
//! render-ready view models. Transactions are signed in the browser wallet;
//! the gateway only publishes the contract addresses.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)        watch + countdown, per-connection state
//!     │
//!     ├── ViewService (service/)
//!     │
//!     ├── View model assembly (domain/)
//!     ├── Fallback listings (domain/fallback)
//!     │
//!     └── IndexerClient (source/) ── subgraph (GraphQL over HTTP)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod source;
pub mod ws;
