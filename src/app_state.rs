//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ContractAddresses;
use crate::service::ViewService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// View service for every page the gateway serves.
    pub view_service: Arc<ViewService>,
    /// Deployed contract addresses published to clients.
    pub contracts: Arc<ContractAddresses>,
    /// Interval between countdown events on a watched view.
    pub countdown_interval: Duration,
}
