//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Contract addresses are external
//! deployment artifacts; the gateway only publishes them to clients.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use utoipa::ToSchema;

use crate::service::PageSizes;

/// Deployed contract addresses the front-end signs transactions against.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ContractAddresses {
    /// Property NFT contract.
    pub nft: String,
    /// Fundraising factory contract.
    pub fundraising_factory: String,
    /// DAO governance contract.
    pub governance: String,
    /// Property token factory contract.
    pub token_factory: String,
    /// Stablecoin used for investments and dividends.
    pub stablecoin: String,
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// GraphQL endpoint of the marketplace subgraph.
    pub subgraph_url: String,

    /// Timeout in seconds for a single subgraph request.
    pub subgraph_timeout_secs: u64,

    /// `first:` argument for top-level list queries.
    pub list_page_size: u32,

    /// `first:` argument for nested and per-investor queries.
    pub nested_page_size: u32,

    /// Milliseconds between countdown ticks on a watched view.
    pub countdown_interval_ms: u64,

    /// Optional JSON file replacing the embedded fallback listings.
    pub fallback_listings_path: Option<PathBuf>,

    /// Log output format.
    pub log_format: LogFormat,

    /// Deployed contract addresses.
    pub contracts: ContractAddresses,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let subgraph_url = std::env::var("SUBGRAPH_URL")
            .unwrap_or_else(|_| "http://localhost:8000/subgraphs/name/estate-dao".to_string());

        let subgraph_timeout_secs = parse_env("SUBGRAPH_TIMEOUT_SECS", 10);
        let list_page_size = parse_env("LIST_PAGE_SIZE", 100);
        let nested_page_size = parse_env("NESTED_PAGE_SIZE", 1000);
        let countdown_interval_ms = parse_env("COUNTDOWN_INTERVAL_MS", 1000);

        let fallback_listings_path = std::env::var("FALLBACK_LISTINGS_PATH")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let contracts = ContractAddresses {
            nft: env_or_empty("NFT_CONTRACT_ADDRESS"),
            fundraising_factory: env_or_empty("FUNDRAISING_FACTORY_ADDRESS"),
            governance: env_or_empty("GOVERNANCE_ADDRESS"),
            token_factory: env_or_empty("TOKEN_FACTORY_ADDRESS"),
            stablecoin: env_or_empty("STABLECOIN_ADDRESS"),
        };

        Ok(Self {
            listen_addr,
            subgraph_url,
            subgraph_timeout_secs,
            list_page_size,
            nested_page_size,
            countdown_interval_ms,
            fallback_listings_path,
            log_format,
            contracts,
        })
    }

    /// Returns the subgraph request timeout as a [`Duration`].
    #[must_use]
    pub const fn subgraph_timeout(&self) -> Duration {
        Duration::from_secs(self.subgraph_timeout_secs)
    }

    /// Returns the indexer page sizes.
    #[must_use]
    pub const fn page_sizes(&self) -> PageSizes {
        PageSizes {
            list: self.list_page_size,
            nested: self.nested_page_size,
        }
    }

    /// Returns the countdown tick period, never shorter than 10 ms.
    #[must_use]
    pub fn countdown_interval(&self) -> Duration {
        Duration::from_millis(self.countdown_interval_ms.max(10))
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_or_empty(key: &str) -> String {
    std::env::var(key).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GatewayConfig {
        GatewayConfig {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            subgraph_url: "http://localhost".to_string(),
            subgraph_timeout_secs: 3,
            list_page_size: 100,
            nested_page_size: 1000,
            countdown_interval_ms: 0,
            fallback_listings_path: None,
            log_format: LogFormat::Pretty,
            contracts: ContractAddresses::default(),
        }
    }

    #[test]
    fn countdown_interval_has_floor() {
        let cfg = sample();
        assert_eq!(cfg.countdown_interval(), Duration::from_millis(10));
    }

    #[test]
    fn subgraph_timeout_in_seconds() {
        assert_eq!(sample().subgraph_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn page_sizes_follow_config() {
        let mut cfg = sample();
        cfg.list_page_size = 25;
        assert_eq!(cfg.page_sizes(), PageSizes { list: 25, nested: 1000 });
    }

    #[test]
    fn parse_env_falls_back_on_missing_key() {
        let value: u32 = parse_env("ESTATE_GATEWAY_TEST_UNSET_KEY", 42);
        assert_eq!(value, 42);
    }
}
