//! WebSocket message types: envelope, commands, and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::TimeRemaining;
use crate::error::GatewayError;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    #[serde(default)]
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp. Optional on client messages.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Response to the client command with id `id`.
    #[must_use]
    pub fn response(id: String, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Response,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Server-initiated event.
    #[must_use]
    pub fn event(event: &ServerEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type: WsMessageType::Event,
            timestamp: Utc::now(),
            payload: serde_json::to_value(event).unwrap_or_default(),
        }
    }

    /// Error carrying the gateway error code.
    #[must_use]
    pub fn error(id: String, err: &GatewayError) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Error,
            timestamp: Utc::now(),
            payload: serde_json::json!({
                "code": err.error_code(),
                "message": err.to_string(),
            }),
        }
    }

    /// Serializes the envelope for the wire.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client pushed event.
    Event,
    /// Server → Client error.
    Error,
}

/// Page kinds a client can watch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Fundraising detail page; countdown runs to the campaign deadline.
    Fundraising,
    /// Proposal detail page; countdown runs to the end of voting.
    Proposal,
}

/// Commands that a client can send over WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Load a detail view and start its countdown. Replaces any current
    /// watch.
    Watch {
        /// Page kind.
        view: ViewKind,
        /// Fundraising address or proposal id.
        id: String,
    },
    /// Stop the current watch.
    Unwatch,
}

/// Events pushed to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Freshly derived view for the current watch.
    View {
        /// Watch generation the view belongs to.
        generation: u64,
        /// Page kind.
        view: ViewKind,
        /// Watched id.
        id: String,
        /// Serialized view model.
        data: serde_json::Value,
    },
    /// Countdown recomputed on the connection's interval.
    Countdown {
        /// Watch generation the tick belongs to.
        generation: u64,
        /// Page kind.
        view: ViewKind,
        /// Watched id.
        id: String,
        /// Remaining time.
        time_remaining: TimeRemaining,
        /// Formatted remaining time, e.g. `2d 3h 4m 5s`.
        display: String,
    },
}
