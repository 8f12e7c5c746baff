//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection: client
//! commands, results of spawned view fetches, and countdown ticks.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::messages::{ServerEvent, ViewKind, WsCommand, WsMessage, WsMessageType};
use super::session::{ViewSession, WatchTarget};
use crate::error::GatewayError;
use crate::service::ViewService;

/// A derived view ready to push, with the deadline its countdown runs to.
#[derive(Debug)]
struct Fetched {
    data: serde_json::Value,
    deadline: Option<DateTime<Utc>>,
}

/// Result of a spawned fetch, tagged with the generation that asked for it.
#[derive(Debug)]
struct FetchOutcome {
    generation: u64,
    request_id: String,
    target: WatchTarget,
    result: Result<Fetched, GatewayError>,
}

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads `watch`/`unwatch` commands and spawns view fetches.
/// - Forwards fetch results that are still current.
/// - Emits a countdown event every `tick` while a loaded view is watched.
///
/// The in-flight fetch and the interval are dropped with the connection.
pub async fn run_connection(socket: WebSocket, service: Arc<ViewService>, tick: Duration) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut session = ViewSession::new();
    let (fetch_tx, mut fetch_rx) = mpsc::channel::<FetchOutcome>(8);
    let mut in_flight: Option<JoinHandle<()>> = None;
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                let text = match msg {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    Some(Ok(_)) => continue,
                };
                let reply = match parse_command(&text) {
                    Ok((request_id, WsCommand::Watch { view, id })) => {
                        if let Some(handle) = in_flight.take() {
                            handle.abort();
                        }
                        let target = WatchTarget { view, id };
                        let generation = session.watch(target.clone());
                        tracing::debug!(generation, view = ?target.view, id = %target.id, "ws watch");
                        in_flight = Some(spawn_fetch(
                            Arc::clone(&service),
                            generation,
                            request_id.clone(),
                            target.clone(),
                            fetch_tx.clone(),
                        ));
                        WsMessage::response(request_id, serde_json::json!({
                            "watching": { "view": target.view, "id": target.id },
                            "generation": generation,
                        }))
                    }
                    Ok((request_id, WsCommand::Unwatch)) => {
                        if let Some(handle) = in_flight.take() {
                            handle.abort();
                        }
                        session.unwatch();
                        WsMessage::response(request_id, serde_json::json!({
                            "unwatched": true,
                            "generation": session.generation(),
                        }))
                    }
                    Err(err) => err,
                };
                if ws_tx.send(Message::text(reply.to_json())).await.is_err() {
                    break;
                }
            }
            Some(outcome) = fetch_rx.recv() => {
                let Some(reply) = settle(&mut session, outcome) else {
                    continue;
                };
                if ws_tx.send(Message::text(reply.to_json())).await.is_err() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let Some(event) = session.countdown(Utc::now()) else {
                    continue;
                };
                if ws_tx.send(Message::text(WsMessage::event(&event).to_json())).await.is_err() {
                    break;
                }
            }
        }
    }

    if let Some(handle) = in_flight {
        handle.abort();
    }
    tracing::debug!(
        generation = session.generation(),
        watching = ?session.target().map(|t| t.id.as_str()),
        "ws connection closed"
    );
}

/// Parses a client envelope into its request id and command, or the error
/// message to send back.
fn parse_command(text: &str) -> Result<(String, WsCommand), WsMessage> {
    let msg = serde_json::from_str::<WsMessage>(text).map_err(|_| {
        WsMessage::error(
            String::new(),
            &GatewayError::InvalidRequest("malformed JSON".to_string()),
        )
    })?;
    if msg.msg_type != WsMessageType::Command {
        return Err(WsMessage::error(
            msg.id,
            &GatewayError::InvalidRequest("expected a command message".to_string()),
        ));
    }
    match serde_json::from_value::<WsCommand>(msg.payload) {
        Ok(command) => Ok((msg.id, command)),
        Err(e) => Err(WsMessage::error(
            msg.id,
            &GatewayError::InvalidRequest(format!("unknown command: {e}")),
        )),
    }
}

/// Applies a fetch outcome to the session and returns the message to push,
/// or `None` when the outcome is stale.
fn settle(session: &mut ViewSession, outcome: FetchOutcome) -> Option<WsMessage> {
    let FetchOutcome {
        generation,
        request_id,
        target,
        result,
    } = outcome;
    match result {
        Ok(fetched) => {
            if !session.accept(generation, fetched.deadline) {
                tracing::debug!(generation, current = session.generation(), "stale view discarded");
                return None;
            }
            Some(WsMessage::event(&ServerEvent::View {
                generation,
                view: target.view,
                id: target.id,
                data: fetched.data,
            }))
        }
        Err(err) => {
            if !session.fail(generation) {
                return None;
            }
            tracing::debug!(generation, error = %err, "ws view fetch failed");
            Some(WsMessage::error(request_id, &err))
        }
    }
}

fn spawn_fetch(
    service: Arc<ViewService>,
    generation: u64,
    request_id: String,
    target: WatchTarget,
    tx: mpsc::Sender<FetchOutcome>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = fetch(&service, &target).await;
        let _ = tx
            .send(FetchOutcome {
                generation,
                request_id,
                target,
                result,
            })
            .await;
    })
}

async fn fetch(service: &ViewService, target: &WatchTarget) -> Result<Fetched, GatewayError> {
    let (data, deadline) = match target.view {
        ViewKind::Fundraising => {
            let view = service.fundraising_view(&target.id).await?;
            (serde_json::to_value(&view), view.deadline)
        }
        ViewKind::Proposal => {
            let view = service.proposal_view(&target.id).await?;
            (serde_json::to_value(&view), view.end_time)
        }
    };
    let data = data.map_err(|e| GatewayError::Internal(format!("serialize view: {e}")))?;
    Ok(Fetched { data, deadline })
}
