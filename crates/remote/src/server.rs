// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Handles client connections, message routing, and per-user change fanout.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use todosync_core::protocol::{ClientMessage, ServerMessage};

use crate::state::ServerState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Run the WebSocket server on the given address.
pub async fn run(addr: SocketAddr, state: ServerState) -> Result<(), BoxError> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", listener.local_addr()?);
    accept_loop(listener, state).await
}

/// Accepts connections until the listener fails.
pub(crate) async fn accept_loop(listener: TcpListener, state: ServerState) -> Result<(), BoxError> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Per-connection subscription state.
#[derive(Debug, Default)]
pub(crate) struct Connection {
    /// User whose changes this connection receives.
    pub subscribed: Option<String>,
}

impl Connection {
    fn wants(&self, user_id: &str) -> bool {
        self.subscribed.as_deref() == Some(user_id)
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: ServerState,
) -> Result<(), BoxError> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();
    let mut conn = Connection::default();

    // Subscribe before any request so no applied change is missed
    let mut broadcast_rx = state.subscribe();

    loop {
        tokio::select! {
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = match handle_client_message(&text, &state, &mut conn).await {
                            Ok(response) => response,
                            Err(e) => Some(ServerMessage::error(e.to_string())),
                        };
                        if let Some(response) = response {
                            ws_sink.send(Message::Text(response.to_json()?.into())).await?;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Client {} disconnected", peer_addr);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        ws_sink.send(Message::Pong(data)).await?;
                    }
                    Some(Ok(_)) => {
                        // Binary, Pong and raw frames are ignored
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error from {}: {}", peer_addr, e);
                        break;
                    }
                    None => {
                        info!("Client {} stream ended", peer_addr);
                        break;
                    }
                }
            }

            change = broadcast_rx.recv() => {
                match change {
                    Ok(change) => {
                        if !conn.wants(change.user_id()) {
                            continue;
                        }
                        let json = ServerMessage::changes(vec![change]).to_json()?;
                        if let Err(e) = ws_sink.send(Message::Text(json.into())).await {
                            warn!("Failed to send changes to {}: {}", peer_addr, e);
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        // Missed changes cannot be replayed; closing ends the
                        // client's feed so its next session resyncs.
                        warn!("Client {} lagged by {} changes, closing", peer_addr, n);
                        let _ = ws_sink.send(Message::Close(None)).await;
                        break;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Process a client message and return an optional response.
pub(crate) async fn handle_client_message(
    text: &str,
    state: &ServerState,
    conn: &mut Connection,
) -> Result<Option<ServerMessage>, BoxError> {
    let msg = ClientMessage::from_json(text)?;
    debug!("Received message: {:?}", msg);

    let response = match msg {
        ClientMessage::Create { request_id, doc } => {
            let outcome = state.create(doc).await;
            ServerMessage::reply(request_id, &outcome)
        }
        ClientMessage::Update {
            request_id,
            id,
            fields,
            version,
        } => {
            let outcome = state.update(&id, fields, version).await;
            ServerMessage::reply(request_id, &outcome)
        }
        ClientMessage::Delete { request_id, id } => {
            let outcome = state.delete(&id).await;
            ServerMessage::reply(request_id, &outcome)
        }
        ClientMessage::Subscribe { user_id } => {
            let snapshot = state.snapshot(&user_id).await;
            debug!("Snapshot of {} documents for {}", snapshot.len(), user_id);
            conn.subscribed = Some(user_id);
            ServerMessage::changes(snapshot)
        }
        ClientMessage::Unsubscribe => {
            if let Some(user_id) = conn.subscribed.take() {
                debug!("Unsubscribed {}", user_id);
            }
            return Ok(None);
        }
        ClientMessage::Ping { id } => ServerMessage::pong(id),
    };
    Ok(Some(response))
}
