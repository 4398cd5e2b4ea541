// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket adapter for the `todosync-remote` server.
//!
//! Writes share one lazily opened connection and are answered in order by
//! `ack`/`rejected` replies. Each [`ChangeFeed`] gets its own connection,
//! closed when the feed is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use todosync_core::protocol::{ClientMessage, ServerMessage};
use todosync_core::{DocChange, Hlc, TaskDocument, TaskFields};

use super::{ChangeFeed, RemoteError, RemoteFuture, RemoteResult, RemoteStore};
use crate::config::RemoteConfig;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Remote store reached over WebSocket.
pub struct WebSocketRemote {
    url: String,
    request_timeout: Duration,
    connect_timeout: Duration,
    /// Connection used for writes, if open.
    conn: Mutex<Option<WsStream>>,
    next_request_id: AtomicU64,
}

impl WebSocketRemote {
    pub fn new(url: impl Into<String>, request_timeout: Duration, connect_timeout: Duration) -> Self {
        WebSocketRemote {
            url: url.into(),
            request_timeout,
            connect_timeout,
            conn: Mutex::new(None),
            next_request_id: AtomicU64::new(1),
        }
    }

    pub fn from_config(config: &RemoteConfig) -> Self {
        Self::new(
            config.url.clone(),
            config.request_timeout(),
            config.connect_timeout(),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn connect(&self) -> RemoteResult<WsStream> {
        let connecting = tokio_tungstenite::connect_async(self.url.as_str());
        let (ws, _) = tokio::time::timeout(self.connect_timeout, connecting)
            .await
            .map_err(|_| RemoteError::Timeout(self.connect_timeout))?
            .map_err(|e| RemoteError::ConnectionFailed(e.to_string()))?;
        debug!("Connected to remote {}", self.url);
        Ok(ws)
    }

    /// Sends one write and waits for its reply.
    async fn request(&self, msg: ClientMessage) -> RemoteResult<()> {
        let mut conn = self.conn.lock().await;
        match tokio::time::timeout(self.request_timeout, self.round_trip(&mut conn, msg)).await {
            Ok(result) => result,
            Err(_) => {
                *conn = None;
                Err(RemoteError::Timeout(self.request_timeout))
            }
        }
    }

    async fn round_trip(&self, conn: &mut Option<WsStream>, msg: ClientMessage) -> RemoteResult<()> {
        if conn.is_none() {
            *conn = Some(self.connect().await?);
        }
        let ws = conn.as_mut().ok_or(RemoteError::ConnectionClosed)?;
        let request_id = msg
            .request_id()
            .ok_or_else(|| RemoteError::Protocol("not a write request".to_string()))?;

        let json = msg.to_json()?;
        if let Err(e) = ws.send(Message::Text(json.into())).await {
            *conn = None;
            return Err(RemoteError::SendFailed(e.to_string()));
        }

        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => match ServerMessage::from_json(&text)? {
                    ServerMessage::Ack { request_id: id } if id == request_id => return Ok(()),
                    ServerMessage::Rejected { request_id: id, reason } if id == request_id => {
                        return Err(reason.into());
                    }
                    ServerMessage::Error { message } => return Err(RemoteError::Protocol(message)),
                    other => debug!("Ignoring unrelated server message: {:?}", other),
                },
                Some(Ok(Message::Close(_))) | None => {
                    *conn = None;
                    return Err(RemoteError::ConnectionClosed);
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    *conn = None;
                    return Err(RemoteError::ConnectionFailed(e.to_string()));
                }
            }
        }
    }

    fn next_request_id(&self) -> u64 {
        self.next_request_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl std::fmt::Debug for WebSocketRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketRemote")
            .field("url", &self.url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl RemoteStore for WebSocketRemote {
    fn create(&self, doc: TaskDocument) -> RemoteFuture<'_, ()> {
        Box::pin(async move {
            let msg = ClientMessage::create(self.next_request_id(), doc);
            self.request(msg).await
        })
    }

    fn update(&self, id: &str, fields: TaskFields, version: Hlc) -> RemoteFuture<'_, ()> {
        let id = id.to_string();
        Box::pin(async move {
            let msg = ClientMessage::update(self.next_request_id(), id, fields, version);
            self.request(msg).await
        })
    }

    fn delete(&self, id: &str) -> RemoteFuture<'_, ()> {
        let id = id.to_string();
        Box::pin(async move {
            let msg = ClientMessage::delete(self.next_request_id(), id);
            self.request(msg).await
        })
    }

    fn listen(&self, user_id: &str) -> RemoteFuture<'_, ChangeFeed> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            let (mut sink, stream) = self.connect().await?.split();
            let json = ClientMessage::subscribe(user_id.as_str()).to_json()?;
            sink.send(Message::Text(json.into()))
                .await
                .map_err(|e| RemoteError::SendFailed(e.to_string()))?;

            let (tx, feed) = ChangeFeed::channel();
            tokio::spawn(forward_changes(sink, stream, tx, user_id));
            Ok(feed)
        })
    }
}

/// Relays `changes` batches into a feed until either side goes away.
async fn forward_changes(
    mut sink: SplitSink<WsStream, Message>,
    mut stream: SplitStream<WsStream>,
    tx: mpsc::UnboundedSender<Vec<DocChange>>,
    user_id: String,
) {
    loop {
        tokio::select! {
            _ = tx.closed() => {
                if let Ok(json) = ClientMessage::unsubscribe().to_json() {
                    let _ = sink.send(Message::Text(json.into())).await;
                }
                let _ = sink.close().await;
                debug!("Change feed for {} released", user_id);
                break;
            }
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => match ServerMessage::from_json(&text) {
                    Ok(ServerMessage::Changes { changes }) => {
                        if tx.send(changes).is_err() {
                            break;
                        }
                    }
                    Ok(ServerMessage::Error { message }) => {
                        warn!("Remote error on feed for {}: {}", user_id, message);
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Malformed server message: {}", e),
                },
                Some(Ok(Message::Close(_))) | None => {
                    info!("Change feed for {} closed by remote", user_id);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Change feed for {} failed: {}", user_id, e);
                    break;
                }
            }
        }
    }
}
