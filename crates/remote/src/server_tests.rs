// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test server utilities for integration testing.
//!
//! Provides a TestServer that runs on a random port and a small client
//! wrapper that speaks the JSON protocol.

#![cfg(test)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::server;
use crate::state::ServerState;

/// A test server that runs on a random port and can be controlled.
pub struct TestServer {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    state: ServerState,
    /// Keep the temp directory alive for the lifetime of the test server.
    _temp_dir: tempfile::TempDir,
}

impl TestServer {
    /// Start a new test server on a random available port.
    pub async fn start() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let state = ServerState::new(temp_dir.path()).unwrap();
        Self::start_with(state, temp_dir).await
    }

    /// Start a test server over the given state.
    pub async fn start_with(state: ServerState, temp_dir: tempfile::TempDir) -> Self {
        // Bind to port 0 to get a random available port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let state_clone = state.clone();
        tokio::spawn(async move {
            tokio::select! {
                result = server::accept_loop(listener, state_clone) => {
                    if let Err(e) = result {
                        eprintln!("Test server error: {}", e);
                    }
                }
                _ = shutdown_rx => {}
            }
        });

        TestServer {
            addr,
            shutdown_tx,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Get the WebSocket URL for connecting to this server.
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Get access to the server state for verification.
    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Shutdown the test server.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{handle_client_message, Connection};
    use futures_util::{SinkExt, StreamExt};
    use tokio::net::TcpStream;
    use tokio::time::{timeout, Duration};
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
    use todosync_core::protocol::{ClientMessage, ServerMessage};
    use todosync_core::{
        datetime_from_ms, ChangeKind, Hlc, MemoryStore, NewTask, Reject, SystemClock, Task,
        TaskDocument, TaskFields,
    };

    struct Client {
        ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    }

    impl Client {
        async fn connect(server: &TestServer) -> Self {
            let (ws, _) = connect_async(server.ws_url()).await.unwrap();
            Client { ws }
        }

        async fn send(&mut self, msg: &ClientMessage) {
            self.ws
                .send(Message::Text(msg.to_json().unwrap().into()))
                .await
                .unwrap();
        }

        async fn send_raw(&mut self, text: &str) {
            self.ws.send(Message::Text(text.into())).await.unwrap();
        }

        async fn recv(&mut self) -> ServerMessage {
            loop {
                let msg = timeout(Duration::from_secs(5), self.ws.next())
                    .await
                    .expect("timed out waiting for server")
                    .unwrap()
                    .unwrap();
                if let Message::Text(text) = msg {
                    return ServerMessage::from_json(&text).unwrap();
                }
            }
        }

        async fn request(&mut self, msg: &ClientMessage) -> ServerMessage {
            self.send(msg).await;
            self.recv().await
        }
    }

    fn make_doc(id: &str, user_id: &str) -> TaskDocument {
        let task = Task::from_new(
            NewTask::new(format!("Task {id}"), user_id),
            id.to_string(),
            datetime_from_ms(1_000),
            Hlc::new(1_000, 0, 1),
        );
        TaskDocument::from(&task)
    }

    fn changed_ids(msg: ServerMessage) -> Vec<(ChangeKind, String)> {
        match msg {
            ServerMessage::Changes { changes } => {
                changes.into_iter().map(|c| (c.kind, c.doc.id)).collect()
            }
            other => panic!("expected changes, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ping_pong() {
        let server = TestServer::start().await;
        let mut client = Client::connect(&server).await;

        let response = client.request(&ClientMessage::ping(42)).await;
        assert_eq!(response, ServerMessage::pong(42));

        server.shutdown();
    }

    #[tokio::test]
    async fn test_create_then_duplicate_is_rejected() {
        let server = TestServer::start().await;
        let mut client = Client::connect(&server).await;

        let doc = make_doc("a", "u1");
        let first = client.request(&ClientMessage::create(1, doc.clone())).await;
        assert_eq!(first, ServerMessage::ack(1));

        let second = client.request(&ClientMessage::create(2, doc)).await;
        assert_eq!(second, ServerMessage::rejected(2, Reject::AlreadyExists));

        assert_eq!(server.state().len().await, 1);
        server.shutdown();
    }

    #[tokio::test]
    async fn test_update_and_delete_over_the_wire() {
        let server = TestServer::start().await;
        let mut client = Client::connect(&server).await;

        let doc = make_doc("a", "u1");
        client.request(&ClientMessage::create(1, doc.clone())).await;

        let mut fields = TaskFields::from(&doc.clone().into_task());
        fields.completed = true;
        let stale = client
            .request(&ClientMessage::update(2, "a", fields.clone(), Hlc::new(500, 0, 1)))
            .await;
        assert_eq!(stale, ServerMessage::rejected(2, Reject::Stale));

        let applied = client
            .request(&ClientMessage::update(3, "a", fields, Hlc::new(2_000, 0, 1)))
            .await;
        assert_eq!(applied, ServerMessage::ack(3));
        assert!(server.state().get("a").await.unwrap().completed);

        let deleted = client.request(&ClientMessage::delete(4, "a")).await;
        assert_eq!(deleted, ServerMessage::ack(4));
        let missing = client.request(&ClientMessage::delete(5, "a")).await;
        assert_eq!(missing, ServerMessage::rejected(5, Reject::NotFound));

        server.shutdown();
    }

    #[tokio::test]
    async fn test_subscribe_receives_snapshot_then_own_changes() {
        let server = TestServer::start().await;
        server.state().create(make_doc("a", "u1")).await.unwrap();
        server.state().create(make_doc("b", "u2")).await.unwrap();

        let mut watcher = Client::connect(&server).await;
        let snapshot = watcher.request(&ClientMessage::subscribe("u1")).await;
        assert_eq!(changed_ids(snapshot), vec![(ChangeKind::Added, "a".to_string())]);

        let mut writer = Client::connect(&server).await;
        writer.request(&ClientMessage::create(1, make_doc("c", "u2"))).await;
        writer.request(&ClientMessage::create(2, make_doc("d", "u1"))).await;

        let live = watcher.recv().await;
        assert_eq!(changed_ids(live), vec![(ChangeKind::Added, "d".to_string())]);

        writer.request(&ClientMessage::delete(3, "d")).await;
        let removed = watcher.recv().await;
        assert_eq!(changed_ids(removed), vec![(ChangeKind::Removed, "d".to_string())]);

        server.shutdown();
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_changes() {
        let server = TestServer::start().await;
        let mut watcher = Client::connect(&server).await;
        watcher.request(&ClientMessage::subscribe("u1")).await;
        watcher.send(&ClientMessage::unsubscribe()).await;

        // Unsubscribe has no reply, so a ping confirms it was processed
        assert_eq!(watcher.request(&ClientMessage::ping(1)).await, ServerMessage::pong(1));

        let mut writer = Client::connect(&server).await;
        writer.request(&ClientMessage::create(1, make_doc("a", "u1"))).await;

        assert_eq!(watcher.request(&ClientMessage::ping(2)).await, ServerMessage::pong(2));
        server.shutdown();
    }

    #[tokio::test]
    async fn test_lagging_subscriber_is_disconnected() {
        let state = ServerState::with_capacity(
            Box::new(MemoryStore::new()),
            Box::new(SystemClock),
            1,
        )
        .unwrap();
        let server = TestServer::start_with(state, tempfile::tempdir().unwrap()).await;
        let mut watcher = Client::connect(&server).await;
        watcher.request(&ClientMessage::subscribe("u1")).await;

        // The writes finish before the connection task runs again.
        for i in 0..4 {
            server
                .state()
                .create(make_doc(&format!("t{i}"), "u1"))
                .await
                .unwrap();
        }

        let closed = timeout(Duration::from_secs(5), async {
            loop {
                match watcher.ws.next().await {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                    Some(Ok(_)) => {}
                }
            }
        })
        .await;
        assert!(closed.is_ok(), "lagging connection was not closed");
        server.shutdown();
    }

    #[tokio::test]
    async fn test_malformed_message_returns_error() {
        let server = TestServer::start().await;
        let mut client = Client::connect(&server).await;

        client.send_raw("{\"type\":\"nope\"}").await;
        assert!(matches!(client.recv().await, ServerMessage::Error { .. }));

        // The connection stays usable
        assert_eq!(client.request(&ClientMessage::ping(7)).await, ServerMessage::pong(7));
        server.shutdown();
    }

    #[tokio::test]
    async fn test_handle_subscribe_tracks_user() {
        let temp = tempfile::tempdir().unwrap();
        let state = ServerState::new(temp.path()).unwrap();
        let mut conn = Connection::default();

        let msg = ClientMessage::subscribe("u1").to_json().unwrap();
        let response = handle_client_message(&msg, &state, &mut conn).await.unwrap();
        assert_eq!(response, Some(ServerMessage::changes(vec![])));
        assert_eq!(conn.subscribed.as_deref(), Some("u1"));

        let msg = ClientMessage::unsubscribe().to_json().unwrap();
        let response = handle_client_message(&msg, &state, &mut conn).await.unwrap();
        assert_eq!(response, None);
        assert_eq!(conn.subscribed, None);
    }

    #[tokio::test]
    async fn test_handle_invalid_json_is_error() {
        let temp = tempfile::tempdir().unwrap();
        let state = ServerState::new(temp.path()).unwrap();
        let mut conn = Connection::default();

        assert!(handle_client_message("not json", &state, &mut conn).await.is_err());
    }
}
