// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote document store adapters.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────────┐
//! │ TodoService │────►│ RemoteStore │────►│ MemoryRemote     │
//! │             │◄────│   (trait)   │     │ WebSocketRemote  │
//! └─────────────┘     └─────────────┘     └──────────────────┘
//!        ▲                   │
//!        └──── ChangeFeed ◄──┘  (per-user change batches)
//! ```
//!
//! Every adapter stores documents under the id chosen by the client and
//! answers writes with the outcomes defined by
//! [`DocumentCollection`](todosync_core::DocumentCollection).

mod memory;
mod websocket;

pub use memory::{MemoryRemote, RemoteCall};
pub use websocket::WebSocketRemote;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::mpsc;
use todosync_core::{DocChange, Hlc, Reject, TaskDocument, TaskFields};

/// Error type for remote operations.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The store refused the write.
    #[error("rejected: {0}")]
    Rejected(#[from] Reject),

    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed unexpectedly.
    #[error("connection closed")]
    ConnectionClosed,

    /// No reply within the request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// The server sent something unexpected.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store cannot be reached.
    #[error("remote unavailable")]
    Unavailable,
}

impl RemoteError {
    /// The rejection reason, if the store refused the write.
    pub fn rejection(&self) -> Option<Reject> {
        match self {
            RemoteError::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by [`RemoteStore`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// A remote document store holding the `todos` collection.
pub trait RemoteStore: Send + Sync {
    /// Stores a new document under `doc.id`.
    ///
    /// Fails with [`Reject::AlreadyExists`] if the id is taken.
    fn create(&self, doc: TaskDocument) -> RemoteFuture<'_, ()>;

    /// Replaces the mutable fields of document `id`.
    ///
    /// Fails with [`Reject::NotFound`] or, if `version` is not newer than
    /// the stored one, [`Reject::Stale`].
    fn update(&self, id: &str, fields: TaskFields, version: Hlc) -> RemoteFuture<'_, ()>;

    /// Removes document `id`.
    fn delete(&self, id: &str) -> RemoteFuture<'_, ()>;

    /// Opens a live feed of changes to `user_id`'s documents.
    ///
    /// The first batch lists every current document of the user as added.
    fn listen(&self, user_id: &str) -> RemoteFuture<'_, ChangeFeed>;
}

/// A live stream of change batches for one user.
///
/// Dropping the feed ends the subscription.
#[derive(Debug)]
pub struct ChangeFeed {
    rx: mpsc::UnboundedReceiver<Vec<DocChange>>,
}

impl ChangeFeed {
    /// Creates a feed and the sender that fills it.
    pub fn channel() -> (mpsc::UnboundedSender<Vec<DocChange>>, ChangeFeed) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, ChangeFeed { rx })
    }

    /// Waits for the next batch. Returns `None` once the remote side ends
    /// the subscription.
    pub async fn next(&mut self) -> Option<Vec<DocChange>> {
        self.rx.recv().await
    }
}
