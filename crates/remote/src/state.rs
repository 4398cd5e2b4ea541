// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Wraps the canonical document collection, its on-disk copy and the change
//! broadcast for thread-safe access.

use std::path::Path;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info};

use todosync_core::store::{load_json, save_json};
use todosync_core::{
    ClockSource, DocChange, DocumentCollection, FileStore, Hlc, KeyValueStore, Reject, Result,
    SystemClock, TaskDocument, TaskFields,
};

/// Storage key of the persisted documents.
pub const DOCUMENTS_KEY: &str = "documents";

/// Changes buffered per connection before it counts as lagging.
const BROADCAST_CAPACITY: usize = 1024;

/// Shared server state containing the canonical documents.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<ServerStateInner>,
}

struct ServerStateInner {
    /// The canonical documents (protected by mutex for writes).
    docs: Mutex<DocumentCollection>,
    /// Durable copy, rewritten after every applied write.
    store: Box<dyn KeyValueStore>,
    /// Source of server timestamps.
    clock: Box<dyn ClockSource>,
    /// Broadcast channel for notifying clients of applied changes.
    broadcast_tx: broadcast::Sender<DocChange>,
}

impl ServerState {
    /// Opens the documents stored in the given directory.
    pub fn new(data_dir: &Path) -> Result<Self> {
        Self::with_store(Box::new(FileStore::open(data_dir)?), Box::new(SystemClock))
    }

    /// Loads the documents from `store`, stamping writes with `clock`.
    pub fn with_store(
        store: Box<dyn KeyValueStore>,
        clock: Box<dyn ClockSource>,
    ) -> Result<Self> {
        Self::with_capacity(store, clock, BROADCAST_CAPACITY)
    }

    pub(crate) fn with_capacity(
        store: Box<dyn KeyValueStore>,
        clock: Box<dyn ClockSource>,
        capacity: usize,
    ) -> Result<Self> {
        let docs: Vec<TaskDocument> = load_json(store.as_ref(), DOCUMENTS_KEY)?.unwrap_or_default();
        info!("Loaded {} documents", docs.len());

        let (broadcast_tx, _) = broadcast::channel(capacity);

        Ok(ServerState {
            inner: Arc::new(ServerStateInner {
                docs: Mutex::new(DocumentCollection::from_documents(docs)),
                store,
                clock,
                broadcast_tx,
            }),
        })
    }

    /// Stores a new document under its own id.
    pub async fn create(&self, doc: TaskDocument) -> std::result::Result<(), Reject> {
        let now = self.inner.clock.now();
        self.apply(|docs| docs.create(doc, now).map(Some)).await
    }

    /// Replaces a document's fields if `version` is newer than the stored one.
    pub async fn update(
        &self,
        id: &str,
        fields: TaskFields,
        version: Hlc,
    ) -> std::result::Result<(), Reject> {
        let now = self.inner.clock.now();
        self.apply(|docs| docs.update(id, fields, version, now)).await
    }

    pub async fn delete(&self, id: &str) -> std::result::Result<(), Reject> {
        self.apply(|docs| docs.delete(id).map(Some)).await
    }

    /// The user's documents as a batch of additions.
    pub async fn snapshot(&self, user_id: &str) -> Vec<DocChange> {
        self.inner.docs.lock().await.snapshot(user_id)
    }

    pub async fn get(&self, id: &str) -> Option<TaskDocument> {
        self.inner.docs.lock().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.docs.lock().await.len()
    }

    /// Subscribe to applied changes.
    pub fn subscribe(&self) -> broadcast::Receiver<DocChange> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Applies a write, persists the collection and broadcasts the change.
    ///
    /// A failed save is logged; the change stays applied in memory. A write
    /// that changes nothing is acknowledged without a save.
    async fn apply<F>(&self, write: F) -> std::result::Result<(), Reject>
    where
        F: FnOnce(&mut DocumentCollection) -> std::result::Result<Option<DocChange>, Reject>,
    {
        let change = {
            let mut docs = self.inner.docs.lock().await;
            let Some(change) = write(&mut *docs)? else {
                return Ok(());
            };
            if let Err(e) = save_json(self.inner.store.as_ref(), DOCUMENTS_KEY, &docs.documents()) {
                error!("Failed to save documents: {}", e);
            }
            change
        };
        debug!("Applied {} of {}", change.kind, change.doc.id);

        // No receivers is fine
        let _ = self.inner.broadcast_tx.send(change);
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
