// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-process remote store.
//!
//! Used for local-only runs and tests. Supports taking the store offline
//! and pausing writes mid-flight to exercise the synchronizer's failure
//! and race handling.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::debug;
use todosync_core::{
    ClockSource, DocChange, DocumentCollection, Hlc, Reject, SystemClock, TaskDocument, TaskFields,
};

use super::{ChangeFeed, RemoteError, RemoteFuture, RemoteResult, RemoteStore};

/// A request received by a [`MemoryRemote`], recorded in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Create(String),
    Update(String),
    Delete(String),
    Listen(String),
}

struct State {
    docs: DocumentCollection,
    feeds: Vec<(String, mpsc::UnboundedSender<Vec<DocChange>>)>,
    offline: bool,
    calls: Vec<RemoteCall>,
}

impl State {
    fn publish(&mut self, change: DocChange) {
        self.feeds.retain(|(user_id, tx)| {
            if user_id != change.user_id() {
                return !tx.is_closed();
            }
            tx.send(vec![change.clone()]).is_ok()
        });
    }
}

struct Inner {
    state: Mutex<State>,
    clock: Arc<dyn ClockSource>,
    paused: watch::Sender<bool>,
    blocked: AtomicUsize,
}

/// Remote store living in this process. Clones share the same documents.
#[derive(Clone)]
pub struct MemoryRemote {
    inner: Arc<Inner>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a store that stamps server time from `clock`.
    pub fn with_clock(clock: Arc<dyn ClockSource>) -> Self {
        let (paused, _) = watch::channel(false);
        MemoryRemote {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    docs: DocumentCollection::new(),
                    feeds: Vec::new(),
                    offline: false,
                    calls: Vec::new(),
                }),
                clock,
                paused,
                blocked: AtomicUsize::new(0),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// While offline every request fails with [`RemoteError::Unavailable`].
    /// Requests are checked when they arrive, before any pause.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Holds every arriving write until [`MemoryRemote::resume`].
    pub fn pause(&self) {
        self.inner.paused.send_replace(true);
    }

    pub fn resume(&self) {
        self.inner.paused.send_replace(false);
    }

    /// Number of writes currently held by [`MemoryRemote::pause`].
    pub fn blocked(&self) -> usize {
        self.inner.blocked.load(Ordering::SeqCst)
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.lock().calls.clone()
    }

    pub fn get(&self, id: &str) -> Option<TaskDocument> {
        self.lock().docs.get(id).cloned()
    }

    pub fn documents(&self) -> Vec<TaskDocument> {
        self.lock().docs.documents()
    }

    /// Number of live change feeds.
    pub fn feed_count(&self) -> usize {
        let mut state = self.lock();
        state.feeds.retain(|(_, tx)| !tx.is_closed());
        state.feeds.len()
    }

    fn arrive(&self, call: RemoteCall) -> RemoteResult<()> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.offline {
            return Err(RemoteError::Unavailable);
        }
        Ok(())
    }

    async fn wait_resumed(&self) {
        let mut rx = self.inner.paused.subscribe();
        if *rx.borrow() {
            self.inner.blocked.fetch_add(1, Ordering::SeqCst);
            let _ = rx.wait_for(|paused| !*paused).await;
            self.inner.blocked.fetch_sub(1, Ordering::SeqCst);
        }
    }

    async fn write<F>(&self, call: RemoteCall, apply: F) -> RemoteResult<()>
    where
        F: FnOnce(&mut DocumentCollection, DateTime<Utc>) -> Result<Option<DocChange>, Reject>,
    {
        self.arrive(call)?;
        self.wait_resumed().await;

        let now = self.inner.clock.now();
        let mut state = self.lock();
        let Some(change) = apply(&mut state.docs, now)? else {
            return Ok(());
        };
        debug!("Applied {} of {}", change.kind, change.doc.id);
        state.publish(change);
        Ok(())
    }
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("MemoryRemote")
            .field("documents", &state.docs.len())
            .field("feeds", &state.feeds.len())
            .field("offline", &state.offline)
            .finish()
    }
}

impl RemoteStore for MemoryRemote {
    fn create(&self, doc: TaskDocument) -> RemoteFuture<'_, ()> {
        Box::pin(async move {
            let call = RemoteCall::Create(doc.id.clone());
            self.write(call, |docs, now| docs.create(doc, now).map(Some))
                .await
        })
    }

    fn update(&self, id: &str, fields: TaskFields, version: Hlc) -> RemoteFuture<'_, ()> {
        let id = id.to_string();
        Box::pin(async move {
            let call = RemoteCall::Update(id.clone());
            self.write(call, |docs, now| docs.update(&id, fields, version, now))
                .await
        })
    }

    fn delete(&self, id: &str) -> RemoteFuture<'_, ()> {
        let id = id.to_string();
        Box::pin(async move {
            let call = RemoteCall::Delete(id.clone());
            self.write(call, |docs, _| docs.delete(&id).map(Some)).await
        })
    }

    fn listen(&self, user_id: &str) -> RemoteFuture<'_, ChangeFeed> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            self.arrive(RemoteCall::Listen(user_id.clone()))?;

            let (tx, feed) = ChangeFeed::channel();
            let mut state = self.lock();
            let _ = tx.send(state.docs.snapshot(&user_id));
            state.feeds.push((user_id, tx));
            Ok(feed)
        })
    }
}
