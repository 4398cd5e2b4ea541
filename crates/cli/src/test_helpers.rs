// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::TimeZone;
use todosync_core::{
    ClockSource, Hlc, KeyValueStore, MemoryStore, NewTask, Priority, Task, TaskDocument,
};

use crate::remote::MemoryRemote;
use crate::service::TodoService;

/// Wall clock that only moves when told to.
#[derive(Debug)]
pub struct MockClock(AtomicU64);

impl MockClock {
    pub fn new(ms: u64) -> Self {
        MockClock(AtomicU64::new(ms))
    }

    pub fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl ClockSource for MockClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Create a remote document owned by `user_id`, versioned at `wall_ms` on
/// node 99.
pub fn make_doc(id: &str, user_id: &str, wall_ms: u64) -> TaskDocument {
    let task = Task::from_new(
        NewTask::new(format!("Remote {id}"), user_id).with_priority(Priority::High),
        id.to_string(),
        chrono::Utc.timestamp_millis_opt(wall_ms as i64).unwrap(),
        Hlc::new(wall_ms, 0, 99),
    );
    TaskDocument::from(&task)
}

/// The "Buy milk" task input.
pub fn buy_milk() -> NewTask {
    NewTask::new("Buy milk", "u1")
        .with_category("Shopping")
        .with_priority(Priority::Low)
}

/// A local-only service over `store`, with a mock clock at `start_ms`.
pub fn local_service(store: Arc<MemoryStore>, start_ms: u64) -> (TodoService, Arc<MockClock>) {
    let clock = Arc::new(MockClock::new(start_ms));
    let service = TodoService::builder(store)
        .clock(clock.clone())
        .node_id(1)
        .build();
    (service, clock)
}

/// A service mirrored to `remote`, over a fresh memory store.
pub fn synced_service(remote: &MemoryRemote) -> (TodoService, Arc<MemoryStore>, Arc<MockClock>) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(MockClock::new(1_000_000));
    let service = TodoService::builder(store.clone())
        .remote(Arc::new(remote.clone()))
        .clock(clock.clone())
        .node_id(1)
        .build();
    (service, store, clock)
}

/// Reads the persisted collection straight from the store.
pub fn persisted(store: &dyn KeyValueStore) -> Vec<Task> {
    todosync_core::store::load_tasks(store).unwrap().unwrap_or_default()
}
