// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The local-first task synchronizer.
//!
//! [`TodoService`] holds the task collection in memory, writes the whole
//! collection to the [`KeyValueStore`] on every mutation, and notifies
//! observers before each mutating call returns. Pushes to the remote store
//! run as tokio tasks afterwards; their failures are logged, never
//! returned.
//!
//! Each local mutation stamps the record with a fresh [`Hlc`] version. The
//! remote only accepts updates carrying a newer version, and a finished
//! push marks the record synced only if no later edit replaced the version
//! it pushed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::TimeDelta;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};
use todosync_core::store::{load_tasks, save_tasks};
use todosync_core::{
    ChangeKind, ClockSource, DocChange, Hlc, HlcClock, KeyValueStore, NewTask, Reject,
    SystemClock, Task, TaskDocument, TaskFields, TaskPatch,
};

use crate::error::Result;
use crate::observer::{ObserverRegistry, Subscription};
use crate::remote::{RemoteError, RemoteStore};

/// Counts background remote calls so callers can wait for them.
#[derive(Default)]
struct Pending {
    count: AtomicUsize,
    idle: Notify,
}

struct PendingGuard(Arc<Pending>);

impl Pending {
    fn start(self: &Arc<Self>) -> PendingGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        PendingGuard(Arc::clone(self))
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.count.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

struct Inner {
    tasks: Mutex<Vec<Task>>,
    store: Arc<dyn KeyValueStore>,
    remote: Option<Arc<dyn RemoteStore>>,
    clock: HlcClock<Arc<dyn ClockSource>>,
    observers: ObserverRegistry<[Task]>,
    pending: Arc<Pending>,
}

/// Handle to the synchronizer. Clones share the same state.
#[derive(Clone)]
pub struct TodoService {
    inner: Arc<Inner>,
}

/// Configures a [`TodoService`].
pub struct TodoServiceBuilder {
    store: Arc<dyn KeyValueStore>,
    remote: Option<Arc<dyn RemoteStore>>,
    clock: Arc<dyn ClockSource>,
    node_id: u32,
}

impl TodoServiceBuilder {
    /// Remote store to mirror tasks to. Without one the service is local-only.
    pub fn remote(mut self, remote: Arc<dyn RemoteStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Wall clock for timestamps and version stamps.
    pub fn clock(mut self, clock: Arc<dyn ClockSource>) -> Self {
        self.clock = clock;
        self
    }

    /// This device's tiebreaker in version stamps.
    pub fn node_id(mut self, node_id: u32) -> Self {
        self.node_id = node_id;
        self
    }

    /// Builds an empty service. Call [`TodoService::initialize`] to load
    /// persisted tasks.
    pub fn build(self) -> TodoService {
        TodoService {
            inner: Arc::new(Inner {
                tasks: Mutex::new(Vec::new()),
                store: self.store,
                remote: self.remote,
                clock: HlcClock::with_clock(self.clock, self.node_id),
                observers: ObserverRegistry::new(),
                pending: Arc::new(Pending::default()),
            }),
        }
    }
}

impl TodoService {
    pub fn builder(store: Arc<dyn KeyValueStore>) -> TodoServiceBuilder {
        TodoServiceBuilder {
            store,
            remote: None,
            clock: Arc::new(SystemClock),
            node_id: 0,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Task>> {
        self.inner.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The configured remote store, if any.
    pub fn remote(&self) -> Option<Arc<dyn RemoteStore>> {
        self.inner.remote.clone()
    }

    /// Loads the persisted collection, replacing what is in memory, and
    /// notifies observers.
    ///
    /// Nothing happens when storage holds no collection. A read or parse
    /// failure is logged and leaves the collection untouched.
    pub fn initialize(&self) {
        let loaded = match load_tasks(self.inner.store.as_ref()) {
            Ok(Some(tasks)) => tasks,
            Ok(None) => {
                debug!("No persisted tasks");
                return;
            }
            Err(e) => {
                error!("Failed to load tasks from storage: {}", e);
                return;
            }
        };

        for task in &loaded {
            self.inner.clock.observe(&task.version);
        }
        info!("Loaded {} tasks from storage", loaded.len());

        let snapshot = {
            let mut tasks = self.lock();
            *tasks = loaded;
            tasks.clone()
        };
        self.inner.observers.notify(&snapshot);
    }

    /// Registers an observer and calls it right away with the current
    /// collection, then after every mutation.
    pub fn subscribe<F>(&self, observer: F) -> Subscription<[Task]>
    where
        F: Fn(&[Task]) + Send + Sync + 'static,
    {
        let observer: Arc<dyn Fn(&[Task]) + Send + Sync> = Arc::new(observer);
        let subscription = self.inner.observers.subscribe(Arc::clone(&observer));
        let snapshot = self.tasks();
        observer(&snapshot);
        subscription
    }

    /// Adds a task and starts pushing it to the remote.
    ///
    /// Returns the record as stored locally, before any sync.
    pub fn create(&self, new: NewTask) -> Result<Task> {
        new.validate()?;

        let version = self.inner.clock.now();
        let now = self.inner.clock.source().now();
        let task = Task::from_new(new, version.to_string(), now, version);

        let snapshot = {
            let mut tasks = self.lock();
            tasks.push(task.clone());
            self.persist(&tasks);
            tasks.clone()
        };
        debug!("Created task {}", task.id);
        self.inner.observers.notify(&snapshot);

        self.spawn_push(task.clone());
        Ok(task)
    }

    /// Applies `patch` to task `id` and starts pushing the result.
    ///
    /// Returns `Ok(None)` without writing or notifying when `id` is unknown.
    pub fn update(&self, id: &str, patch: TaskPatch) -> Result<Option<Task>> {
        patch.validate()?;

        let (task, snapshot) = {
            let mut tasks = self.lock();
            let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
                debug!("Update ignored, no task {}", id);
                return Ok(None);
            };

            task.apply(&patch);
            let now = self.inner.clock.source().now();
            task.updated_at = now.max(task.updated_at + TimeDelta::milliseconds(1));
            task.version = self.inner.clock.now();
            task.synced = false;
            let task = task.clone();

            self.persist(&tasks);
            (task, tasks.clone())
        };
        debug!("Updated task {}", id);
        self.inner.observers.notify(&snapshot);

        self.spawn_push(task.clone());
        Ok(Some(task))
    }

    /// Removes task `id`. A task that was synced is also deleted remotely,
    /// best effort.
    ///
    /// Returns `None` without writing or notifying when `id` is unknown.
    pub fn delete(&self, id: &str) -> Option<Task> {
        let (removed, snapshot) = {
            let mut tasks = self.lock();
            let Some(index) = tasks.iter().position(|t| t.id == id) else {
                debug!("Delete ignored, no task {}", id);
                return None;
            };
            let removed = tasks.remove(index);
            self.persist(&tasks);
            (removed, tasks.clone())
        };
        debug!("Deleted task {}", id);
        self.inner.observers.notify(&snapshot);

        if removed.synced {
            self.spawn_remote_delete(removed.id.clone());
        }
        Some(removed)
    }

    /// Merges one batch of remote changes, then persists and notifies once.
    ///
    /// Added and modified documents replace the local record with the same
    /// id (or are appended); removed documents are dropped even if the
    /// local record has unsynced edits.
    pub fn apply_remote_changes(&self, changes: Vec<DocChange>) {
        let count = changes.len();
        let snapshot = {
            let mut tasks = self.lock();
            for change in changes {
                match change.kind {
                    ChangeKind::Added | ChangeKind::Modified => {
                        self.inner.clock.observe(&change.doc.version);
                        let incoming = change.doc.into_task();
                        match tasks.iter_mut().find(|t| t.id == incoming.id) {
                            Some(existing) => *existing = incoming,
                            None => tasks.push(incoming),
                        }
                    }
                    ChangeKind::Removed => tasks.retain(|t| t.id != change.doc.id),
                }
            }
            self.persist(&tasks);
            tasks.clone()
        };
        debug!("Merged {} remote changes", count);
        self.inner.observers.notify(&snapshot);
    }

    /// Pushes every unsynced task, one after another. Returns how many
    /// pushes succeeded.
    pub async fn push_unsynced(&self) -> usize {
        let Some(remote) = self.remote() else {
            return 0;
        };
        let unsynced = self.unsynced();
        let total = unsynced.len();
        let mut pushed = 0;
        for task in unsynced {
            if self.push(remote.as_ref(), task).await {
                pushed += 1;
            }
        }
        if total > 0 {
            info!("Pushed {}/{} unsynced tasks", pushed, total);
        }
        pushed
    }

    /// Waits until every background remote call has finished.
    pub async fn wait_idle(&self) {
        self.inner.pending.wait_idle().await;
    }

    /// Snapshot of the collection.
    pub fn tasks(&self) -> Vec<Task> {
        self.lock().clone()
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.lock().iter().find(|t| t.id == id).cloned()
    }

    /// Tasks whose current state has not reached the remote.
    pub fn unsynced(&self) -> Vec<Task> {
        self.lock().iter().filter(|t| !t.synced).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }

    fn persist(&self, tasks: &[Task]) {
        if let Err(e) = save_tasks(self.inner.store.as_ref(), tasks) {
            error!("Failed to save tasks to storage: {}", e);
        }
    }

    fn spawn_push(&self, task: Task) {
        let Some(remote) = self.remote() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime, push of {} skipped", task.id);
            return;
        };
        let guard = self.inner.pending.start();
        let service = self.clone();
        runtime.spawn(async move {
            let _guard = guard;
            service.push(remote.as_ref(), task).await;
        });
    }

    fn spawn_remote_delete(&self, id: String) {
        let Some(remote) = self.remote() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime, remote delete of {} skipped", id);
            return;
        };
        let guard = self.inner.pending.start();
        runtime.spawn(async move {
            let _guard = guard;
            match remote.delete(&id).await {
                Ok(()) => debug!("Deleted {} remotely", id),
                Err(RemoteError::Rejected(Reject::NotFound)) => {
                    debug!("Remote delete of {}: already gone", id)
                }
                Err(e) => warn!("Remote delete of {} failed: {}", id, e),
            }
        });
    }

    /// Sends one task's state to the remote. Returns `true` on success.
    async fn push(&self, remote: &dyn RemoteStore, task: Task) -> bool {
        let result = if task.synced {
            remote
                .update(&task.id, TaskFields::from(&task), task.version)
                .await
        } else {
            match remote.create(TaskDocument::from(&task)).await {
                Err(RemoteError::Rejected(Reject::AlreadyExists)) => {
                    debug!("Task {} exists remotely, updating instead", task.id);
                    remote
                        .update(&task.id, TaskFields::from(&task), task.version)
                        .await
                }
                other => other,
            }
        };

        match result {
            Ok(()) => {
                self.mark_synced(&task.id, task.version);
                true
            }
            Err(RemoteError::Rejected(Reject::Stale)) => {
                debug!("Remote holds a newer version of {}", task.id);
                false
            }
            Err(e) => {
                warn!("Push of {} failed: {}", task.id, e);
                false
            }
        }
    }

    /// Marks the task synced if it still carries the pushed version.
    fn mark_synced(&self, id: &str, pushed: Hlc) {
        let mut tasks = self.lock();
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            debug!("Task {} gone before its push finished", id);
            return;
        };
        if task.version != pushed {
            debug!("Task {} changed while pushing, stays unsynced", id);
            return;
        }
        task.synced = true;
        self.persist(&tasks);
    }
}

impl std::fmt::Debug for TodoService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoService")
            .field("tasks", &self.len())
            .field("remote", &self.inner.remote.is_some())
            .field("observers", &self.observer_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
